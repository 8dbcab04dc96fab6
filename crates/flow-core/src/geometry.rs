//! Screen ↔ canvas coordinate transform.
//!
//! Canvas space is the logical space nodes live in. Screen space is what the
//! pointer reports. The mapping is a uniform scale followed by a translation:
//!
//! ```text
//! screen = canvas * scale + offset
//! canvas = (screen - offset) / scale
//! ```
//!
//! Panning is a screen-space operation, so pan deltas are never scaled.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom factor.
pub const MIN_SCALE: f64 = 0.2;
/// Largest allowed zoom factor.
pub const MAX_SCALE: f64 = 3.0;

/// The canvas view transform. `scale` always lies in `[MIN_SCALE, MAX_SCALE]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTransform")]
pub struct Transform {
    scale: f64,
    offset: Vec2,
}

/// Unchecked wire form; clamped on the way in.
#[derive(Deserialize)]
struct RawTransform {
    scale: f64,
    offset: Vec2,
}

impl From<RawTransform> for Transform {
    fn from(raw: RawTransform) -> Self {
        let mut t = Transform::IDENTITY;
        t.set_scale(raw.scale);
        t.set_offset(raw.offset);
        t
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        offset: Vec2::ZERO,
    };

    /// Build a transform, clamping `scale` into range.
    pub fn new(scale: f64, offset: Vec2) -> Self {
        let mut t = Self::IDENTITY;
        t.set_scale(scale);
        t.set_offset(offset);
        t
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Replace the offset. Non-finite components leave it unchanged.
    pub fn set_offset(&mut self, offset: Vec2) {
        if offset.is_finite() {
            self.offset = offset;
        }
    }

    /// Replace the scale, clamped to `[MIN_SCALE, MAX_SCALE]`.
    /// `NaN` is ignored; infinities clamp to the nearest bound.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_nan() {
            return;
        }
        self.scale = clamp_scale(scale);
    }

    /// `set_scale(scale + delta)`.
    pub fn zoom_by(&mut self, delta: f64) {
        self.set_scale(self.scale + delta);
    }

    /// Translate the view by a screen-space delta.
    /// Non-finite deltas are ignored.
    pub fn pan(&mut self, screen_delta: Vec2) {
        if screen_delta.is_finite() {
            self.offset += screen_delta;
        }
    }

    /// Back to 100% with no translation.
    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    pub fn to_canvas(&self, screen: Point) -> Point {
        ((screen - self.offset).to_vec2() / self.scale).to_point()
    }

    pub fn to_screen(&self, canvas: Point) -> Point {
        (canvas.to_vec2() * self.scale + self.offset).to_point()
    }

    /// Convert a screen-space length (e.g. a hit radius in px) to canvas units.
    pub fn screen_len_to_canvas(&self, len: f64) -> f64 {
        len / self.scale
    }

    /// The canvas → screen mapping as an affine matrix, for renderers.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }
}

/// Clamp a zoom factor into `[MIN_SCALE, MAX_SCALE]`.
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Free-function form of [`Transform::to_canvas`].
pub fn to_canvas(screen: Point, transform: &Transform) -> Point {
    transform.to_canvas(screen)
}

/// Free-function form of [`Transform::to_screen`].
pub fn to_screen(canvas: Point, transform: &Transform) -> Point {
    transform.to_screen(canvas)
}

/// Clamp both components of a canvas position to be non-negative.
pub fn clamp_non_negative(p: Point) -> Point {
    Point::new(p.x.max(0.0), p.y.max(0.0))
}
