//! Editor configuration supplied by the host.
//!
//! Every field has a default, so hosts only send what they override:
//!
//! ```json
//! { "zoomStep": 0.25, "panModifier": "alt" }
//! ```

use serde::{Deserialize, Serialize};

/// Modifier that turns a primary-button drag on empty canvas into a pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanModifier {
    /// Ctrl or ⌘.
    #[default]
    Command,
    Alt,
    Shift,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Scale delta per zoom button press, shortcut or wheel notch.
    pub zoom_step: f64,
    /// Canvas-unit margin around content for fit-to-view.
    pub fit_padding: f64,
    /// Output port hit radius, in screen pixels.
    pub port_radius: f64,
    /// Connection hit tolerance, in screen pixels.
    pub connection_tolerance: f64,
    /// Canvas offset applied to duplicated nodes.
    pub duplicate_offset: f64,
    pub pan_modifier: PanModifier,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom_step: 0.1,
            fit_padding: 50.0,
            port_radius: 8.0,
            connection_tolerance: 6.0,
            duplicate_offset: 20.0,
            pan_modifier: PanModifier::Command,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
