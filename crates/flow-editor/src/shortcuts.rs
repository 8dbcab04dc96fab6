//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives in
//! Rust so the browser bridge and native hosts agree on bindings.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    DeleteSelection,
    Duplicate,
    /// Cancel an in-progress connection, otherwise clear the selection.
    Cancel,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetView,
    FitToView,
}

impl ShortcutAction {
    pub fn name(self) -> &'static str {
        match self {
            ShortcutAction::DeleteSelection => "deleteSelection",
            ShortcutAction::Duplicate => "duplicate",
            ShortcutAction::Cancel => "cancel",
            ShortcutAction::ZoomIn => "zoomIn",
            ShortcutAction::ZoomOut => "zoomOut",
            ShortcutAction::ResetView => "resetView",
            ShortcutAction::FitToView => "fitToView",
        }
    }
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"d"`, `"Delete"`).
    /// Returns `None` if the combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if modifiers.command() {
            return match key {
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" | "_" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetView),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                _ => None,
            };
        }

        if modifiers.shift {
            // Shift+1 reports "!" on US layouts.
            return match key {
                "1" | "!" => Some(ShortcutAction::FitToView),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteSelection),
            "Escape" => Some(ShortcutAction::Cancel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMD: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };
    const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    #[test]
    fn resolve_delete_and_escape() {
        assert_eq!(
            ShortcutMap::resolve("Delete", Modifiers::NONE),
            Some(ShortcutAction::DeleteSelection)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", Modifiers::NONE),
            Some(ShortcutAction::DeleteSelection)
        );
        assert_eq!(
            ShortcutMap::resolve("Escape", Modifiers::NONE),
            Some(ShortcutAction::Cancel)
        );
    }

    #[test]
    fn resolve_zoom_on_both_platforms() {
        for m in [CMD, CTRL] {
            assert_eq!(ShortcutMap::resolve("=", m), Some(ShortcutAction::ZoomIn));
            assert_eq!(ShortcutMap::resolve("-", m), Some(ShortcutAction::ZoomOut));
            assert_eq!(ShortcutMap::resolve("0", m), Some(ShortcutAction::ResetView));
            assert_eq!(ShortcutMap::resolve("d", m), Some(ShortcutAction::Duplicate));
        }
    }

    #[test]
    fn resolve_fit() {
        assert_eq!(
            ShortcutMap::resolve("!", SHIFT),
            Some(ShortcutAction::FitToView)
        );
    }

    #[test]
    fn unbound_keys() {
        assert_eq!(ShortcutMap::resolve("q", Modifiers::NONE), None);
        assert_eq!(ShortcutMap::resolve("Delete", CMD), None);
        assert_eq!(ShortcutMap::resolve("-", Modifiers::NONE), None);
    }
}
