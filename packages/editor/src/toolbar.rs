//! Floating-toolbar visibility.
//!
//! The toolbar shows while the instructions area has focus and a selection
//! exists; the host surface positions it at the selection rectangle.
//! Pressing a toolbar button blurs the editor, so a mouse-down on the
//! toolbar latches visibility until the press ends and focus returns.

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ToolbarState {
    focused: bool,
    selection: bool,
    pressing: bool,
}

impl ToolbarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_editor_focus(&mut self) {
        self.focused = true;
    }

    /// Blur hides the toolbar unless a toolbar press is in flight
    pub fn on_editor_blur(&mut self) {
        self.focused = false;
    }

    /// A selection change on the instructions surface; collapsing the
    /// selection hides the toolbar
    pub fn on_selection_change(&mut self, active: bool) {
        self.selection = active;
    }

    pub fn on_toolbar_mouse_down(&mut self) {
        self.pressing = true;
    }

    /// The press ends and focus returns to the editor
    pub fn on_toolbar_mouse_up(&mut self) {
        self.pressing = false;
        self.focused = true;
    }

    pub fn is_visible(&self) -> bool {
        (self.focused && self.selection) || self.pressing
    }
}
