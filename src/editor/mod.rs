//! Editor backend seam.
//!
//! The engine never touches a concrete text-input surface. A host adapter
//! implements [`Editor`] to expose the text around the caret and the caret
//! geometry, and forwards the surface's input as [`EditorEvent`] values to
//! the engine's dispatch. Applying a computed [`TextChange`] is also the
//! adapter's job, including restoring caret position and focus.

/// Input signals an editor adapter forwards to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// The text changed.
    Change,
    /// Navigate up.
    Up,
    /// Navigate down.
    Down,
    /// Confirm the active candidate.
    Enter,
    /// Dismiss the dropdown.
    Esc,
}

/// Whether the engine consumed an input signal.
///
/// `Handled` means the adapter should suppress the input's default action;
/// `Propagate` means the input should take its normal effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandling {
    /// The engine consumed the input.
    Handled,
    /// The input should take its normal effect.
    Propagate,
}

/// Caret geometry reported by the editor adapter, used to anchor the
/// dropdown. `left` is used for left-to-right surfaces, `right` for
/// right-to-left ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorOffset {
    /// Distance from the top of the viewport to the caret line.
    pub top: f64,
    /// Height of the caret line.
    pub line_height: f64,
    /// Distance from the left edge, when applicable.
    pub left: Option<f64>,
    /// Distance from the right edge, when applicable.
    pub right: Option<f64>,
}

/// Text splice computed from a selected candidate: the full new text on
/// both sides of the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    /// New text before the caret.
    pub before_cursor: String,
    /// New text after the caret.
    pub after_cursor: String,
}

/// Adapter over a concrete text-editing surface.
pub trait Editor {
    /// Text from the start of the surface to the caret.
    ///
    /// `None` means there is no single caret position (for example a
    /// multi-character selection), which suppresses querying.
    fn get_before_cursor(&self) -> Option<String>;

    /// Text from the caret to the end of the surface.
    fn get_after_cursor(&self) -> String;

    /// Current caret geometry, or `None` when it cannot be determined.
    fn get_cursor_offset(&self) -> Option<CursorOffset>;

    /// Apply a computed text splice, restoring caret position and focus.
    fn apply_change(&mut self, change: TextChange);

    /// Release any resources held by the adapter.
    fn destroy(&mut self);
}
