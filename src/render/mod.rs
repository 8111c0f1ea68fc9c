//! Presentation backend seam.
//!
//! The dropdown owns all navigation and selection state but never paints
//! anything itself. A host implements [`DropdownRenderer`] to draw the
//! candidate list, position it at the caret, and move the active
//! highlight. Entries arrive already rendered as markup strings, together
//! with the winning strategy's id for header/footer decoration.

use crate::config::Placement;
use crate::editor::CursorOffset;

/// Paints and positions the candidate list.
pub trait DropdownRenderer {
    /// Draw a batch of rendered entries.
    ///
    /// # Arguments
    /// * `items` - Rendered markup, one entry per candidate, in order
    /// * `strategy_id` - Id of the strategy that produced the batch
    fn render(&mut self, items: &[String], strategy_id: Option<&str>);

    /// Position the list relative to the caret anchor.
    fn set_offset(&mut self, anchor: &CursorOffset, placement: Placement);

    /// Show or hide the list.
    fn set_visible(&mut self, visible: bool);

    /// Move the active highlight from `prev` to `next`.
    fn activate(&mut self, prev: Option<usize>, next: Option<usize>);

    /// Release any resources held by the renderer.
    fn destroy(&mut self);
}

/// Renderer that ignores every request. Useful for headless hosts and
/// tests that only exercise the engine state machines.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl DropdownRenderer for NullRenderer {
    fn render(&mut self, _items: &[String], _strategy_id: Option<&str>) {}

    fn set_offset(&mut self, _anchor: &CursorOffset, _placement: Placement) {}

    fn set_visible(&mut self, _visible: bool) {}

    fn activate(&mut self, _prev: Option<usize>, _next: Option<usize>) {}

    fn destroy(&mut self) {}
}
