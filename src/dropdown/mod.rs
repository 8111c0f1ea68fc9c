//! Dropdown state machine.
//!
//! The dropdown holds the current result batch, the active-index cursor,
//! and the visibility flag, and owns all rotation and bounds logic for
//! keyboard navigation. Painting is delegated to the host's
//! [`DropdownRenderer`]; state transitions are announced over the typed
//! event channel, where cancellable events let listeners veto them.
//!
//! Two states: `hidden` (initial) and `shown`. A non-empty render moves to
//! `shown`; deactivation (empty results, a selection, or an explicit hide)
//! clears the batch and the active index and moves back to `hidden`.

mod events;

pub use events::{DropdownEvent, EventOutcome, Subscription};

use std::fmt;

use events::EventChannel;

use crate::config::DropdownConfig;
use crate::editor::{CursorOffset, EventHandling};
use crate::render::DropdownRenderer;
use crate::result::SearchResult;

/// The navigable, visible-or-hidden collection of current search results.
pub struct Dropdown<T> {
    shown: bool,
    active_index: Option<usize>,
    results: Vec<SearchResult<T>>,
    config: DropdownConfig,
    renderer: Box<dyn DropdownRenderer>,
    channel: EventChannel<T>,
}

impl<T: Clone + fmt::Display> Dropdown<T> {
    /// Create a hidden, empty dropdown.
    ///
    /// # Arguments
    /// * `config` - Validated before use; a zero `max_count` is rejected
    /// * `renderer` - Presentation backend receiving all drawing requests
    pub fn new(
        config: DropdownConfig,
        renderer: Box<dyn DropdownRenderer>,
    ) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self {
            shown: false,
            active_index: None,
            results: Vec::new(),
            config,
            renderer,
            channel: EventChannel::new(),
        })
    }

    /// Whether the dropdown is currently shown.
    pub fn shown(&self) -> bool {
        self.shown
    }

    /// The active candidate index, if any.
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// The currently held result batch.
    pub fn results(&self) -> &[SearchResult<T>] {
        &self.results
    }

    /// Attach a lifecycle event listener.
    pub fn on(
        &mut self,
        listener: impl FnMut(&DropdownEvent<'_, T>) -> EventOutcome + 'static,
    ) -> Subscription {
        self.channel.subscribe(Box::new(listener))
    }

    /// Detach a listener. Returns whether it was still attached.
    pub fn off(&mut self, subscription: Subscription) -> bool {
        self.channel.unsubscribe(subscription)
    }

    /// Replace the displayed batch with `results`, anchored at the caret.
    ///
    /// An empty batch deactivates instead. Otherwise the batch is truncated
    /// to the configured maximum (dropping the tail), the active index is
    /// reset, and the renderer is asked to draw and position the list. The
    /// whole render can be vetoed through the cancellable `Render` event;
    /// showing an already-shown dropdown emits no further `Show`/`Shown`.
    pub fn render(&mut self, results: Vec<SearchResult<T>>, anchor: &CursorOffset) {
        if results.is_empty() {
            self.deactivate();
            return;
        }
        if self.channel.emit(&DropdownEvent::Render).prevented() {
            return;
        }
        let mut results = results;
        results.truncate(self.config.max_count);
        self.results = results;
        self.set_active_index(None);

        let items: Vec<String> = self.results.iter().map(SearchResult::render).collect();
        let strategy_id = self
            .results
            .first()
            .and_then(|result| result.strategy_id().map(str::to_owned));
        self.renderer.render(&items, strategy_id.as_deref());
        self.renderer.set_offset(anchor, self.config.placement);
        self.channel.emit(&DropdownEvent::Rendered);
        self.show();
    }

    /// Move the active index up.
    ///
    /// No-op unless shown. From no active index, or from the first entry
    /// with rotation enabled, the index wraps to the last entry; from the
    /// first entry without rotation nothing moves. An effective move
    /// reports the input as handled.
    pub fn up(&mut self) -> EventHandling {
        if !self.shown {
            return EventHandling::Propagate;
        }
        let Some(last) = self.results.len().checked_sub(1) else {
            return EventHandling::Propagate;
        };
        let next = match self.active_index {
            None => Some(last),
            Some(0) => self.config.rotate.then_some(last),
            Some(index) => Some(index - 1),
        };
        match next {
            Some(index) => {
                self.set_active_index(Some(index));
                EventHandling::Handled
            }
            None => EventHandling::Propagate,
        }
    }

    /// Move the active index down. Mirror image of [`Dropdown::up`].
    pub fn down(&mut self) -> EventHandling {
        if !self.shown {
            return EventHandling::Propagate;
        }
        let Some(last) = self.results.len().checked_sub(1) else {
            return EventHandling::Propagate;
        };
        let next = match self.active_index {
            None => Some(0),
            Some(index) if index == last => self.config.rotate.then_some(0),
            Some(index) => Some(index + 1),
        };
        match next {
            Some(index) => {
                self.set_active_index(Some(index));
                EventHandling::Handled
            }
            None => EventHandling::Propagate,
        }
    }

    /// Select a candidate and deactivate.
    ///
    /// Without an explicit index the active index is used; with neither,
    /// nothing is selected. The cancellable `Select` event lets listeners
    /// veto the selection, in which case the dropdown stays shown with the
    /// same active index and `None` is returned.
    pub fn select(&mut self, index: Option<usize>) -> Option<SearchResult<T>> {
        let index = index.or(self.active_index)?;
        let result = self.results.get(index)?.clone();
        if self
            .channel
            .emit(&DropdownEvent::Select(&result))
            .prevented()
        {
            return None;
        }
        self.channel.emit(&DropdownEvent::Selected(&result));
        self.deactivate();
        Some(result)
    }

    /// Hide the dropdown and clear its state.
    ///
    /// No-op when already hidden. A listener vetoing the cancellable `Hide`
    /// event keeps the dropdown shown with its results retained.
    pub fn deactivate(&mut self) {
        if !self.shown {
            return;
        }
        if self.channel.emit(&DropdownEvent::Hide).prevented() {
            return;
        }
        self.renderer.set_visible(false);
        self.shown = false;
        self.results.clear();
        self.set_active_index(None);
        self.channel.emit(&DropdownEvent::Hidden);
    }

    /// Tear the dropdown down: destroy the renderer, drop the state, and
    /// detach every listener.
    pub fn destroy(&mut self) {
        self.renderer.destroy();
        self.results.clear();
        self.active_index = None;
        self.shown = false;
        self.channel.clear();
    }

    fn show(&mut self) {
        if self.shown {
            return;
        }
        if self.channel.emit(&DropdownEvent::Show).prevented() {
            return;
        }
        self.renderer.set_visible(true);
        self.shown = true;
        self.channel.emit(&DropdownEvent::Shown);
    }

    fn set_active_index(&mut self, next: Option<usize>) {
        let prev = std::mem::replace(&mut self.active_index, next);
        if prev != next {
            self.renderer.activate(prev, next);
        }
    }
}
