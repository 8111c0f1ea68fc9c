//! Top-level coordination engine.
//!
//! [`Typeahead`] wires an editor adapter to the query pipeline and the
//! dropdown, gated by a lifecycle state machine:
//!
//! ```text
//! Created --start()--> Running <--resume()/suspend()--> Suspended
//!    \___________________ destroy() ____________________/
//!                            |
//!                        Destroyed (terminal)
//! ```
//!
//! While running, editor input drives the pipeline: a text change matches
//! strategies and triggers a search, arriving result batches render into
//! the dropdown, navigation keys move the active candidate, and a
//! confirmed selection is spliced back into the editing surface.
//! Transitions requested from a state that does not permit them are silent
//! no-ops; `destroy` is idempotent and tears the collaborators down
//! exactly once.
//!
//! Everything runs on the thread delivering the triggering event. The only
//! suspension point is a strategy's search: results delivered after the
//! dispatch returns re-enter the engine through the sink, and a batch
//! belonging to a superseded query is dropped rather than overwriting
//! fresher results.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::config::TypeaheadConfig;
use crate::dropdown::{Dropdown, DropdownEvent, EventOutcome, Subscription};
use crate::editor::{Editor, EditorEvent, EventHandling};
use crate::error::Result;
use crate::query::QueryExecutor;
use crate::render::DropdownRenderer;
use crate::result::SearchResult;
use crate::strategy::Strategy;

/// Lifecycle state of a [`Typeahead`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed but not yet started; input is ignored.
    Created,
    /// Actively processing editor input.
    Running,
    /// Temporarily ignoring editor input.
    Suspended,
    /// Torn down; terminal.
    Destroyed,
}

/// State shared with in-flight search sinks: the editor adapter, the
/// dropdown, and the stale-batch guard.
struct Session<T, E: Editor> {
    editor: E,
    dropdown: Dropdown<T>,
    last_applied: Option<u64>,
    destroyed: bool,
}

impl<T: Clone + fmt::Display, E: Editor> Session<T, E> {
    /// Handle an arriving result batch.
    ///
    /// Batches from superseded queries are dropped. A non-empty batch
    /// renders only when the editor can still report caret geometry;
    /// without an anchor point (or with an empty batch) the dropdown
    /// deactivates instead.
    fn on_hit(session: &Rc<RefCell<Self>>, seq: u64, results: Vec<SearchResult<T>>) {
        let mut session = session.borrow_mut();
        if session.destroyed {
            return;
        }
        if let Some(last) = session.last_applied {
            if seq < last {
                debug!(seq, last, "dropping stale result batch");
                return;
            }
        }
        session.last_applied = Some(seq);
        if !results.is_empty() {
            if let Some(anchor) = session.editor.get_cursor_offset() {
                session.dropdown.render(results, &anchor);
                return;
            }
            trace!(seq, "no caret geometry, discarding results");
        }
        session.dropdown.deactivate();
    }
}

/// The autocomplete engine: owns the dropdown and the query executor, is
/// handed an editor adapter and the strategies, and sequences the whole
/// pipeline through its lifecycle state machine.
pub struct Typeahead<T, E: Editor> {
    state: LifecycleState,
    session: Rc<RefCell<Session<T, E>>>,
    strategies: Vec<Rc<Strategy<T>>>,
    executor: QueryExecutor<T>,
}

impl<T, E> Typeahead<T, E>
where
    T: Clone + fmt::Display + 'static,
    E: Editor + 'static,
{
    /// Create an engine in the `Created` state.
    ///
    /// # Arguments
    /// * `editor` - Adapter over the text-editing surface
    /// * `strategies` - Completion rules, probed in registration order
    /// * `config` - Engine configuration
    /// * `renderer` - Presentation backend for the dropdown
    pub fn new(
        editor: E,
        strategies: Vec<Strategy<T>>,
        config: TypeaheadConfig,
        renderer: Box<dyn DropdownRenderer>,
    ) -> Result<Self> {
        let dropdown = Dropdown::new(config.dropdown, renderer)?;
        let session = Rc::new(RefCell::new(Session {
            editor,
            dropdown,
            last_applied: None,
            destroyed: false,
        }));
        let weak: Weak<RefCell<Session<T, E>>> = Rc::downgrade(&session);
        let executor = QueryExecutor::new(move |seq, results| {
            if let Some(session) = weak.upgrade() {
                Session::on_hit(&session, seq, results);
            }
        });
        Ok(Self {
            state: LifecycleState::Created,
            session,
            strategies: strategies.into_iter().map(Rc::new).collect(),
            executor,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether the dropdown is currently shown.
    pub fn dropdown_shown(&self) -> bool {
        self.session.borrow().dropdown.shown()
    }

    /// Begin processing editor input. Only valid from `Created`.
    pub fn start(&mut self) {
        if self.state == LifecycleState::Created {
            self.state = LifecycleState::Running;
            debug!("typeahead started");
        }
    }

    /// Stop processing editor input. Only valid from `Running`.
    pub fn suspend(&mut self) {
        if self.state == LifecycleState::Running {
            self.state = LifecycleState::Suspended;
            debug!("typeahead suspended");
        }
    }

    /// Resume processing editor input. Only valid from `Suspended`.
    pub fn resume(&mut self) {
        if self.state == LifecycleState::Suspended {
            self.state = LifecycleState::Running;
            debug!("typeahead resumed");
        }
    }

    /// Tear the engine down: destroy the dropdown and the editor adapter
    /// and clear every strategy cache. Idempotent; later calls no-op.
    pub fn destroy(&mut self) {
        if self.state == LifecycleState::Destroyed {
            return;
        }
        self.state = LifecycleState::Destroyed;
        let mut session = self.session.borrow_mut();
        session.destroyed = true;
        session.dropdown.destroy();
        session.editor.destroy();
        drop(session);
        for strategy in &self.strategies {
            strategy.destroy();
        }
        debug!("typeahead destroyed");
    }

    /// Hide the dropdown. No-op unless running.
    pub fn hide(&mut self) {
        if self.state == LifecycleState::Running {
            self.session.borrow_mut().dropdown.deactivate();
        }
    }

    /// Run the query pipeline for `text` directly, bypassing the editor
    /// read. Strategy failures propagate to the caller.
    pub fn trigger(&mut self, text: &str) -> Result<()> {
        self.executor.run(text, &self.strategies)
    }

    /// Attach a dropdown lifecycle event listener.
    pub fn on(
        &mut self,
        listener: impl FnMut(&DropdownEvent<'_, T>) -> EventOutcome + 'static,
    ) -> Subscription {
        self.session.borrow_mut().dropdown.on(listener)
    }

    /// Detach a listener. Returns whether it was still attached.
    pub fn off(&mut self, subscription: Subscription) -> bool {
        self.session.borrow_mut().dropdown.off(subscription)
    }

    /// Dispatch an editor input signal.
    ///
    /// Ignored (reported as `Propagate`) unless running. A text change
    /// re-runs the query pipeline; navigation moves the active candidate;
    /// enter selects and applies; escape dismisses a shown dropdown.
    ///
    /// # Returns
    /// * `Result<EventHandling>` - Whether the adapter should suppress the
    ///   input's default action
    pub fn dispatch(&mut self, event: EditorEvent) -> Result<EventHandling> {
        if self.state != LifecycleState::Running {
            return Ok(EventHandling::Propagate);
        }
        trace!(?event, "dispatching editor event");
        match event {
            EditorEvent::Change => {
                let before = self.session.borrow().editor.get_before_cursor();
                if let Some(text) = before {
                    self.trigger(&text)?;
                }
                Ok(EventHandling::Propagate)
            }
            EditorEvent::Up => Ok(self.session.borrow_mut().dropdown.up()),
            EditorEvent::Down => Ok(self.session.borrow_mut().dropdown.down()),
            EditorEvent::Enter => {
                let selected = self.session.borrow_mut().dropdown.select(None);
                match selected {
                    Some(result) => {
                        self.apply_selection(&result)?;
                        Ok(EventHandling::Handled)
                    }
                    None => {
                        self.session.borrow_mut().dropdown.deactivate();
                        Ok(EventHandling::Propagate)
                    }
                }
            }
            EditorEvent::Esc => {
                let mut session = self.session.borrow_mut();
                if session.dropdown.shown() {
                    session.dropdown.deactivate();
                    Ok(EventHandling::Handled)
                } else {
                    Ok(EventHandling::Propagate)
                }
            }
        }
    }

    /// Splice a confirmed selection into the editing surface.
    ///
    /// Reads the current text around the caret, computes the replacement,
    /// and applies it through the editor adapter. A missing caret or a
    /// declined replacement leaves the surface untouched.
    fn apply_selection(&mut self, result: &SearchResult<T>) -> Result<()> {
        let mut session = self.session.borrow_mut();
        let Some(before) = session.editor.get_before_cursor() else {
            return Ok(());
        };
        let after = session.editor.get_after_cursor();
        if let Some(change) = result.replace(&before, &after)? {
            debug!(strategy = result.strategy_id(), "applying selection");
            session.editor.apply_change(change);
        }
        Ok(())
    }
}
