//! Typed dropdown lifecycle events.
//!
//! The dropdown announces its state transitions over a fixed set of tagged
//! events. `Show`, `Hide`, `Render`, and `Select` are cancellable: emission
//! returns the aggregated outcome of all listeners, and a single veto
//! aborts the announced transition. Their past-tense counterparts fire
//! after the transition and cannot be cancelled.
//!
//! Listeners are attached through [`Subscription`] handles and detached
//! exactly once, either explicitly or when the channel is torn down.

use crate::result::SearchResult;

/// A dropdown lifecycle event.
///
/// `Select` and `Selected` carry the chosen candidate.
#[derive(Debug)]
pub enum DropdownEvent<'a, T> {
    /// The dropdown is about to become visible (cancellable).
    Show,
    /// The dropdown became visible.
    Shown,
    /// A result batch is about to be rendered (cancellable).
    Render,
    /// A result batch was rendered.
    Rendered,
    /// The dropdown is about to hide (cancellable).
    Hide,
    /// The dropdown was hidden.
    Hidden,
    /// A candidate is about to be selected (cancellable).
    Select(&'a SearchResult<T>),
    /// A candidate was selected.
    Selected(&'a SearchResult<T>),
}

impl<T> DropdownEvent<'_, T> {
    /// Event name for logging and host-side dispatch.
    pub fn name(&self) -> &'static str {
        match self {
            DropdownEvent::Show => "show",
            DropdownEvent::Shown => "shown",
            DropdownEvent::Render => "render",
            DropdownEvent::Rendered => "rendered",
            DropdownEvent::Hide => "hide",
            DropdownEvent::Hidden => "hidden",
            DropdownEvent::Select(_) => "select",
            DropdownEvent::Selected(_) => "selected",
        }
    }

    /// Whether listeners may veto the transition this event announces.
    pub fn cancellable(&self) -> bool {
        matches!(
            self,
            DropdownEvent::Show
                | DropdownEvent::Render
                | DropdownEvent::Hide
                | DropdownEvent::Select(_)
        )
    }
}

/// A listener's verdict on a cancellable event. Ignored for
/// non-cancellable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Let the announced transition happen.
    Proceed,
    /// Veto the announced transition.
    Prevent,
}

impl EventOutcome {
    /// Whether any listener vetoed.
    pub fn prevented(self) -> bool {
        self == EventOutcome::Prevent
    }
}

/// Handle identifying an attached listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

type Listener<T> = Box<dyn FnMut(&DropdownEvent<'_, T>) -> EventOutcome>;

/// Listener registry for dropdown events.
pub(crate) struct EventChannel<T> {
    listeners: Vec<(u64, Listener<T>)>,
    next_id: u64,
}

impl<T> EventChannel<T> {
    pub(crate) fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn subscribe(&mut self, listener: Listener<T>) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        Subscription(id)
    }

    /// Detach a listener. Returns whether it was still attached.
    pub(crate) fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription.0);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener, in attach order, and aggregate
    /// their verdicts. All listeners run even after a veto.
    pub(crate) fn emit(&mut self, event: &DropdownEvent<'_, T>) -> EventOutcome {
        let mut outcome = EventOutcome::Proceed;
        for (_, listener) in &mut self.listeners {
            if listener(event).prevented() {
                outcome = EventOutcome::Prevent;
            }
        }
        outcome
    }

    /// Detach every listener.
    pub(crate) fn clear(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_aggregates_outcomes() {
        let mut channel: EventChannel<String> = EventChannel::new();
        channel.subscribe(Box::new(|_| EventOutcome::Proceed));
        assert!(!channel.emit(&DropdownEvent::Show).prevented());

        channel.subscribe(Box::new(|_| EventOutcome::Prevent));
        assert!(channel.emit(&DropdownEvent::Show).prevented());
    }

    #[test]
    fn test_all_listeners_run_despite_veto() {
        let mut channel: EventChannel<String> = EventChannel::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for (tag, verdict) in [("a", EventOutcome::Prevent), ("b", EventOutcome::Proceed)] {
            let seen = Rc::clone(&seen);
            channel.subscribe(Box::new(move |event| {
                seen.borrow_mut().push(format!("{tag}:{}", event.name()));
                verdict
            }));
        }

        assert!(channel.emit(&DropdownEvent::Hide).prevented());
        assert_eq!(*seen.borrow(), vec!["a:hide", "b:hide"]);
    }

    #[test]
    fn test_unsubscribe_detaches_once() {
        let mut channel: EventChannel<String> = EventChannel::new();
        let count = Rc::new(RefCell::new(0));
        let count_in = Rc::clone(&count);
        let subscription = channel.subscribe(Box::new(move |_| {
            *count_in.borrow_mut() += 1;
            EventOutcome::Proceed
        }));

        channel.emit(&DropdownEvent::Shown);
        assert!(channel.unsubscribe(subscription));
        assert!(!channel.unsubscribe(subscription));
        channel.emit(&DropdownEvent::Shown);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_clear_detaches_everything() {
        let mut channel: EventChannel<String> = EventChannel::new();
        let count = Rc::new(RefCell::new(0));
        for _ in 0..3 {
            let count = Rc::clone(&count);
            channel.subscribe(Box::new(move |_| {
                *count.borrow_mut() += 1;
                EventOutcome::Prevent
            }));
        }
        channel.clear();
        assert!(!channel.emit(&DropdownEvent::Hidden).prevented());
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_cancellable_classification() {
        let cancellable: DropdownEvent<'_, String> = DropdownEvent::Render;
        let finished: DropdownEvent<'_, String> = DropdownEvent::Rendered;
        assert!(cancellable.cancellable());
        assert!(!finished.cancellable());
    }
}
