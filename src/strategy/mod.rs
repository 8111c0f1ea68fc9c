//! Completion strategies.
//!
//! A [`Strategy`] is an immutable rule pairing a text matcher with a search
//! and a replace behavior:
//!
//! - **match**: recognizes completable text and extracts capture groups
//! - **search**: produces candidate values for the extracted term, either
//!   synchronously or deferred through a consumable [`SearchSink`]
//! - **replace**: turns a chosen candidate into the text spliced into the
//!   editing surface
//!
//! Strategies may additionally narrow the text with a `context` function,
//! render candidates with a `template`, and cache search results per term.
//! After construction a strategy never changes, except for its internal
//! result cache.

mod matcher;

pub use matcher::{MatchData, MatchFn, Matcher};

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{BoxError, Result, StrategyError};
use crate::query::{Query, SearchSink};

/// Capture group used as the search term when none is configured.
///
/// Typical patterns shaped like `(^|\s)@(\w*)$` put the term in group 2.
pub const DEFAULT_TERM_INDEX: usize = 2;

/// Search function: receives the term, a consumable result sink, and the
/// match that produced the term. May deliver through the sink before
/// returning, hold onto it and deliver later, or drop it (never deliver).
pub type SearchFn<T> = Box<
    dyn Fn(&str, SearchSink<T>, &MatchData) -> std::result::Result<(), BoxError>,
>;

/// Replace function: maps a chosen candidate to its replacement, or `None`
/// to leave the editing surface untouched.
pub type ReplaceFn<T> =
    Box<dyn Fn(&T) -> std::result::Result<Option<Replacement>, BoxError>>;

/// Template function: renders a candidate (given the term) as markup.
pub type TemplateFn<T> = Box<dyn Fn(&T, &str) -> String>;

/// Context function: inspects the full text and decides the strategy's
/// matching scope.
pub type ContextFn =
    Box<dyn Fn(&str) -> std::result::Result<ContextScope, BoxError>>;

/// Outcome of a strategy's context function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextScope {
    /// Match against this substring instead of the full text.
    Narrow(String),

    /// Match against the full text.
    Keep,

    /// The strategy does not apply here; no query is produced.
    ///
    /// Deprecated: prefer not registering the strategy at all.
    Reject,
}

/// Replacement produced by a strategy's replace function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Replace the matched text; the caret ends up after the inserted text.
    Text(String),

    /// Replace the matched text and seed the text after the caret; the
    /// caret ends up between the two parts.
    Around {
        /// Inserted in place of the matched text, before the caret.
        before: String,
        /// Prepended to the text after the caret.
        after: String,
    },
}

/// An immutable matching + search + replace rule.
///
/// Built by the host at setup time and registered with the engine. The
/// candidate type `T` is whatever the search function produces; its
/// `Display` rendering is used when no template is configured.
pub struct Strategy<T> {
    id: Option<String>,
    matcher: Matcher,
    search: SearchFn<T>,
    replace: ReplaceFn<T>,
    template: Option<TemplateFn<T>>,
    context: Option<ContextFn>,
    cache: Option<RefCell<HashMap<String, Vec<T>>>>,
    term_index: usize,
}

impl<T> Strategy<T> {
    /// Create a strategy from its three required functions.
    ///
    /// # Arguments
    /// * `matcher` - Pattern or predicate recognizing completable text
    /// * `search` - Candidate producer, invoked once per query unless cached
    /// * `replace` - Maps a chosen candidate to its replacement
    pub fn new(
        matcher: impl Into<Matcher>,
        search: impl Fn(&str, SearchSink<T>, &MatchData) -> std::result::Result<(), BoxError>
        + 'static,
        replace: impl Fn(&T) -> std::result::Result<Option<Replacement>, BoxError> + 'static,
    ) -> Self {
        Self {
            id: None,
            matcher: matcher.into(),
            search: Box::new(search),
            replace: Box::new(replace),
            template: None,
            context: None,
            cache: None,
            term_index: DEFAULT_TERM_INDEX,
        }
    }

    /// Set the strategy id, used only for presentation grouping.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the candidate template, overriding the `Display` rendering.
    pub fn with_template(mut self, template: impl Fn(&T, &str) -> String + 'static) -> Self {
        self.template = Some(Box::new(template));
        self
    }

    /// Set the context function deciding the strategy's matching scope.
    pub fn with_context(
        mut self,
        context: impl Fn(&str) -> std::result::Result<ContextScope, BoxError> + 'static,
    ) -> Self {
        self.context = Some(Box::new(context));
        self
    }

    /// Use the given capture group as the search term instead of group
    /// [`DEFAULT_TERM_INDEX`].
    pub fn with_term_index(mut self, index: usize) -> Self {
        self.term_index = index;
        self
    }

    /// Enable the per-term result cache.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(RefCell::new(HashMap::new()));
        self
    }

    /// The strategy id, if one was configured.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Apply the matcher to `text`.
    pub fn match_text(&self, text: &str) -> Result<Option<MatchData>> {
        self.matcher.evaluate(text).map_err(|source| {
            StrategyError::Match {
                strategy: self.id.clone(),
                source,
            }
            .into()
        })
    }

    /// Delegate to the replace function for a chosen candidate.
    ///
    /// `None` means "do not modify the editing surface".
    pub fn replace(&self, data: &T) -> Result<Option<Replacement>> {
        (self.replace)(data).map_err(|source| {
            StrategyError::Replace {
                strategy: self.id.clone(),
                source,
            }
            .into()
        })
    }

    /// Render a candidate through the template, if one is configured.
    pub(crate) fn apply_template(&self, data: &T, term: &str) -> Option<String> {
        self.template.as_ref().map(|template| template(data, term))
    }

    /// Clear the result cache. Called when the engine is torn down.
    pub fn destroy(&self) {
        if let Some(cache) = &self.cache {
            cache.borrow_mut().clear();
        }
    }
}

impl<T: Clone> Strategy<T> {
    /// Match `text` against this strategy and build a query on success.
    ///
    /// The context function, when present, is applied first and may narrow
    /// the text or reject it outright (the deprecated rejection path).
    /// On a match, the capture group at the configured term index becomes
    /// the search term; a match without that group produces no query.
    pub fn create_query(
        strategy: &Rc<Self>,
        text: &str,
        seq: u64,
    ) -> Result<Option<Query<T>>> {
        let narrowed;
        let mut scope = text;
        if let Some(context) = &strategy.context {
            let outcome = context(text).map_err(|source| StrategyError::Context {
                strategy: strategy.id.clone(),
                source,
            })?;
            match outcome {
                ContextScope::Narrow(inner) => {
                    narrowed = inner;
                    scope = &narrowed;
                }
                ContextScope::Keep => {}
                ContextScope::Reject => return Ok(None),
            }
        }
        let Some(match_data) = strategy.match_text(scope)? else {
            return Ok(None);
        };
        let term = match match_data.group(strategy.term_index) {
            Some(term) => term.to_owned(),
            None => return Ok(None),
        };
        Ok(Some(Query::new(Rc::clone(strategy), term, match_data, seq)))
    }

    /// Run the search for `term`, delivering results through `sink`.
    ///
    /// With caching enabled, a cached term is served synchronously and the
    /// underlying search function is not invoked; a miss invokes it with a
    /// sink that populates the cache on delivery. Without caching the call
    /// is delegated directly. The sink fires at most once; the search
    /// function may also drop it and never deliver.
    pub fn search(
        &self,
        term: &str,
        sink: SearchSink<T>,
        match_data: &MatchData,
    ) -> Result<()> {
        if let Some(cache) = &self.cache {
            let hit = cache.borrow().get(term).cloned();
            if let Some(results) = hit {
                sink.commit(results);
                return Ok(());
            }
            return (self.search)(term, sink.populating_cache(), match_data).map_err(
                |source| {
                    StrategyError::Search {
                        strategy: self.id.clone(),
                        source,
                    }
                    .into()
                },
            );
        }
        (self.search)(term, sink, match_data).map_err(|source| {
            StrategyError::Search {
                strategy: self.id.clone(),
                source,
            }
            .into()
        })
    }

    pub(crate) fn store_cached(&self, term: &str, results: &[T]) {
        if let Some(cache) = &self.cache {
            cache.borrow_mut().insert(term.to_owned(), results.to_vec());
        }
    }
}

impl<T> fmt::Debug for Strategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("id", &self.id)
            .field("term_index", &self.term_index)
            .field("cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use regex::Regex;

    fn mention_strategy() -> Strategy<String> {
        Strategy::new(
            Regex::new(r"(^|\s)@(\w*)$").unwrap(),
            |_term, sink, _match| {
                sink.commit(vec!["alice".to_string(), "bob".to_string()]);
                Ok(())
            },
            |name: &String| Ok(Some(Replacement::Text(format!("@{name} ")))),
        )
        .with_id("mention")
    }

    fn collect_sink(
        strategy: &Rc<Strategy<String>>,
        term: &str,
        collected: Rc<RefCell<Vec<String>>>,
    ) -> SearchSink<String> {
        SearchSink::new(
            Rc::clone(strategy),
            term.to_string(),
            0,
            Rc::new(move |_seq, results| {
                collected
                    .borrow_mut()
                    .extend(results.into_iter().map(|r| r.data().clone()));
            }),
        )
    }

    #[test]
    fn test_create_query_extracts_term() {
        let strategy = Rc::new(mention_strategy());
        let query = Strategy::create_query(&strategy, "hello @al", 0)
            .unwrap()
            .unwrap();

        assert_eq!(query.term(), "al");
        assert_eq!(query.match_data().matched(), " @al");
    }

    #[test]
    fn test_create_query_no_match() {
        let strategy = Rc::new(mention_strategy());
        assert!(
            Strategy::create_query(&strategy, "plain text", 0)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_create_query_missing_term_group() {
        // Pattern with a single group; the default term index (2) is absent.
        let strategy: Rc<Strategy<String>> = Rc::new(Strategy::new(
            Regex::new(r"@(\w+)$").unwrap(),
            |_, _, _| Ok(()),
            |_: &String| Ok(None),
        ));
        assert!(
            Strategy::create_query(&strategy, "hi @al", 0)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_context_narrows_text() {
        // Match only within the final word of the text.
        let strategy = Rc::new(
            Strategy::new(
                Regex::new(r"(~)(\w*)$").unwrap(),
                |_, _, _| Ok(()),
                |_: &String| Ok(None),
            )
            .with_context(|text| {
                Ok(match text.rsplit(' ').next() {
                    Some(word) => ContextScope::Narrow(word.to_string()),
                    None => ContextScope::Keep,
                })
            }),
        );

        let query = Strategy::create_query(&strategy, "one two ~th", 0)
            .unwrap()
            .unwrap();
        assert_eq!(query.term(), "th");
        // Offsets are relative to the narrowed scope.
        assert_eq!(query.match_data().offset(), 0);
    }

    #[test]
    fn test_context_reject_yields_no_query() {
        let strategy = Rc::new(
            Strategy::new(
                Regex::new(r"@(\w*)$").unwrap(),
                |_, _, _| Ok(()),
                |_: &String| Ok(None),
            )
            .with_term_index(1)
            .with_context(|_| Ok(ContextScope::Reject)),
        );
        assert!(
            Strategy::create_query(&strategy, "hi @al", 0)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_context_failure_propagates() {
        let strategy = Rc::new(
            Strategy::new(
                Regex::new(r"@(\w*)$").unwrap(),
                |_, _, _| Ok(()),
                |_: &String| Ok(None),
            )
            .with_context(|_| Err("context broke".into())),
        );
        assert!(Strategy::create_query(&strategy, "hi @al", 0).is_err());
    }

    #[test]
    fn test_search_without_cache_invokes_every_time() {
        let calls = Rc::new(Cell::new(0u32));
        let calls_in = Rc::clone(&calls);
        let strategy = Rc::new(Strategy::new(
            Regex::new(r"@(\w*)$").unwrap(),
            move |_term, sink: SearchSink<String>, _match| {
                calls_in.set(calls_in.get() + 1);
                sink.commit(vec!["x".to_string()]);
                Ok(())
            },
            |_: &String| Ok(None),
        ));
        let match_data = MatchData::new(0, vec![Some("@x".into()), Some("x".into())]);

        for _ in 0..2 {
            let collected = Rc::new(RefCell::new(Vec::new()));
            let sink = collect_sink(&strategy, "x", Rc::clone(&collected));
            strategy.search("x", sink, &match_data).unwrap();
            assert_eq!(*collected.borrow(), vec!["x".to_string()]);
        }
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_search_with_cache_invokes_at_most_once() {
        let calls = Rc::new(Cell::new(0u32));
        let calls_in = Rc::clone(&calls);
        let strategy = Rc::new(
            Strategy::new(
                Regex::new(r"@(\w*)$").unwrap(),
                move |_term, sink: SearchSink<String>, _match| {
                    calls_in.set(calls_in.get() + 1);
                    sink.commit(vec!["alice".to_string(), "alan".to_string()]);
                    Ok(())
                },
                |_: &String| Ok(None),
            )
            .with_cache(),
        );
        let match_data = MatchData::new(0, vec![Some("@al".into()), Some("al".into())]);

        let first = Rc::new(RefCell::new(Vec::new()));
        let sink = collect_sink(&strategy, "al", Rc::clone(&first));
        strategy.search("al", sink, &match_data).unwrap();

        let second = Rc::new(RefCell::new(Vec::new()));
        let sink = collect_sink(&strategy, "al", Rc::clone(&second));
        strategy.search("al", sink, &match_data).unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(*first.borrow(), *second.borrow());
        assert_eq!(*second.borrow(), vec!["alice".to_string(), "alan".to_string()]);
    }

    #[test]
    fn test_destroy_clears_cache() {
        let calls = Rc::new(Cell::new(0u32));
        let calls_in = Rc::clone(&calls);
        let strategy = Rc::new(
            Strategy::new(
                Regex::new(r"@(\w*)$").unwrap(),
                move |_term, sink: SearchSink<String>, _match| {
                    calls_in.set(calls_in.get() + 1);
                    sink.commit(vec!["alice".to_string()]);
                    Ok(())
                },
                |_: &String| Ok(None),
            )
            .with_cache(),
        );
        let match_data = MatchData::new(0, vec![Some("@al".into()), Some("al".into())]);

        let collected = Rc::new(RefCell::new(Vec::new()));
        let sink = collect_sink(&strategy, "al", Rc::clone(&collected));
        strategy.search("al", sink, &match_data).unwrap();

        strategy.destroy();

        let sink = collect_sink(&strategy, "al", Rc::clone(&collected));
        strategy.search("al", sink, &match_data).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_replace_delegates() {
        let strategy = mention_strategy();
        let replacement = strategy.replace(&"alice".to_string()).unwrap();
        assert_eq!(replacement, Some(Replacement::Text("@alice ".to_string())));
    }

    #[test]
    fn test_replace_failure_carries_id() {
        let strategy: Strategy<String> = Strategy::new(
            Regex::new(r"@(\w*)$").unwrap(),
            |_, _, _| Ok(()),
            |_: &String| Err("no replacement available".into()),
        )
        .with_id("mention");

        let err = strategy.replace(&"x".to_string()).unwrap_err();
        assert!(err.to_string().contains("mention"));
    }
}
