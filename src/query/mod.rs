//! Query construction and execution.
//!
//! The [`QueryExecutor`] turns the text before the caret into a [`Query`]
//! by probing the registered strategies in order, then drives the winning
//! strategy's search. Results come back through a consumable
//! [`SearchSink`], possibly after the executor has already returned:
//! the engine never blocks on a search.
//!
//! Precedence is first-match-wins: the first strategy whose matcher accepts
//! the text owns the query, and no later strategy is tried. This is a
//! registration-order rule, not a best-match rule.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::Result;
use crate::result::SearchResult;
use crate::strategy::{MatchData, Strategy};

/// Consumer receiving each result batch together with the sequence number
/// of the query that produced it.
pub(crate) type HitConsumer<T> = Rc<dyn Fn(u64, Vec<SearchResult<T>>)>;

/// The result of matching text against one strategy: the match itself, the
/// extracted search term, a shared reference to the producing strategy, and
/// the sequence number assigned to this text change.
///
/// Queries are transient: one is created per text change and discarded once
/// its results have been delivered.
pub struct Query<T> {
    strategy: Rc<Strategy<T>>,
    term: String,
    match_data: MatchData,
    seq: u64,
}

impl<T> Query<T> {
    pub(crate) fn new(
        strategy: Rc<Strategy<T>>,
        term: String,
        match_data: MatchData,
        seq: u64,
    ) -> Self {
        Self {
            strategy,
            term,
            match_data,
            seq,
        }
    }

    /// The strategy that produced this query.
    pub fn strategy(&self) -> &Rc<Strategy<T>> {
        &self.strategy
    }

    /// The extracted search term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The match that produced this query.
    pub fn match_data(&self) -> &MatchData {
        &self.match_data
    }

    /// Sequence number of the text change that produced this query.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("strategy", &self.strategy.id())
            .field("term", &self.term)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}

/// One-shot delivery handle for search results.
///
/// A sink is handed to a strategy's search function, which may commit
/// results before returning, move the sink somewhere and commit later, or
/// drop it without ever committing. Consuming `self` on commit enforces
/// "at most one delivery per search invocation" at the type level.
pub struct SearchSink<T> {
    strategy: Rc<Strategy<T>>,
    term: String,
    seq: u64,
    populate_cache: bool,
    consumer: HitConsumer<T>,
}

impl<T: Clone> SearchSink<T> {
    pub(crate) fn new(
        strategy: Rc<Strategy<T>>,
        term: String,
        seq: u64,
        consumer: HitConsumer<T>,
    ) -> Self {
        Self {
            strategy,
            term,
            seq,
            populate_cache: false,
            consumer,
        }
    }

    /// Deliver the raw candidates, consuming the sink.
    ///
    /// Each candidate is wrapped as a [`SearchResult`] bound to the query's
    /// term and strategy; the (possibly empty) batch is then reported to
    /// the engine.
    pub fn commit(self, results: Vec<T>) {
        if self.populate_cache {
            self.strategy.store_cached(&self.term, &results);
        }
        let batch: Vec<SearchResult<T>> = results
            .into_iter()
            .map(|data| {
                SearchResult::new(data, self.term.clone(), Rc::clone(&self.strategy))
            })
            .collect();
        trace!(seq = self.seq, count = batch.len(), "delivering search results");
        (self.consumer)(self.seq, batch);
    }

    pub(crate) fn populating_cache(mut self) -> Self {
        self.populate_cache = true;
        self
    }
}

/// Matches text against registered strategies and drives the search.
pub struct QueryExecutor<T> {
    consumer: HitConsumer<T>,
    next_seq: Cell<u64>,
}

impl<T: Clone + 'static> QueryExecutor<T> {
    /// Create an executor reporting result batches to `consumer`.
    ///
    /// The consumer receives the sequence number of the originating query
    /// alongside each batch, so stale batches can be recognized.
    pub fn new(consumer: impl Fn(u64, Vec<SearchResult<T>>) + 'static) -> Self {
        Self {
            consumer: Rc::new(consumer),
            next_seq: Cell::new(0),
        }
    }

    /// Match `text` against `strategies` and run the winning search.
    ///
    /// The first strategy (in registration order) producing a query wins.
    /// If none matches, an empty batch is reported immediately. Errors from
    /// strategy functions propagate to the caller unchanged.
    pub fn run(&self, text: &str, strategies: &[Rc<Strategy<T>>]) -> Result<()> {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);

        for strategy in strategies {
            if let Some(query) = Strategy::create_query(strategy, text, seq)? {
                debug!(
                    strategy = query.strategy().id(),
                    term = query.term(),
                    seq,
                    "strategy matched"
                );
                return self.execute(query);
            }
        }
        trace!(seq, "no strategy matched");
        (self.consumer)(seq, Vec::new());
        Ok(())
    }

    /// Invoke the query's strategy search with a fresh sink.
    fn execute(&self, query: Query<T>) -> Result<()> {
        let sink = SearchSink::new(
            Rc::clone(query.strategy()),
            query.term.clone(),
            query.seq,
            Rc::clone(&self.consumer),
        );
        query.strategy.search(&query.term, sink, &query.match_data)
    }
}
