//! Search results and replacement computation.
//!
//! A [`SearchResult`] wraps one raw candidate value together with the term
//! and strategy that produced it. It renders itself for presentation and,
//! on selection, computes the text splice applied to the editing surface.

use std::fmt;
use std::rc::Rc;

use crate::editor::TextChange;
use crate::error::Result;
use crate::strategy::{MatchData, Replacement, Strategy};

/// One candidate value bound to the query that produced it. Immutable;
/// held in the dropdown until superseded by the next query or consumed by
/// a selection.
#[derive(Clone)]
pub struct SearchResult<T> {
    data: T,
    term: String,
    strategy: Rc<Strategy<T>>,
}

impl<T: Clone> SearchResult<T> {
    pub(crate) fn new(data: T, term: String, strategy: Rc<Strategy<T>>) -> Self {
        Self {
            data,
            term,
            strategy,
        }
    }

    /// The raw candidate value.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// The search term this candidate was produced for.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Id of the producing strategy, if it has one.
    pub fn strategy_id(&self) -> Option<&str> {
        self.strategy.id()
    }

    /// Compute the text splice for this candidate.
    ///
    /// Asks the strategy for a replacement, re-runs its matcher against the
    /// current before-caret text (the match that produced the query must
    /// still hold), substitutes `$&` and `$N` placeholders, and splices the
    /// body over the matched range. Returns `None` when the strategy
    /// declines to replace or the text no longer matches; the editing
    /// surface is then left untouched.
    ///
    /// # Arguments
    /// * `before_cursor` - Current text before the caret
    /// * `after_cursor` - Current text after the caret
    pub fn replace(
        &self,
        before_cursor: &str,
        after_cursor: &str,
    ) -> Result<Option<TextChange>> {
        let Some(replacement) = self.strategy.replace(&self.data)? else {
            return Ok(None);
        };
        let (body, seed) = match replacement {
            Replacement::Text(body) => (body, None),
            Replacement::Around { before, after } => (before, Some(after)),
        };
        let Some(match_data) = self.strategy.match_text(before_cursor)? else {
            return Ok(None);
        };

        let body = substitute_placeholders(&body, &match_data);
        let mut new_before = String::with_capacity(before_cursor.len() + body.len());
        new_before.push_str(&before_cursor[..match_data.offset()]);
        new_before.push_str(&body);
        new_before.push_str(&before_cursor[match_data.end()..]);

        let new_after = match seed {
            Some(prefix) => format!("{prefix}{after_cursor}"),
            None => after_cursor.to_owned(),
        };
        Ok(Some(TextChange {
            before_cursor: new_before,
            after_cursor: new_after,
        }))
    }
}

impl<T: Clone + fmt::Display> SearchResult<T> {
    /// Render this candidate for presentation.
    ///
    /// Uses the strategy's template when one is configured, otherwise the
    /// candidate's `Display` rendering.
    pub fn render(&self) -> String {
        self.strategy
            .apply_template(&self.data, &self.term)
            .unwrap_or_else(|| self.data.to_string())
    }
}

impl<T: fmt::Debug> fmt::Debug for SearchResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResult")
            .field("data", &self.data)
            .field("term", &self.term)
            .field("strategy", &self.strategy.id())
            .finish()
    }
}

/// Substitute replacement placeholders in a single pass: `$&` becomes the
/// whole matched text, `$N` (one digit) becomes capture group N (empty when
/// the group did not participate). Any other `$` is kept literally.
fn substitute_placeholders(body: &str, match_data: &MatchData) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('&') => {
                chars.next();
                out.push_str(match_data.matched());
            }
            Some(d) if d.is_ascii_digit() => {
                let group = *d as usize - '0' as usize;
                chars.next();
                out.push_str(match_data.group(group).unwrap_or(""));
            }
            _ => out.push('$'),
        }
    }
    out
}
