//! Text matching for strategies.
//!
//! A strategy matches the text before the caret either with a regular
//! expression or with an arbitrary host predicate. Both produce the same
//! [`MatchData`]: the match offset plus the ordered capture groups, owned so
//! the match can outlive the text it was taken from.

use regex::Regex;

use crate::error::BoxError;

/// Host predicate producing match data directly.
pub type MatchFn =
    Box<dyn Fn(&str) -> std::result::Result<Option<MatchData>, BoxError>>;

/// How a strategy recognizes completable text.
pub enum Matcher {
    /// A regular expression applied to the text.
    Pattern(Regex),

    /// A host predicate invoked with the text.
    Predicate(MatchFn),
}

impl Matcher {
    /// Wrap a host predicate as a matcher.
    pub fn predicate(
        f: impl Fn(&str) -> std::result::Result<Option<MatchData>, BoxError> + 'static,
    ) -> Self {
        Matcher::Predicate(Box::new(f))
    }

    /// Apply the matcher to `text`.
    ///
    /// Pure function of `text`: a pattern is applied directly, a predicate
    /// is invoked. Predicate failures are reported as-is.
    pub fn evaluate(
        &self,
        text: &str,
    ) -> std::result::Result<Option<MatchData>, BoxError> {
        match self {
            Matcher::Pattern(regex) => Ok(regex
                .captures(text)
                .and_then(|caps| MatchData::from_captures(&caps))),
            Matcher::Predicate(f) => f(text),
        }
    }
}

impl From<Regex> for Matcher {
    fn from(regex: Regex) -> Self {
        Matcher::Pattern(regex)
    }
}

/// One successful match: the byte offset where it starts and the ordered
/// capture groups. Group 0 is the whole matched text; groups that did not
/// participate in the match are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchData {
    offset: usize,
    groups: Vec<Option<String>>,
}

impl MatchData {
    /// Create match data from an offset and capture groups.
    ///
    /// Group 0 must be the whole matched text; `offset` is its byte offset
    /// in the matched-against text.
    pub fn new(offset: usize, groups: Vec<Option<String>>) -> Self {
        Self { offset, groups }
    }

    fn from_captures(caps: &regex::Captures<'_>) -> Option<Self> {
        let whole = caps.get(0)?;
        Some(Self {
            offset: whole.start(),
            groups: caps
                .iter()
                .map(|group| group.map(|m| m.as_str().to_owned()))
                .collect(),
        })
    }

    /// The whole matched text.
    pub fn matched(&self) -> &str {
        self.groups.first().and_then(|g| g.as_deref()).unwrap_or("")
    }

    /// Byte offset of the match start.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte offset just past the match end.
    pub fn end(&self) -> usize {
        self.offset + self.matched().len()
    }

    /// Capture group `n`, if it exists and participated in the match.
    pub fn group(&self, n: usize) -> Option<&str> {
        self.groups.get(n).and_then(|g| g.as_deref())
    }

    /// Number of capture groups, counting group 0.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_match_offsets_and_groups() {
        let matcher = Matcher::from(Regex::new(r"(^|\s)@(\w*)$").unwrap());
        let data = matcher.evaluate("hello @al").unwrap().unwrap();

        assert_eq!(data.matched(), " @al");
        assert_eq!(data.offset(), 5);
        assert_eq!(data.end(), 9);
        assert_eq!(data.group(0), Some(" @al"));
        assert_eq!(data.group(1), Some(" "));
        assert_eq!(data.group(2), Some("al"));
        assert_eq!(data.group(3), None);
    }

    #[test]
    fn test_pattern_no_match() {
        let matcher = Matcher::from(Regex::new(r"@(\w+)$").unwrap());
        assert!(matcher.evaluate("no mention here").unwrap().is_none());
    }

    #[test]
    fn test_unmatched_optional_group_is_none() {
        let matcher = Matcher::from(Regex::new(r"(x)?(\w+)$").unwrap());
        let data = matcher.evaluate("abc").unwrap().unwrap();

        assert_eq!(data.group(1), None);
        assert_eq!(data.group(2), Some("abc"));
    }

    #[test]
    fn test_predicate_match() {
        let matcher = Matcher::predicate(|text| {
            Ok(text.strip_suffix("!").map(|head| {
                MatchData::new(
                    head.len(),
                    vec![Some("!".to_string()), Some(head.to_string())],
                )
            }))
        });

        let data = matcher.evaluate("abc!").unwrap().unwrap();
        assert_eq!(data.offset(), 3);
        assert_eq!(data.matched(), "!");
        assert_eq!(data.group(1), Some("abc"));

        assert!(matcher.evaluate("abc").unwrap().is_none());
    }

    #[test]
    fn test_predicate_failure_propagates() {
        let matcher = Matcher::predicate(|_| Err("predicate blew up".into()));
        assert!(matcher.evaluate("anything").is_err());
    }
}
