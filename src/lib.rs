//! Editor-agnostic autocomplete engine.
//!
//! This library attaches an autocomplete behavior to any text-editing
//! surface: as the user types, the text before the caret is matched against
//! registered completion strategies, candidates are looked up and presented
//! in a navigable dropdown, and a selected candidate is spliced back into
//! the text.
//!
//! # Modules
//!
//! - `config`: Engine and dropdown configuration
//! - `dropdown`: Dropdown state machine, navigation, and lifecycle events
//! - `editor`: Editor adapter seam and input signals
//! - `engine`: Top-level coordination and lifecycle state machine
//! - `error`: Error types and handling
//! - `query`: Query construction and search execution
//! - `render`: Presentation backend seam
//! - `result`: Search results and replacement computation
//! - `strategy`: Completion strategies
//!
//! # Example
//!
//! ```no_run
//! use regex::Regex;
//! use typeahead::{
//!     CursorOffset, Editor, EditorEvent, NullRenderer, Replacement, SearchSink,
//!     Strategy, TextChange, Typeahead, TypeaheadConfig,
//! };
//!
//! struct Buffer {
//!     before: String,
//!     after: String,
//! }
//!
//! impl Editor for Buffer {
//!     fn get_before_cursor(&self) -> Option<String> {
//!         Some(self.before.clone())
//!     }
//!     fn get_after_cursor(&self) -> String {
//!         self.after.clone()
//!     }
//!     fn get_cursor_offset(&self) -> Option<CursorOffset> {
//!         Some(CursorOffset { top: 0.0, line_height: 16.0, left: Some(0.0), right: None })
//!     }
//!     fn apply_change(&mut self, change: TextChange) {
//!         self.before = change.before_cursor;
//!         self.after = change.after_cursor;
//!     }
//!     fn destroy(&mut self) {}
//! }
//!
//! fn main() -> typeahead::Result<()> {
//!     let mention = Strategy::new(
//!         Regex::new(r"(^|\s)@(\w*)$").unwrap(),
//!         |term, sink: SearchSink<String>, _match| {
//!             let users = ["alice", "bob"];
//!             sink.commit(
//!                 users
//!                     .iter()
//!                     .filter(|u| u.starts_with(term))
//!                     .map(|u| u.to_string())
//!                     .collect(),
//!             );
//!             Ok(())
//!         },
//!         |name: &String| Ok(Some(Replacement::Text(format!("$1@{name} ")))),
//!     )
//!     .with_id("mention");
//!
//!     let editor = Buffer { before: "hi @al".to_string(), after: String::new() };
//!     let mut typeahead = Typeahead::new(
//!         editor,
//!         vec![mention],
//!         TypeaheadConfig::default(),
//!         Box::new(NullRenderer),
//!     )?;
//!     typeahead.start();
//!     typeahead.dispatch(EditorEvent::Change)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dropdown;
pub mod editor;
pub mod engine;
pub mod error;
pub mod query;
pub mod render;
pub mod result;
pub mod strategy;

// Re-export commonly used types
pub use config::{DropdownConfig, Placement, TypeaheadConfig};
pub use dropdown::{Dropdown, DropdownEvent, EventOutcome, Subscription};
pub use editor::{CursorOffset, Editor, EditorEvent, EventHandling, TextChange};
pub use engine::{LifecycleState, Typeahead};
pub use error::{BoxError, Result, TypeaheadError};
pub use query::{Query, QueryExecutor, SearchSink};
pub use render::{DropdownRenderer, NullRenderer};
pub use result::SearchResult;
pub use strategy::{ContextScope, MatchData, Matcher, Replacement, Strategy};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
