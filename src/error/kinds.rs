use std::fmt;

/// Crate-wide `Result` type using [`TypeaheadError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, TypeaheadError>;

/// Error payload produced by host-supplied strategy functions.
///
/// Strategy authors return whatever error type suits them; the engine
/// carries it as a boxed trait object and never inspects it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error type for typeahead operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum TypeaheadError {
    /// A host-supplied strategy function failed.
    Strategy(StrategyError),

    /// Configuration errors.
    Config(ConfigError),
}

/// Failure of one of a strategy's host-supplied functions.
///
/// Each variant records which strategy failed (by id, when the strategy
/// has one) and the underlying error. These are never swallowed by the
/// engine: a failing strategy surfaces to the caller instead of being
/// degraded into an empty result set.
#[derive(Debug)]
pub enum StrategyError {
    /// The match predicate failed.
    Match {
        /// Id of the failing strategy, if it has one.
        strategy: Option<String>,
        /// Underlying error reported by the host function.
        source: BoxError,
    },

    /// The context function failed.
    Context {
        /// Id of the failing strategy, if it has one.
        strategy: Option<String>,
        /// Underlying error reported by the host function.
        source: BoxError,
    },

    /// The search function failed.
    Search {
        /// Id of the failing strategy, if it has one.
        strategy: Option<String>,
        /// Underlying error reported by the host function.
        source: BoxError,
    },

    /// The replace function failed.
    Replace {
        /// Id of the failing strategy, if it has one.
        strategy: Option<String>,
        /// Underlying error reported by the host function.
        source: BoxError,
    },
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

impl StrategyError {
    /// Id of the strategy whose function failed, if it has one.
    pub fn strategy(&self) -> Option<&str> {
        match self {
            StrategyError::Match { strategy, .. }
            | StrategyError::Context { strategy, .. }
            | StrategyError::Search { strategy, .. }
            | StrategyError::Replace { strategy, .. } => strategy.as_deref(),
        }
    }

    fn function(&self) -> &'static str {
        match self {
            StrategyError::Match { .. } => "match",
            StrategyError::Context { .. } => "context",
            StrategyError::Search { .. } => "search",
            StrategyError::Replace { .. } => "replace",
        }
    }

    fn cause(&self) -> &BoxError {
        match self {
            StrategyError::Match { source, .. }
            | StrategyError::Context { source, .. }
            | StrategyError::Search { source, .. }
            | StrategyError::Replace { source, .. } => source,
        }
    }
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for TypeaheadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeaheadError::Strategy(e) => write!(f, "{e}"),
            TypeaheadError::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl fmt::Display for StrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strategy() {
            Some(id) => write!(
                f,
                "Strategy '{id}': {} function failed: {}",
                self.function(),
                self.cause()
            ),
            None => write!(
                f,
                "Strategy {} function failed: {}",
                self.function(),
                self.cause()
            ),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for TypeaheadError {}
impl std::error::Error for StrategyError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to TypeaheadError ========================= */

impl From<StrategyError> for TypeaheadError {
    fn from(err: StrategyError) -> Self {
        TypeaheadError::Strategy(err)
    }
}

impl From<ConfigError> for TypeaheadError {
    fn from(err: ConfigError) -> Self {
        TypeaheadError::Config(err)
    }
}
