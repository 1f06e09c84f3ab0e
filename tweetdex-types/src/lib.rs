//! Core types and errors for the tweetdex search engine.
//!
//! This crate provides the value types shared by the engine and its
//! collaborators (ingestion, CLI). Keeping them separate ensures:
//!
//! - **Cross-crate compatibility**: core and demo agree on hits, config and errors
//! - **Clean boundaries**: no circular dependencies between crates

#![warn(missing_docs)]

use core::fmt;

use thiserror::Error;

/// Unique document identifier.
///
/// Every tweet is keyed by a non-negative integer timestamp. Timestamps are
/// unique within a corpus and double as the recency key for ranking.
pub type Timestamp = u64;

/// Number of hits returned by a search unless configured otherwise.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Deepest query nesting accepted by the parser.
///
/// Every `(` and every `!` opens one level. Deeper queries fail with
/// [`MalformedReason::NestingTooDeep`].
pub const MAX_NESTING_DEPTH: usize = 256;

/// A ranked search hit: the stored tweet text and its timestamp.
///
/// Hits are ordered by timestamp only. A newer hit compares greater, so a
/// descending sort yields the most recent tweets first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Document timestamp
    pub timestamp: Timestamp,
    /// Stored document text
    pub text: String,
}

impl PartialOrd for SearchHit {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchHit {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        // Timestamps are unique, text only breaks ties between hits built by hand.
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl SearchHit {
    /// Creates a new search hit.
    #[inline(always)]
    pub fn new(timestamp: Timestamp, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ts={} text={}", self.timestamp, self.text)
    }
}

/// What the index builder does when a timestamp is ingested twice.
///
/// The stored text is last-write-wins under both policies. They differ only
/// in whether postings of the superseded text survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReingestPolicy {
    /// Drop the old text's postings so every posting reflects stored text.
    #[default]
    Reindex,
    /// Leave the old text's postings in place. Terms that no longer appear
    /// in the stored text still match the overwritten timestamp.
    KeepStale,
}

/// Search configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum number of hits returned per query.
    /// Default: 5 (the most recent matches)
    pub result_limit: usize,
    /// Whether queries are lower-cased before tokenization.
    /// Index keys are never case-folded.
    pub fold_query_case: bool,
    /// Handling of re-ingested timestamps.
    pub reingest: ReingestPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchConfig {
    /// Creates the default configuration.
    pub const fn new() -> Self {
        Self {
            result_limit: DEFAULT_RESULT_LIMIT,
            fold_query_case: true,
            reingest: ReingestPolicy::Reindex,
        }
    }

    /// Returns a copy with a different result limit.
    pub const fn with_result_limit(self, result_limit: usize) -> Self {
        Self {
            result_limit,
            ..self
        }
    }

    /// Returns a copy with a different re-ingestion policy.
    pub const fn with_reingest(self, reingest: ReingestPolicy) -> Self {
        Self { reingest, ..self }
    }

    /// Returns a copy that leaves query case untouched.
    pub const fn case_sensitive(self) -> Self {
        Self {
            fold_query_case: false,
            ..self
        }
    }
}

/// Why a query string could not be turned into a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedReason {
    /// A parenthesis without a partner. `position` is its token index.
    #[error("unbalanced parenthesis at token {position}")]
    UnbalancedParens {
        /// Token index of the unmatched parenthesis.
        position: usize,
    },
    /// A `!` that scopes nothing (end of input, operator or `)`).
    #[error("negation at token {position} has no operand")]
    DanglingNegation {
        /// Token index of the `!`.
        position: usize,
    },
    /// An operator with no right-hand operand, or an operator where an
    /// operand was expected.
    #[error("operator is missing an operand")]
    MissingOperand,
    /// Two operands next to each other with no operator between them.
    #[error("operands must be separated by `&` or `|`")]
    MissingOperator,
    /// An empty query or an empty `()` group.
    #[error("empty query segment")]
    EmptySegment,
    /// More than [`MAX_NESTING_DEPTH`] levels of `(` and `!`.
    #[error("nesting deeper than {} levels at token {}", MAX_NESTING_DEPTH, .position)]
    NestingTooDeep {
        /// Token index where the limit was exceeded.
        position: usize,
    },
}

/// Errors surfaced by the search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The query does not follow the boolean query grammar.
    #[error("malformed query: {reason}")]
    MalformedQuery {
        /// The specific grammar violation.
        reason: MalformedReason,
    },
}

impl SearchError {
    /// Returns the grammar violation behind this error.
    pub const fn reason(&self) -> MalformedReason {
        match self {
            SearchError::MalformedQuery { reason } => *reason,
        }
    }
}

impl From<MalformedReason> for SearchError {
    fn from(reason: MalformedReason) -> Self {
        SearchError::MalformedQuery { reason }
    }
}

/// Result type alias for search operations.
pub type Result<T> = core::result::Result<T, SearchError>;
