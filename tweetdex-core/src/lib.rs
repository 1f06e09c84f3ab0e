//! In-memory boolean search over short timestamped texts.
//!
//! Build a [`TweetIndex`] once from `(timestamp, text)` pairs, then run
//! queries such as `hello & !(neeva | this)` against it. Results are the
//! most recent matches, newest first.
//!
//! ```
//! use tweetdex_core::TweetIndex;
//!
//! let index = TweetIndex::from_tweets([
//!     (1, "hello world"),
//!     (2, "hello neeva"),
//!     (3, "goodbye world"),
//! ]);
//!
//! let (texts, timestamps) = index.search("world & !goodbye").unwrap();
//! assert_eq!(texts, vec!["hello world"]);
//! assert_eq!(timestamps, vec![1]);
//! ```

pub mod analyzer;
pub mod index;
pub mod query;
pub mod store;

pub use index::{into_parts, rank, DocSet, EngineMetrics, IndexBuilder, IndexStats, TweetIndex};
pub use query::{parse_query, BoolOp, Element, Evaluator, Expr, Group, Term};
pub use store::CorpusStore;

pub use tweetdex_types::{
    MalformedReason, ReingestPolicy, Result, SearchConfig, SearchError, SearchHit, Timestamp,
    DEFAULT_RESULT_LIMIT, MAX_NESTING_DEPTH,
};
