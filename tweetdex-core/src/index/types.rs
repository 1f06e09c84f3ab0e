//! Index types.

use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;
use tweetdex_types::{SearchConfig, Timestamp};

use crate::index::postings::DocSet;
use crate::store::CorpusStore;

/// Immutable inverted index over a tweet corpus.
///
/// Built once by [`IndexBuilder`](crate::IndexBuilder) and read-only
/// afterwards. Every query method takes `&self`, and the only interior
/// mutability is an atomic query counter, so a built index can be shared
/// across threads behind an `Arc` without locking.
pub struct TweetIndex {
    /// Term -> timestamps of documents containing it
    pub(crate) terms: FxHashMap<Box<str>, DocSet>,
    /// All timestamps in the corpus (complement base for negation)
    pub(crate) universe: DocSet,
    pub(crate) store: CorpusStore,
    pub(crate) config: SearchConfig,
    /// Total number of queries executed
    pub(crate) query_count: AtomicU64,
    /// Total number of `add` calls during construction
    pub(crate) documents_added: u64,
    /// Number of `add` calls that replaced an existing timestamp
    pub(crate) documents_overwritten: u64,
}

impl TweetIndex {
    /// Builds an index from `(timestamp, text)` pairs with the default config.
    ///
    /// Later pairs win when a timestamp repeats.
    pub fn from_tweets<I, S>(tweets: I) -> Self
    where
        I: IntoIterator<Item = (Timestamp, S)>,
        S: AsRef<str>,
    {
        let mut builder = crate::IndexBuilder::new();
        builder.extend(tweets);
        builder.build()
    }

    /// Returns the number of documents in the index.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the index contains no documents.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the configuration the index was built with.
    #[inline(always)]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Returns the set of all timestamps in the corpus.
    #[inline(always)]
    pub fn universe(&self) -> &DocSet {
        &self.universe
    }

    /// Retrieves a stored tweet by timestamp.
    #[inline(always)]
    pub fn get(&self, timestamp: Timestamp) -> Option<&str> {
        self.store.get(timestamp)
    }

    /// Returns the raw posting list of `term`, if it is indexed.
    #[inline(always)]
    pub fn postings(&self, term: &str) -> Option<&DocSet> {
        self.terms.get(term)
    }

    /// Returns basic metrics about the engine's operation.
    #[inline(always)]
    #[must_use]
    pub fn metrics(&self) -> EngineMetrics {
        EngineMetrics {
            documents_indexed: self.documents_added,
            documents_overwritten: self.documents_overwritten,
            queries_executed: self.query_count.load(Ordering::Relaxed),
            current_doc_count: self.store.len() as u64,
        }
    }

    #[inline(always)]
    pub(crate) fn record_query(&self) {
        self.query_count.fetch_add(1, Ordering::Relaxed);
    }
}

impl core::fmt::Debug for TweetIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TweetIndex")
            .field("documents", &self.store.len())
            .field("terms", &self.terms.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Basic operational metrics for the search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineMetrics {
    /// Total number of documents added, overwrites included.
    pub documents_indexed: u64,
    /// Number of additions that replaced an existing timestamp.
    pub documents_overwritten: u64,
    /// Total number of search queries executed.
    pub queries_executed: u64,
    /// Current number of documents in the index.
    pub current_doc_count: u64,
}
