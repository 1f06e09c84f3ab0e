//! Index building logic.

use std::sync::atomic::AtomicU64;

use rustc_hash::FxHashMap;
use tracing::debug;
use tweetdex_types::{ReingestPolicy, SearchConfig, Timestamp};

use crate::analyzer::Tokenizer;
use crate::index::postings::DocSet;
use crate::index::types::TweetIndex;
use crate::store::CorpusStore;

/// Accumulates documents and freezes them into a [`TweetIndex`].
///
/// Posting lists are gathered unsorted while documents arrive and are sorted
/// and deduplicated once in [`build`](IndexBuilder::build).
pub struct IndexBuilder {
    config: SearchConfig,
    tokenizer: Tokenizer,
    pending: FxHashMap<String, Vec<Timestamp>>,
    store: CorpusStore,
    documents_added: u64,
    documents_overwritten: u64,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    /// Creates a builder with a custom configuration.
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            tokenizer: Tokenizer::new(),
            pending: FxHashMap::default(),
            store: CorpusStore::new(),
            documents_added: 0,
            documents_overwritten: 0,
        }
    }

    /// Returns the number of distinct timestamps added so far.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing was added yet.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Adds one tweet. A repeated timestamp replaces the stored text.
    ///
    /// Under [`ReingestPolicy::Reindex`] the replaced text's postings are
    /// dropped. Under [`ReingestPolicy::KeepStale`] they are kept.
    pub fn add(&mut self, timestamp: Timestamp, text: &str) -> &mut Self {
        self.documents_added += 1;

        if let Some(previous) = self.store.insert(timestamp, text) {
            self.documents_overwritten += 1;
            debug!(timestamp, policy = ?self.config.reingest, "re-ingested timestamp");

            if self.config.reingest == ReingestPolicy::Reindex {
                let pending = &mut self.pending;
                self.tokenizer.tokenize(previous, |term, _| {
                    if let Some(list) = pending.get_mut(term) {
                        list.retain(|&ts| ts != timestamp);
                        if list.is_empty() {
                            pending.remove(term);
                        }
                    }
                });
            }
        }

        let pending = &mut self.pending;
        self.tokenizer.tokenize(text, |term, _| match pending.get_mut(term) {
            Some(list) => list.push(timestamp),
            None => {
                pending.insert(term.to_owned(), vec![timestamp]);
            }
        });

        self
    }

    /// Adds every `(timestamp, text)` pair in order.
    pub fn extend<I, S>(&mut self, tweets: I) -> &mut Self
    where
        I: IntoIterator<Item = (Timestamp, S)>,
        S: AsRef<str>,
    {
        for (timestamp, text) in tweets {
            self.add(timestamp, text.as_ref());
        }
        self
    }

    /// Freezes the collected documents into an immutable index.
    pub fn build(self) -> TweetIndex {
        let terms: FxHashMap<Box<str>, DocSet> = self
            .pending
            .into_iter()
            .map(|(term, list)| (term.into_boxed_str(), DocSet::from_unsorted(list)))
            .collect();
        let universe: DocSet = self.store.timestamps().collect();

        debug!(
            documents = universe.len(),
            terms = terms.len(),
            overwritten = self.documents_overwritten,
            "built tweet index"
        );

        TweetIndex {
            terms,
            universe,
            store: self.store,
            config: self.config,
            query_count: AtomicU64::new(0),
            documents_added: self.documents_added,
            documents_overwritten: self.documents_overwritten,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postings_are_sorted_and_deduplicated() {
        let mut builder = IndexBuilder::new();
        builder
            .add(9, "hello hello")
            .add(3, "hello world")
            .add(6, "world hello");
        let index = builder.build();

        let hello = index.postings("hello").expect("hello is indexed");
        assert_eq!(hello.as_slice(), &[3, 6, 9]);
        let world = index.postings("world").expect("world is indexed");
        assert_eq!(world.as_slice(), &[3, 6]);
    }

    #[test]
    fn keys_are_not_case_folded() {
        let index = TweetIndex::from_tweets([(1, "Hello World")]);
        assert!(index.postings("Hello").is_some());
        assert!(index.postings("hello").is_none());
    }

    #[test]
    fn universe_holds_every_timestamp() {
        let index = TweetIndex::from_tweets([(4, "a"), (0, "b"), (7, "")]);
        assert_eq!(index.universe().as_slice(), &[0, 4, 7]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn reindex_drops_stale_postings() {
        let mut builder = IndexBuilder::new();
        builder.add(1, "old words").add(2, "old news").add(1, "new words");
        let index = builder.build();

        assert_eq!(index.get(1), Some("new words"));
        assert_eq!(index.postings("old").map(DocSet::as_slice), Some(&[2][..]));
        assert_eq!(index.postings("new").map(DocSet::as_slice), Some(&[1][..]));
        assert_eq!(index.postings("words").map(DocSet::as_slice), Some(&[1][..]));
    }

    #[test]
    fn reindex_removes_emptied_terms() {
        let mut builder = IndexBuilder::new();
        builder.add(1, "vanishing").add(1, "replacement");
        let index = builder.build();
        assert!(index.postings("vanishing").is_none());
        assert_eq!(index.stats().num_terms, 1);
    }

    #[test]
    fn keep_stale_preserves_old_postings() {
        let config = SearchConfig::new().with_reingest(ReingestPolicy::KeepStale);
        let mut builder = IndexBuilder::with_config(config);
        builder.add(1, "old words").add(1, "new words");
        let index = builder.build();

        assert_eq!(index.get(1), Some("new words"));
        assert_eq!(index.postings("old").map(DocSet::as_slice), Some(&[1][..]));
        assert_eq!(index.postings("words").map(DocSet::as_slice), Some(&[1][..]));
    }

    #[test]
    fn overwrites_are_counted() {
        let mut builder = IndexBuilder::new();
        builder.extend([(1, "a"), (2, "b"), (1, "c"), (1, "d")]);
        assert_eq!(builder.len(), 2);
        let metrics = builder.build().metrics();
        assert_eq!(metrics.documents_indexed, 4);
        assert_eq!(metrics.documents_overwritten, 2);
        assert_eq!(metrics.current_doc_count, 2);
    }

    #[test]
    fn empty_builder_builds_empty_index() {
        let builder = IndexBuilder::new();
        assert!(builder.is_empty());
        let index = builder.build();
        assert!(index.is_empty());
        assert!(index.universe().is_empty());
    }
}
