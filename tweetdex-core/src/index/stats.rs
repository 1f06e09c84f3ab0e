//! Statistics and IndexStats.

use crate::index::types::TweetIndex;

/// A snapshot of index statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of documents in the index.
    pub num_documents: usize,
    /// Number of distinct terms.
    pub num_terms: usize,
    /// Total number of postings across all terms.
    pub total_postings: usize,
    /// Bytes of stored text, including overwritten text.
    pub corpus_bytes: usize,
    /// Bytes of text superseded by re-ingested timestamps.
    pub dead_bytes: usize,
}

impl TweetIndex {
    /// Returns index statistics.
    pub fn stats(&self) -> IndexStats {
        IndexStats::from_index(self)
    }
}

impl IndexStats {
    /// Constructs stats from an index.
    pub fn from_index(index: &TweetIndex) -> Self {
        Self {
            num_documents: index.store.len(),
            num_terms: index.terms.len(),
            total_postings: index.terms.values().map(|postings| postings.len()).sum(),
            corpus_bytes: index.store.buffer_bytes(),
            dead_bytes: index.store.dead_bytes(),
        }
    }

    /// Returns approximate memory usage in bytes: posting lists, universe
    /// and stored text. Hash table overhead and term keys are not counted.
    pub fn memory_usage_bytes(&self) -> usize {
        let timestamp = std::mem::size_of::<tweetdex_types::Timestamp>();
        (self.total_postings + self.num_documents) * timestamp + self.corpus_bytes
    }
}

impl core::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} docs, {} terms, {} postings, {} text bytes",
            self.num_documents, self.num_terms, self.total_postings, self.corpus_bytes
        )?;

        if self.dead_bytes > 0 {
            write!(f, " ({} overwritten)", self.dead_bytes)?;
        }

        Ok(())
    }
}
