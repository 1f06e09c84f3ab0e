//! Recency ranking.

use tweetdex_types::{SearchHit, Timestamp};

use crate::index::postings::{newest_inline, DocSet};
use crate::store::CorpusStore;

/// Resolves the `limit` most recent matches to hits, newest first.
///
/// Timestamps are unique, so the order is total and no tie-breaking is
/// needed. Fewer matches than `limit` are returned as-is, never padded.
pub fn rank(matches: &DocSet, store: &CorpusStore, limit: usize) -> Vec<SearchHit> {
    newest_inline(matches, limit)
        .into_iter()
        .filter_map(|timestamp| {
            let text = store.get(timestamp);
            debug_assert!(text.is_some(), "matched timestamp {timestamp} is not stored");
            text.map(|text| SearchHit::new(timestamp, text))
        })
        .collect()
}

/// Splits hits into parallel `(texts, timestamps)` sequences.
pub fn into_parts(hits: Vec<SearchHit>) -> (Vec<String>, Vec<Timestamp>) {
    hits.into_iter()
        .map(|hit| (hit.text, hit.timestamp))
        .unzip()
}
