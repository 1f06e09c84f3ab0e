//! Append-only Corpus Store
//!
//! Keeps all tweet text in a single contiguous buffer. Documents are
//! referenced by (offset, length) spans keyed by timestamp.
//!
//! ## Memory Layout
//!
//! ```text
//! Buffer: [yay][some tweet][hello neeva me][hello world]...[free space]
//!         ^    ^           ^               ^
//!         |    |           |               |
//! Spans:  0 => (0,3)   2 => (3,10)   5 => (13,14)   8 => (27,11) ...
//! ```
//!
//! ## Overwrites
//!
//! Re-inserting a timestamp appends the new text and repoints its span.
//! The superseded bytes stay in the buffer (counted as dead bytes) and the
//! old span remains readable until the store is dropped.

use rustc_hash::FxHashMap;
use tweetdex_types::Timestamp;

/// Document reference into the store buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DocSpan {
    offset: usize,
    len: usize,
}

impl DocSpan {
    /// Creates a new document span.
    #[inline(always)]
    const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Returns the byte offset in the buffer.
    #[inline(always)]
    const fn offset(self) -> usize {
        self.offset
    }

    /// Returns the byte length.
    #[inline(always)]
    const fn len(self) -> usize {
        self.len
    }

    #[inline(always)]
    const fn end(self) -> usize {
        self.offset + self.len
    }
}

/// Timestamp-keyed document storage.
#[derive(Debug)]
pub struct CorpusStore {
    /// Contiguous text buffer (append only)
    buffer: String,
    /// Live span per timestamp
    spans: FxHashMap<Timestamp, DocSpan>,
    /// Bytes belonging to overwritten documents
    dead_bytes: usize,
}

impl Default for CorpusStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::with_capacity(16 * 1024, 256)
    }

    /// Creates a new store with pre-allocated capacity.
    pub fn with_capacity(buffer_cap: usize, doc_cap: usize) -> Self {
        Self {
            buffer: String::with_capacity(buffer_cap),
            spans: FxHashMap::with_capacity_and_hasher(doc_cap, Default::default()),
            dead_bytes: 0,
        }
    }

    /// Returns the number of documents stored.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns true if no documents are stored.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Stores `text` under `timestamp`, replacing any previous document.
    ///
    /// Returns the replaced document's text, if there was one.
    pub fn insert(&mut self, timestamp: Timestamp, text: &str) -> Option<&str> {
        let span = DocSpan::new(self.buffer.len(), text.len());
        self.buffer.push_str(text);

        let previous = self.spans.insert(timestamp, span)?;
        self.dead_bytes += previous.len();
        Some(&self.buffer[previous.offset()..previous.end()])
    }

    /// Gets a document by timestamp.
    #[inline(always)]
    pub fn get(&self, timestamp: Timestamp) -> Option<&str> {
        let span = self.spans.get(&timestamp)?;
        self.buffer.get(span.offset()..span.end())
    }

    /// Iterates over stored timestamps in arbitrary order.
    pub fn timestamps(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.spans.keys().copied()
    }

    /// Total bytes held by the buffer, live and dead.
    #[inline(always)]
    pub fn buffer_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes held by documents that were overwritten.
    #[inline(always)]
    pub fn dead_bytes(&self) -> usize {
        self.dead_bytes
    }
}
