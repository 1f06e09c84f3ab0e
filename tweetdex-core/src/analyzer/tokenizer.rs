//! Streaming Term Tokenizer
//!
//! Splits stored tweet text into index terms. This is the only text analysis
//! the index performs: no case folding, no punctuation stripping. Index keys
//! are exactly the space-separated runs of the raw text.
//!
//! ## What It Does
//!
//! Given `"hello neeva me"`, it emits each run between ASCII spaces with its
//! position in the document:
//!
//! ```ignore
//! ("hello", 0)
//! ("neeva", 1)
//! ("me", 2)
//! ```
//!
//! Runs of several spaces never produce an empty term.
//!
//! ## Usage
//!
//! ```rust
//! use tweetdex_core::analyzer::Tokenizer;
//!
//! let mut terms = Vec::new();
//! Tokenizer::new().tokenize("hello neeva me", |term, _pos| terms.push(term));
//! assert_eq!(terms, ["hello", "neeva", "me"]);
//! ```

use memchr::memchr_iter;

/// Byte separating terms in stored text.
pub const TERM_SEPARATOR: u8 = b' ';

/// Streaming tokenizer: splits text on ASCII spaces.
///
/// Tokens are slices of the input, so tokenizing never allocates. Splitting
/// only on an ASCII byte keeps every slice on a UTF-8 character boundary.
#[derive(Debug, Copy, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a new tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Tokenizes `text` and emits `(term, position)` for every non-empty term.
    ///
    /// Positions count emitted terms, starting at 0. After emitting a term
    /// at position `u32::MAX`, further emissions stop.
    #[inline(always)]
    pub fn tokenize<'t, F>(&self, text: &'t str, mut emit: F)
    where
        F: FnMut(&'t str, u32),
    {
        let bytes = text.as_bytes();
        if bytes.is_empty() {
            return;
        }

        let mut start = 0usize;
        let mut pos = 0u32;

        for i in memchr_iter(TERM_SEPARATOR, bytes) {
            if start < i {
                emit(&text[start..i], pos);
                if pos == u32::MAX {
                    return;
                }
                pos += 1;
            }
            start = i + 1;
        }

        if start < bytes.len() {
            emit(&text[start..], pos);
        }
    }
}
