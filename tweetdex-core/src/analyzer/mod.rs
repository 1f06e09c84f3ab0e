//! Text analysis for stored documents.
//!
//! Stored text is split into terms on ASCII spaces and indexed verbatim.
//! Query text has its own lexer in [`crate::query`].

pub mod tokenizer;

pub use tokenizer::Tokenizer;
