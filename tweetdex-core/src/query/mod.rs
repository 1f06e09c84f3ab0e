//! Boolean query front end and evaluator.
//!
//! Queries use a small infix language:
//!
//! - `a & b`: both terms (intersection)
//! - `a | b`: either term (union)
//! - `!a`, `!(a | b)`: complement against the whole corpus
//! - `( ... )`: grouping, nested to any depth
//!
//! `&` and `|` bind equally and fold left to right, so `a | b & c` means
//! `(a | b) & c`.
//!
//! The pipeline is [`lexer::tokenize`] → [`lexer::normalize_negations`] →
//! [`parser::nest`] → [`Evaluator::evaluate`].

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod parser;

pub use ast::{BoolOp, Element, Expr, Group, Term};
pub use eval::Evaluator;
pub use lexer::Token;
pub use parser::parse_query;
