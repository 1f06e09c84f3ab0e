//! Nesting parser: turns a token stream into an expression tree.
//!
//! # Grammar
//!
//! ```text
//! query    := sequence
//! sequence := operand (op operand)*
//! operand  := '!'? TERM | '!'? '(' sequence ')'
//! op       := '&' | '|'
//! ```
//!
//! `&` and `|` share one precedence level. The parser keeps the sequence
//! flat and leaves left-to-right folding to the evaluator, so the tree
//! records operators in source order.

use tweetdex_types::{MalformedReason, Result};

use crate::query::ast::{BoolOp, Element, Expr, Group, Term};
use crate::query::lexer::{check_depth, normalize_negations, tokenize, Token};

/// Parses an already case-folded query string.
///
/// Runs the three front-end stages: tokenize, normalize negations, nest.
///
/// # Errors
///
/// Returns `MalformedQuery` for unbalanced parentheses, a `!` with no
/// operand, or nesting past
/// [`MAX_NESTING_DEPTH`](tweetdex_types::MAX_NESTING_DEPTH). Operand/operator
/// alternation is checked at evaluation time.
pub fn parse_query(query: &str) -> Result<Expr> {
    let tokens = normalize_negations(&tokenize(query))?;
    nest(&tokens)
}

/// Nests a flat token sequence into an [`Expr`].
///
/// Each `(` opens a recursive call that consumes tokens up to its matching
/// `)`, so inner pairs close before outer ones. The finished sub-sequence is
/// spliced in as one [`Group`] element.
///
/// # Errors
///
/// Fails with `NestingTooDeep` before recursing when the tokens nest past
/// [`MAX_NESTING_DEPTH`](tweetdex_types::MAX_NESTING_DEPTH) levels.
pub fn nest(tokens: &[Token]) -> Result<Expr> {
    check_depth(tokens)?;

    let mut cursor = 0;
    nest_sequence(tokens, &mut cursor, None)
}

fn nest_sequence(tokens: &[Token], cursor: &mut usize, opened_at: Option<usize>) -> Result<Expr> {
    let mut elements = Vec::new();
    // Index of a pending `!` waiting for its operand.
    let mut negation: Option<usize> = None;

    while let Some(token) = tokens.get(*cursor) {
        let position = *cursor;
        *cursor += 1;

        match token {
            Token::Term(text) => elements.push(Element::Term(Term {
                text: text.clone(),
                negated: negation.take().is_some(),
            })),
            Token::And | Token::Or => {
                if let Some(position) = negation {
                    return Err(MalformedReason::DanglingNegation { position }.into());
                }
                let op = if *token == Token::And {
                    BoolOp::And
                } else {
                    BoolOp::Or
                };
                elements.push(Element::Operator(op));
            }
            // `! !` cancels out
            Token::Not => {
                negation = match negation {
                    Some(_) => None,
                    None => Some(position),
                };
            }
            Token::LeftParen => {
                let expr = nest_sequence(tokens, cursor, Some(position))?;
                elements.push(Element::Group(Group {
                    expr,
                    negated: negation.take().is_some(),
                }));
            }
            Token::RightParen => {
                if opened_at.is_none() {
                    return Err(MalformedReason::UnbalancedParens { position }.into());
                }
                if let Some(position) = negation {
                    return Err(MalformedReason::DanglingNegation { position }.into());
                }
                return Ok(Expr::new(elements));
            }
        }
    }

    if let Some(position) = opened_at {
        return Err(MalformedReason::UnbalancedParens { position }.into());
    }
    if let Some(position) = negation {
        return Err(MalformedReason::DanglingNegation { position }.into());
    }
    Ok(Expr::new(elements))
}
