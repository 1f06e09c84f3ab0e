//! Lexer for boolean query strings.
//!
//! Splits a query into [`Token`]s and rewrites negations so that every `!`
//! scopes a parenthesized group.

use tweetdex_types::{MalformedReason, Result, MAX_NESTING_DEPTH};

/// Token types for query parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A search word
    Term(String),
    /// `&`
    And,
    /// `|`
    Or,
    /// `!`
    Not,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
}

impl Token {
    fn from_word(word: &str, out: &mut Vec<Token>) {
        match word {
            "&" => out.push(Token::And),
            "|" => out.push(Token::Or),
            _ => {
                // `!neeva` reads as `! neeva` and `!!x` as `! ! x`
                let stem = word.trim_start_matches('!');
                match stem {
                    // glued to an operator, the whole word is a term like `&&`
                    "&" | "|" => out.push(Token::Term(word.to_owned())),
                    _ => {
                        let bangs = word.len() - stem.len();
                        out.extend(std::iter::repeat_n(Token::Not, bangs));
                        if !stem.is_empty() {
                            out.push(Token::Term(stem.to_owned()));
                        }
                    }
                }
            }
        }
    }
}

/// Splits `query` on whitespace and parentheses.
///
/// Parentheses always become standalone tokens, even when glued to a word:
/// `(not|is)` lexes as `(`, `not|is`, `)`. Words equal to `&`, `|` or `!`
/// become operators, leading `!`s split off a word, and any other word is a
/// term. Operator characters glued to anything (`a&b`, `&&`, `!&`) stay
/// part of a term.
pub fn tokenize(query: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(query.len() / 2 + 1);

    for chunk in query.split_whitespace() {
        let mut rest = chunk;
        while let Some(idx) = rest.find(['(', ')']) {
            if idx > 0 {
                Token::from_word(&rest[..idx], &mut tokens);
            }
            tokens.push(if rest.as_bytes()[idx] == b'(' {
                Token::LeftParen
            } else {
                Token::RightParen
            });
            rest = &rest[idx + 1..];
        }
        if !rest.is_empty() {
            Token::from_word(rest, &mut tokens);
        }
    }

    tokens
}

/// Rewrites `! TERM` into `! ( TERM )`.
///
/// Afterwards every `!` is immediately followed by `(`, so the nesting step
/// treats negated terms and negated groups the same way. A chain such as
/// `! ! x` becomes `! ( ! ( x ) )`.
///
/// # Errors
///
/// - `NestingTooDeep` past [`MAX_NESTING_DEPTH`] levels, checked before
///   any rewriting
/// - `UnbalancedParens` for a `)` without an opener or a `(` without a closer
/// - `DanglingNegation` for a `!` followed by an operator, `)` or nothing
pub fn normalize_negations(tokens: &[Token]) -> Result<Vec<Token>> {
    check_depth(tokens)?;

    let mut out = Vec::with_capacity(tokens.len() + 4);
    let mut pos = 0;
    while pos < tokens.len() {
        pos = copy_token(tokens, pos, &mut out)?;
    }
    Ok(out)
}

/// Rejects token streams nesting deeper than [`MAX_NESTING_DEPTH`].
///
/// Counts the groups the stream has once negations are normalized: each
/// `(` opens one, and a run of `k` negations opens `k` (a trailing `(`
/// included). Runs in one pass without recursion, so it is safe on inputs
/// of any depth. Unbalanced parentheses are left to the later passes.
pub(crate) fn check_depth(tokens: &[Token]) -> Result<()> {
    // Levels opened at each unclosed `(`.
    let mut frames: Vec<usize> = Vec::new();
    let mut depth = 0usize;
    let mut negations = 0usize;

    for (position, token) in tokens.iter().enumerate() {
        match token {
            Token::Not => {
                negations += 1;
                if depth + negations > MAX_NESTING_DEPTH {
                    return Err(MalformedReason::NestingTooDeep { position }.into());
                }
                continue;
            }
            Token::LeftParen => {
                let levels = negations.max(1);
                depth += levels;
                frames.push(levels);
                if depth > MAX_NESTING_DEPTH {
                    return Err(MalformedReason::NestingTooDeep { position }.into());
                }
            }
            Token::RightParen => {
                if let Some(levels) = frames.pop() {
                    depth -= levels;
                }
            }
            _ => {}
        }
        negations = 0;
    }

    Ok(())
}

/// Copies the token at `pos` (a whole operand for `!` and `(`) and returns
/// the position after it.
fn copy_token(tokens: &[Token], pos: usize, out: &mut Vec<Token>) -> Result<usize> {
    match &tokens[pos] {
        Token::Not | Token::LeftParen => copy_operand(tokens, pos, out),
        Token::RightParen => Err(MalformedReason::UnbalancedParens { position: pos }.into()),
        token => {
            out.push(token.clone());
            Ok(pos + 1)
        }
    }
}

fn copy_operand(tokens: &[Token], pos: usize, out: &mut Vec<Token>) -> Result<usize> {
    match tokens.get(pos) {
        Some(Token::Term(term)) => {
            out.push(Token::Term(term.clone()));
            Ok(pos + 1)
        }
        Some(Token::LeftParen) => {
            out.push(Token::LeftParen);
            let mut cursor = pos + 1;
            loop {
                match tokens.get(cursor) {
                    None => {
                        return Err(MalformedReason::UnbalancedParens { position: pos }.into())
                    }
                    Some(Token::RightParen) => {
                        out.push(Token::RightParen);
                        return Ok(cursor + 1);
                    }
                    Some(_) => cursor = copy_token(tokens, cursor, out)?,
                }
            }
        }
        Some(Token::Not) => {
            out.push(Token::Not);
            match tokens.get(pos + 1) {
                Some(Token::LeftParen) => copy_operand(tokens, pos + 1, out),
                Some(Token::Term(_)) | Some(Token::Not) => {
                    out.push(Token::LeftParen);
                    let next = copy_operand(tokens, pos + 1, out)?;
                    out.push(Token::RightParen);
                    Ok(next)
                }
                _ => Err(MalformedReason::DanglingNegation { position: pos }.into()),
            }
        }
        // Only reachable through `!` followed by an operator or `)`, which
        // the `Not` arm rejects first.
        _ => Err(MalformedReason::MissingOperand.into()),
    }
}
