//! Expression tree produced by the query parser.
//!
//! A parsed query is an [`Expr`]: an ordered sequence that alternates
//! operands and operators, `operand (operator operand)*`. Operands are
//! terms or nested groups, and either may carry a negation marker. The
//! marker lives on the operand it scopes, so it always immediately
//! precedes that operand when the tree is rendered.

use core::fmt;

/// Binary boolean operator. `AND` and `OR` share one precedence level and
/// associate left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    /// `&`: set intersection
    And,
    /// `|`: set union
    Or,
}

impl BoolOp {
    /// The operator's query-syntax symbol.
    pub const fn symbol(self) -> &'static str {
        match self {
            BoolOp::And => "&",
            BoolOp::Or => "|",
        }
    }
}

/// A query leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// The word looked up in the index.
    pub text: String,
    /// Whether the lookup is complemented against the universe.
    pub negated: bool,
}

impl Term {
    /// A plain, non-negated term.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            negated: false,
        }
    }

    /// A negated term (`!text`).
    pub fn negated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            negated: true,
        }
    }
}

/// A parenthesized sub-query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// The nested expression.
    pub expr: Expr,
    /// Whether the group's result is complemented (`!(...)`).
    pub negated: bool,
}

/// One element of an expression sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// A term operand.
    Term(Term),
    /// An operator between two operands.
    Operator(BoolOp),
    /// A nested group operand.
    Group(Group),
}

impl Element {
    /// Shorthand for a plain term element.
    pub fn term(text: impl Into<String>) -> Self {
        Element::Term(Term::new(text))
    }

    /// Shorthand for a group element.
    pub fn group(expr: Expr, negated: bool) -> Self {
        Element::Group(Group { expr, negated })
    }
}

/// An ordered expression sequence.
///
/// Well-formed sequences have odd length and alternate operand, operator,
/// operand. The parser only checks parentheses and negation scoping, and
/// the evaluator rejects any other shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expr {
    elements: Vec<Element>,
}

impl Expr {
    /// Wraps a sequence of elements.
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Returns the elements in order.
    #[inline(always)]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Returns the number of elements (operands and operators).
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` for the empty sequence.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        f.write_str(&self.text)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Term(term) => write!(f, "{term}"),
            Element::Operator(op) => f.write_str(op.symbol()),
            Element::Group(group) => {
                if group.negated {
                    f.write_str("!")?;
                }
                write!(f, "({})", group.expr)
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}
