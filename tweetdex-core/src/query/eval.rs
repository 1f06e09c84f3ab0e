//! Recursive boolean evaluation of expression trees.

use std::borrow::Cow;

use smallvec::SmallVec;
use tweetdex_types::{MalformedReason, Result};

use crate::index::{DocSet, TweetIndex};
use crate::query::ast::{BoolOp, Element, Expr};

impl BoolOp {
    /// Applies the operator to two timestamp sets.
    #[inline]
    pub fn apply(self, lhs: &DocSet, rhs: &DocSet) -> DocSet {
        match self {
            BoolOp::And => lhs.intersect(rhs),
            BoolOp::Or => lhs.union(rhs),
        }
    }
}

/// A sequence element after its operand has been resolved to a set.
enum Slot<'i> {
    Set(Cow<'i, DocSet>),
    Op(BoolOp),
}

/// Reduces expression trees to timestamp sets against one index.
#[derive(Clone, Copy)]
pub struct Evaluator<'i> {
    index: &'i TweetIndex,
}

impl<'i> Evaluator<'i> {
    /// Creates an evaluator reading from `index`.
    pub fn new(index: &'i TweetIndex) -> Self {
        Self { index }
    }

    /// Evaluates `expr`, complementing the final set when `negate` is set.
    ///
    /// Nested groups are resolved first: a group behind `!` is evaluated
    /// with `negate = true`, so its negation applies exactly once, at the
    /// boundary where the marker appears. The remaining flat sequence of
    /// sets and operators is then folded strictly left to right, with no
    /// precedence between `&` and `|`.
    ///
    /// # Errors
    ///
    /// - `EmptySegment` if `expr` (or a nested group) is empty
    /// - `MissingOperand` if the sequence has even length or an operator
    ///   sits where an operand belongs
    /// - `MissingOperator` if two operands are adjacent
    pub fn evaluate(&self, expr: &Expr, negate: bool) -> Result<DocSet> {
        if expr.is_empty() {
            return Err(MalformedReason::EmptySegment.into());
        }
        if expr.len() % 2 == 0 {
            return Err(MalformedReason::MissingOperand.into());
        }

        let mut slots: SmallVec<[Slot<'i>; 8]> = SmallVec::with_capacity(expr.len());
        for element in expr.elements() {
            slots.push(match element {
                Element::Group(group) => {
                    Slot::Set(Cow::Owned(self.evaluate(&group.expr, group.negated)?))
                }
                Element::Term(term) => Slot::Set(self.index.matches(&term.text, term.negated)),
                Element::Operator(op) => Slot::Op(*op),
            });
        }

        let matched = fold(slots)?;
        Ok(if negate {
            self.index.universe().difference(&matched)
        } else {
            matched
        })
    }
}

/// Folds `set (op set)*` pairwise from the left.
fn fold(slots: SmallVec<[Slot<'_>; 8]>) -> Result<DocSet> {
    let mut slots = slots.into_iter();

    let mut acc = match slots.next() {
        Some(Slot::Set(set)) => set,
        Some(Slot::Op(_)) => return Err(MalformedReason::MissingOperand.into()),
        None => return Err(MalformedReason::EmptySegment.into()),
    };

    while let Some(slot) = slots.next() {
        let op = match slot {
            Slot::Op(op) => op,
            Slot::Set(_) => return Err(MalformedReason::MissingOperator.into()),
        };
        let rhs = match slots.next() {
            Some(Slot::Set(set)) => set,
            Some(Slot::Op(_)) | None => return Err(MalformedReason::MissingOperand.into()),
        };
        acc = Cow::Owned(op.apply(&acc, &rhs));
    }

    Ok(acc.into_owned())
}
