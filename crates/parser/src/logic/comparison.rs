//! Comparison constraints for Brioche Datalog programs.
//!
//! - [`ComparisonOperator`]: `= | != | < | <= | > | >=`
//! - [`ComparisonElement`]: `{left} {op} {right}`
//!
//! # Example
//! ```rust
//! use parser::logic::{ComparisonElement, ComparisonOperator, Expr};
//! use parser::primitive::ConstType;
//! let cmp = ComparisonElement::new(
//!     Expr::Var("age".into()),
//!     ComparisonOperator::GreaterThanEquals,
//!     Expr::Const(ConstType::Integer(18)),
//! );
//! assert_eq!(cmp.to_string(), "age >= 18");
//! ```

use super::Expr;
use crate::error::ParserError;
use crate::scope::Initializer;
use crate::{Lexeme, Result, Rule};
use pest::iterators::Pair;
use std::fmt;

/// Comparison operator between two terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equals,            // =
    NotEquals,         // !=
    LessThan,          // <
    LessThanEquals,    // <=
    GreaterThan,       // >
    GreaterThanEquals, // >=
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sym = match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::LessThan => "<",
            Self::LessThanEquals => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanEquals => ">=",
        };
        write!(f, "{sym}")
    }
}

impl Lexeme for ComparisonOperator {
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        match parsed_rule.as_str() {
            "=" => Ok(Self::Equals),
            "!=" => Ok(Self::NotEquals),
            "<" => Ok(Self::LessThan),
            "<=" => Ok(Self::LessThanEquals),
            ">" => Ok(Self::GreaterThan),
            ">=" => Ok(Self::GreaterThanEquals),
            other => Err(ParserError::InvalidComparisonOperator(other.into())),
        }
    }
}

/// A comparison between two terms, e.g. `x + 1 < y`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComparisonElement {
    left: Expr,
    op: ComparisonOperator,
    right: Expr,
}

impl ComparisonElement {
    #[must_use]
    pub fn new(left: Expr, op: ComparisonOperator, right: Expr) -> Self {
        Self { left, op, right }
    }

    #[must_use]
    #[inline]
    pub fn left(&self) -> &Expr {
        &self.left
    }

    #[must_use]
    #[inline]
    pub fn op(&self) -> ComparisonOperator {
        self.op
    }

    #[must_use]
    #[inline]
    pub fn right(&self) -> &Expr {
        &self.right
    }

    #[must_use]
    pub fn vars(&self) -> Vec<&String> {
        let mut out = self.left.vars();
        out.extend(self.right.vars());
        out
    }

    /// Rescope any functional-head applications inside the two terms.
    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            left: self.left.init(initializer),
            op: self.op,
            right: self.right.init(initializer),
        }
    }
}

impl fmt::Display for ComparisonElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

impl Lexeme for ComparisonElement {
    /// Parse `expr cmp_op expr`.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        let mut inner = parsed_rule.into_inner();
        let left_pair = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("left term".into(), "comparison".into()))?;
        let op_pair = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("operator".into(), "comparison".into()))?;
        let right_pair = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("right term".into(), "comparison".into()))?;

        Ok(Self {
            left: Expr::from_parsed_rule(left_pair)?,
            op: ComparisonOperator::from_parsed_rule(op_pair)?,
            right: Expr::from_parsed_rule(right_pair)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::ConstType;

    #[test]
    fn operator_display() {
        assert_eq!(ComparisonOperator::Equals.to_string(), "=");
        assert_eq!(ComparisonOperator::NotEquals.to_string(), "!=");
        assert_eq!(ComparisonOperator::LessThanEquals.to_string(), "<=");
        assert_eq!(ComparisonOperator::GreaterThanEquals.to_string(), ">=");
    }

    #[test]
    fn display_golden() {
        let cmp = ComparisonElement::new(
            Expr::Var("x".into()),
            ComparisonOperator::LessThan,
            Expr::Const(ConstType::Integer(10)),
        );
        assert_eq!(cmp.to_string(), "x < 10");
    }

    #[test]
    fn vars_from_both_sides() {
        let cmp = ComparisonElement::new(
            Expr::Var("x".into()),
            ComparisonOperator::NotEquals,
            Expr::Var("y".into()),
        );
        assert_eq!(cmp.vars(), vec![&"x".to_string(), &"y".to_string()]);
    }
}
