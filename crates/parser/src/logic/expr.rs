//! Term expressions for Brioche Datalog programs.
//!
//! - [`BinOperator`]: `+ | - | * | /`
//! - [`Expr`]: variables, constants, binary arithmetic, parenthesized
//!   sub-expressions and functional-head applications used as values
//!
//! # Example
//! ```rust
//! use parser::logic::{BinOperator, Expr};
//! use parser::primitive::ConstType;
//!
//! let e = Expr::Binary {
//!     left: Box::new(Expr::Var("x".into())),
//!     op: BinOperator::Plus,
//!     right: Box::new(Expr::Const(ConstType::Integer(5))),
//! };
//! assert_eq!(e.to_string(), "x + 5");
//! ```

use super::FunctionalElement;
use crate::error::ParserError;
use crate::primitive::ConstType;
use crate::scope::Initializer;
use crate::{Lexeme, Result, Rule};
use pest::iterators::Pair;
use std::fmt;

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOperator {
    Plus,     // +
    Minus,    // -
    Multiply, // *
    Divide,   // /
}

impl fmt::Display for BinOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sym = match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        };
        write!(f, "{sym}")
    }
}

impl Lexeme for BinOperator {
    /// Parse an operator token from the grammar.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        match parsed_rule.as_str() {
            "+" => Ok(Self::Plus),
            "-" => Ok(Self::Minus),
            "*" => Ok(Self::Multiply),
            "/" => Ok(Self::Divide),
            other => Err(ParserError::UnsupportedArithmeticOperator(other.into())),
        }
    }
}

/// A term appearing inside predicates and comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A logic variable; equality is by name.
    Var(String),
    /// A literal constant.
    Const(ConstType),
    /// Binary arithmetic over two sub-terms.
    Binary {
        left: Box<Expr>,
        op: BinOperator,
        right: Box<Expr>,
    },
    /// A parenthesized sub-expression.
    Group(Box<Expr>),
    /// A functional-predicate application used as a value, e.g. `f[x]`.
    FunctionalHead(Box<FunctionalElement>),
}

impl Expr {
    #[must_use]
    pub fn is_var(&self) -> bool {
        matches!(self, Self::Var(_))
    }

    /// The variable name if this term is a plain variable.
    #[must_use]
    pub fn as_var(&self) -> Option<&str> {
        match self {
            Self::Var(v) => Some(v),
            _ => None,
        }
    }

    /// Variables referenced by this term (order preserved, duplicates kept).
    #[must_use]
    pub fn vars(&self) -> Vec<&String> {
        match self {
            Self::Var(v) => vec![v],
            Self::Const(_) => vec![],
            Self::Binary { left, right, .. } => {
                let mut out = left.vars();
                out.extend(right.vars());
                out
            }
            Self::Group(inner) => inner.vars(),
            Self::FunctionalHead(func) => func.vars(),
        }
    }

    /// Returns a copy with every contained scoped name rewritten.
    ///
    /// Variables and constants are fixed points; only functional-head
    /// applications contain a scoped relation name.
    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        match self {
            Self::Var(_) | Self::Const(_) => self.clone(),
            Self::Binary { left, op, right } => Self::Binary {
                left: Box::new(left.init(initializer)),
                op: *op,
                right: Box::new(right.init(initializer)),
            },
            Self::Group(inner) => Self::Group(Box::new(inner.init(initializer))),
            Self::FunctionalHead(func) => {
                Self::FunctionalHead(Box::new(func.init(initializer)))
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(v) => write!(f, "{v}"),
            Self::Const(c) => write!(f, "{c}"),
            Self::Binary { left, op, right } => write!(f, "{left} {op} {right}"),
            Self::Group(inner) => write!(f, "({inner})"),
            Self::FunctionalHead(func) => write!(f, "{func}"),
        }
    }
}

impl Lexeme for Expr {
    /// Parse `factor (operator factor)*` into a left-associative tree,
    /// or a lone `factor`/`variable` token.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        match parsed_rule.as_rule() {
            Rule::expr => {
                let mut inner = parsed_rule.into_inner();
                let first = inner
                    .next()
                    .ok_or_else(|| ParserError::MissingToken("factor".into(), "expression".into()))?;
                let mut acc = Self::from_parsed_rule(first)?;

                // Remaining children come in (operator, factor) pairs.
                while let Some(op_pair) = inner.next() {
                    let op = BinOperator::from_parsed_rule(op_pair)?;
                    let rhs_pair = inner.next().ok_or_else(|| {
                        ParserError::MissingToken("factor".into(), "expression".into())
                    })?;
                    acc = Self::Binary {
                        left: Box::new(acc),
                        op,
                        right: Box::new(Self::from_parsed_rule(rhs_pair)?),
                    };
                }
                Ok(acc)
            }
            Rule::factor => {
                let inner = parsed_rule.into_inner().next().ok_or_else(|| {
                    ParserError::MissingToken("inner token".into(), "factor".into())
                })?;
                match inner.as_rule() {
                    Rule::constant => Ok(Self::Const(ConstType::from_parsed_rule(inner)?)),
                    Rule::functional_head => Ok(Self::FunctionalHead(Box::new(
                        FunctionalElement::from_parsed_rule(inner)?,
                    ))),
                    Rule::variable => Ok(Self::Var(inner.as_str().to_string())),
                    Rule::expr => Ok(Self::Group(Box::new(Self::from_parsed_rule(inner)?))),
                    other => Err(ParserError::UnexpectedRule(
                        "factor".into(),
                        format!("{other:?}"),
                    )),
                }
            }
            Rule::variable => Ok(Self::Var(parsed_rule.as_str().to_string())),
            other => Err(ParserError::UnexpectedRule(
                "expression".into(),
                format!("{other:?}"),
            )),
        }
    }
}
