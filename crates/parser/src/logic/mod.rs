//! Logic components for Brioche Datalog programs.
//!
//! This module exposes the rule layer of the language:
//! - [`rule`]: rules and integrity constraints
//! - [`element`]: rule-body elements and logical connectives
//! - [`predicate`]: relational, functional and refmode atoms
//! - [`expr`]: term expressions and arithmetic
//! - [`comparison`]: comparison constraints and operators
//! - [`aggregation`]: aggregate bindings
//!
//! # Example
//! ```rust
//! use parser::logic::{BriocheRule, Element, Expr, LogicalElement, RelationElement};
//!
//! // result(x) <- input(x).
//! let head = LogicalElement::conjunction(vec![Element::Relation(RelationElement::new(
//!     "result".to_string(),
//!     None,
//!     vec![Expr::Var("x".to_string())],
//! ))]);
//! let body = Element::Relation(RelationElement::new(
//!     "input".to_string(),
//!     None,
//!     vec![Expr::Var("x".to_string())],
//! ));
//! let rule = BriocheRule::new(head, Some(body));
//! assert_eq!(rule.to_string(), "result(x) <- input(x).");
//! ```

pub mod aggregation;
pub mod comparison;
pub mod element;
pub mod expr;
pub mod predicate;
pub mod rule;

// Re-exports for a convenient public surface.
pub use aggregation::AggregationElement;
pub use comparison::{ComparisonElement, ComparisonOperator};
pub use element::{Element, LogicalElement};
pub use expr::{BinOperator, Expr};
pub use predicate::{FunctionalElement, RefModeElement, RelationElement};
pub use rule::{BriocheRule, Constraint};
