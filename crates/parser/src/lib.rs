//! Brioche Parser Library
//!
//! A front end for Brioche, a modular Datalog language for describing
//! static-analysis rules. Provides structured representations for Datalog
//! programs including schema declarations, logic rules, components and the
//! scoped-renaming pass that instantiates components under fresh ids.

pub mod component;
pub mod declaration;
pub mod error;
pub mod logic;
pub mod primitive;
pub mod program;
pub mod scope;

// Re-export core types for convenient access
pub use component::{CmdComponent, Comp, Component};
pub use declaration::{
    ArrowStatement, Atom, AtomKind, BareAtom, Decl, Declaration, Directive, RefModeDeclaration,
};
pub use error::ParserError;
pub use logic::{
    AggregationElement, BinOperator, BriocheRule, ComparisonElement, ComparisonOperator, Constraint,
    Element, Expr, FunctionalElement, LogicalElement, RefModeElement, RelationElement,
};
pub use primitive::{ConstType, PrimitiveType};
pub use program::{Program, Propagation, SourceUnit};
pub use scope::{revert, Initializer, ScopedName};

use pest::iterators::Pair;
use pest_derive::Parser;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, error::ParserError>;

/// Brioche Parser is powered by Pest, a PEG parser framework.
#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct BriocheParser;

/// Trait for converting Pest parse trees into Brioche types.
///
/// All Brioche language constructs implement this trait to enable
/// conversion from parse trees to structured types.
pub trait Lexeme: Sized {
    /// Converts a Pest parse rule into a structured Brioche type.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self>;
}

#[cfg(test)]
mod tests;
