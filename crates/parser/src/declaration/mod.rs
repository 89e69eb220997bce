//! Declaration types for Brioche Datalog programs.
//!
//! This module defines the schema layer parsed from source:
//! - [`atom`]: schema atoms (predicates, entities, primitives,
//!   refmodes, functionals, directives)
//! - [`decl`]: declarations and the `lhs -> rhs.` shape dispatch
//! - [`directive`]: `lang:...` meta-instruction atoms
//!
//! # Example
//! ```rust
//! use parser::declaration::{Atom, Declaration, PredicateAtom};
//! use parser::logic::Expr;
//!
//! let head = Atom::Predicate(PredicateAtom::new(
//!     "Foo".into(),
//!     vec![Expr::Var("x".into())],
//! ));
//! let bar = Atom::Predicate(PredicateAtom::new(
//!     "Bar".into(),
//!     vec![Expr::Var("x".into())],
//! ));
//! let decl = Declaration::new(head, vec![bar]).unwrap();
//! assert_eq!(decl.to_string(), "Foo(x) -> Bar/1.");
//! ```

pub mod atom;
pub mod decl;
pub mod directive;

pub use atom::{Atom, AtomKind, BareAtom, Entity, FunctionalAtom, PredicateAtom, Primitive, RefMode};
pub use decl::{ArrowStatement, Decl, Declaration, RefModeDeclaration};
pub use directive::Directive;
