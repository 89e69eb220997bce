//! Primitive types for Brioche Datalog programs.
//!
//! This module defines the scalar layer of the language:
//! - [`PrimitiveType`]: built-in scalar type names (`uint`, `int`, `float`,
//!   `decimal`, `boolean`, `string`)
//! - [`ConstType`]: literal constants (integers, reals, booleans, text)
//!
//! These types form the building blocks of Brioche programs and appear in
//! expressions, rule bodies and schema declarations.
//!
//! # Example
//! ```rust
//! use parser::primitive::{ConstType, PrimitiveType};
//! use std::str::FromStr;
//!
//! let ty = PrimitiveType::from_str("uint").unwrap();
//! let c = ConstType::Integer(42);
//! assert!(ty.has_capacity());
//! assert_eq!(c.to_string(), "42");
//! ```

pub mod const_type;
pub mod primitive_type;

pub use const_type::ConstType;
pub use primitive_type::PrimitiveType;
