//! Constant value types for Brioche Datalog programs.

use crate::error::ParserError;
use crate::{Lexeme, Result, Rule};
use pest::iterators::Pair;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A literal constant in a Brioche Datalog program.
///
/// Constants may appear in atom arguments, arithmetic expressions,
/// comparisons and directive bindings. Supported kinds:
/// - [`ConstType::Integer`] for 64-bit signed integers
/// - [`ConstType::Real`] for double-precision floats
/// - [`ConstType::Boolean`] for booleans
/// - [`ConstType::Text`] for UTF-8 strings
#[derive(Debug, Clone)]
pub enum ConstType {
    /// 64-bit signed integer constant.
    Integer(i64),

    /// Double-precision floating point constant.
    Real(f64),

    /// Boolean constant.
    Boolean(bool),

    /// UTF-8 string constant.
    Text(String),
}

impl ConstType {
    /// The literal text if this is a string constant.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse an integer literal with the surface radix conventions:
    /// `0x`/`0X` prefix is base 16, a multi-digit literal starting with
    /// `0` is base 8, everything else is base 10.
    pub fn parse_integer(literal: &str) -> Result<i64> {
        let (neg, digits) = match literal.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, literal),
        };

        let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
            i64::from_str_radix(hex, 16)
        } else if digits.len() > 1 && digits.starts_with('0') {
            i64::from_str_radix(&digits[1..], 8)
        } else {
            digits.parse::<i64>()
        }
        .map_err(|_| ParserError::FailedToParseNumberLiteral(literal.to_string()))?;

        Ok(if neg { -value } else { value })
    }
}

impl PartialEq for ConstType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            // Bitwise comparison keeps Eq lawful for floats.
            (Self::Real(a), Self::Real(b)) => a.to_bits() == b.to_bits(),
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ConstType {}

impl Hash for ConstType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Integer(v) => v.hash(state),
            Self::Real(v) => v.to_bits().hash(state),
            Self::Boolean(v) => v.hash(state),
            Self::Text(v) => v.hash(state),
        }
    }
}

impl fmt::Display for ConstType {
    /// Prints constants in Datalog syntax:
    /// numbers as-is, booleans lowercase, strings with quotes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

impl Lexeme for ConstType {
    /// Parses a constant from the grammar.
    ///
    /// Integer literals follow the radix conventions of
    /// [`ConstType::parse_integer`]; boolean literals are case-insensitive;
    /// string literals are taken verbatim from the quoted token content.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        let inner = parsed_rule
            .into_inner()
            .next()
            .ok_or_else(|| ParserError::MissingToken("inner value".into(), "constant".into()))?;

        match inner.as_rule() {
            Rule::integer => Ok(Self::Integer(Self::parse_integer(inner.as_str())?)),
            Rule::real => inner
                .as_str()
                .parse::<f64>()
                .map(Self::Real)
                .map_err(|_| ParserError::FailedToParseNumberLiteral(inner.as_str().to_string())),
            Rule::boolean_lit => Ok(Self::Boolean(inner.as_str().eq_ignore_ascii_case("true"))),
            Rule::string_lit => Ok(Self::Text(inner.as_str().trim_matches('"').to_string())),
            other => Err(ParserError::UnexpectedRule(
                "constant".into(),
                format!("{other:?}"),
            )),
        }
    }
}
