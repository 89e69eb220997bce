//! Built-in scalar type names for Brioche Datalog programs.

use std::fmt;
use std::str::FromStr;

/// Built-in scalar types recognized by the language.
///
/// The numeric kinds (`uint`, `int`, `float`, `decimal`) carry a bit-width
/// capacity; `boolean` and `string` are fixed. Any other name appearing in
/// type position is treated as an ordinary predicate reference, not a
/// primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Unsigned integer type.
    UInt,
    /// Signed integer type.
    Int,
    /// Floating point type.
    Float,
    /// Fixed-point decimal type.
    Decimal,
    /// Boolean type.
    Boolean,
    /// UTF-8 string type.
    Str,
}

impl PrimitiveType {
    /// Whether this kind carries a bit-width capacity suffix.
    #[must_use]
    #[inline]
    pub fn has_capacity(&self) -> bool {
        matches!(self, Self::UInt | Self::Int | Self::Float | Self::Decimal)
    }

    /// Split a surface type name like `int[32]` into its stem and capacity.
    ///
    /// Returns `None` when the stem is not a recognized primitive name or
    /// the bracket suffix is malformed.
    #[must_use]
    pub fn parse_name(name: &str) -> Option<(Self, Option<u64>)> {
        match name.find('[') {
            None => Self::from_str(name).ok().map(|k| (k, None)),
            Some(i) => {
                let stem = Self::from_str(&name[..i]).ok()?;
                let suffix = name[i..].strip_prefix('[')?.strip_suffix(']')?;
                let capacity = suffix.parse::<u64>().ok()?;
                if stem.has_capacity() {
                    Some((stem, Some(capacity)))
                } else {
                    None
                }
            }
        }
    }
}

impl FromStr for PrimitiveType {
    type Err = String;

    /// Parse a [`PrimitiveType`] from its bare grammar name (no capacity).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uint" => Ok(Self::UInt),
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "decimal" => Ok(Self::Decimal),
            "boolean" => Ok(Self::Boolean),
            "string" => Ok(Self::Str),
            _ => Err(format!("'{s}' is not a primitive type name")),
        }
    }
}

impl fmt::Display for PrimitiveType {
    /// Returns the bare grammar name of this type (no capacity suffix).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_str = match self {
            Self::UInt => "uint",
            Self::Int => "int",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Str => "string",
        };
        write!(f, "{type_str}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_roundtrip() {
        for t in [
            PrimitiveType::UInt,
            PrimitiveType::Int,
            PrimitiveType::Float,
            PrimitiveType::Decimal,
            PrimitiveType::Boolean,
            PrimitiveType::Str,
        ] {
            let parsed = PrimitiveType::from_str(&t.to_string()).unwrap();
            assert_eq!(t, parsed);
        }
    }

    #[test]
    fn from_str_invalid_returns_err() {
        assert!(PrimitiveType::from_str("number").is_err());
        assert!(PrimitiveType::from_str("Int").is_err());
    }

    #[test]
    fn capacity_kinds() {
        assert!(PrimitiveType::Int.has_capacity());
        assert!(PrimitiveType::Decimal.has_capacity());
        assert!(!PrimitiveType::Boolean.has_capacity());
        assert!(!PrimitiveType::Str.has_capacity());
    }

    #[test]
    fn parse_name_variants() {
        assert_eq!(
            PrimitiveType::parse_name("int"),
            Some((PrimitiveType::Int, None))
        );
        assert_eq!(
            PrimitiveType::parse_name("uint[32]"),
            Some((PrimitiveType::UInt, Some(32)))
        );
        assert_eq!(PrimitiveType::parse_name("boolean[8]"), None);
        assert_eq!(PrimitiveType::parse_name("Edge"), None);
        assert_eq!(PrimitiveType::parse_name("int[x]"), None);
    }
}
