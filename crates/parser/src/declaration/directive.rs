//! Meta-instruction atoms (`lang:...` directives).
//!
//! A directive appears either in predicate form with an optional
//! backtick'd relation reference, `` lang:cmd:export(`Foo) ``, or in
//! functional form bound to a constant, `lang:cmd:EVAL[] = "cmd"`.

use crate::error::ParserError;
use crate::primitive::ConstType;
use crate::scope::Initializer;
use crate::{Lexeme, Result, Rule};
use pest::iterators::Pair;
use std::fmt;

/// A `lang:...` meta atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Directive {
    name: String,
    backtick: Option<String>,
    constant: Option<ConstType>,
}

impl Directive {
    #[must_use]
    pub fn new(name: String, backtick: Option<String>, constant: Option<ConstType>) -> Self {
        Self {
            name,
            backtick,
            constant,
        }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The referenced relation name, without the backtick marker.
    #[must_use]
    #[inline]
    pub fn backtick(&self) -> Option<&str> {
        self.backtick.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn constant(&self) -> Option<&ConstType> {
        self.constant.as_ref()
    }

    /// Number of filled argument slots.
    #[must_use]
    pub fn arity(&self) -> usize {
        usize::from(self.backtick.is_some()) + usize::from(self.constant.is_some())
    }

    /// Rescope only the backtick'd relation reference.
    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            name: self.name.clone(),
            backtick: self
                .backtick
                .as_ref()
                .map(|b| initializer.name(b, None)),
            constant: self.constant.clone(),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backtick = match &self.backtick {
            Some(name) => format!("`{name}"),
            None => String::new(),
        };
        match &self.constant {
            Some(constant) => write!(f, "{}[{}] = {}", self.name, backtick, constant),
            None => write!(f, "{}({})", self.name, backtick),
        }
    }
}

impl Lexeme for Directive {
    /// Parse `directive_name (dir_functional | dir_predicate)`.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        let mut inner = parsed_rule.into_inner();
        let name = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("directive name".into(), "directive".into()))?
            .as_str()
            .to_string();
        let args = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("argument form".into(), "directive".into()))?;

        let functional = args.as_rule() == Rule::dir_functional;
        let mut backtick = None;
        let mut constant = None;
        for arg in args.into_inner() {
            match arg.as_rule() {
                Rule::backtick_ref => {
                    backtick = Some(arg.as_str().trim_start_matches('`').to_string());
                }
                Rule::constant => constant = Some(ConstType::from_parsed_rule(arg)?),
                other => {
                    return Err(ParserError::UnexpectedRule(
                        "directive".into(),
                        format!("{other:?}"),
                    ))
                }
            }
        }
        if functional && constant.is_none() {
            return Err(ParserError::MissingToken(
                "bound constant".into(),
                "functional directive".into(),
            ));
        }
        Ok(Self {
            name,
            backtick,
            constant,
        })
    }
}
