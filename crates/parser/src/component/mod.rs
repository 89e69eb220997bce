//! Component blocks for Brioche Datalog programs.
//!
//! - [`generic`]: plain components with single inheritance
//! - [`cmd`]: command blocks restricted to declarations and directives
//!
//! [`Comp`] is the sum of the two, constructed directly from a parsed
//! `component`/`cmd` block.

use crate::declaration::ArrowStatement;
use crate::error::ParserError;
use crate::logic::BriocheRule;
use crate::scope::Initializer;
use crate::{Lexeme, Result, Rule};
use pest::iterators::Pair;
use std::collections::BTreeMap;

pub mod cmd;
pub mod generic;

pub use cmd::CmdComponent;
pub use generic::Component;

/// Any component block.
#[derive(Debug, Clone)]
pub enum Comp {
    Plain(Component),
    Cmd(CmdComponent),
}

impl Comp {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(comp) => comp.name(),
            Self::Cmd(block) => block.name(),
        }
    }

    /// Resolve inheritance; command blocks pass through unchanged.
    pub fn flatten(&self, registry: &BTreeMap<String, Comp>) -> Result<Self> {
        Ok(match self {
            Self::Plain(comp) => Self::Plain(comp.flatten(registry)?),
            Self::Cmd(block) => Self::Cmd(block.flatten()),
        })
    }

    /// Rewrite every contained name under the instantiation's scope.
    pub fn init(&self, initializer: &Initializer) -> Result<Self> {
        Ok(match self {
            Self::Plain(comp) => Self::Plain(comp.init(initializer)?),
            Self::Cmd(block) => Self::Cmd(block.init(initializer)?),
        })
    }
}

impl Lexeme for Comp {
    /// Build a component from a `component` or `cmd` block, feeding
    /// each body statement through the shape dispatch.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        let is_cmd = parsed_rule.as_rule() == Rule::cmd_block;
        let mut inner = parsed_rule.into_inner().peekable();
        let name = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("name".into(), "component".into()))?
            .as_str()
            .to_string();

        if is_cmd {
            let mut block = CmdComponent::new(name);
            for statement in inner {
                match statement.as_rule() {
                    Rule::arrow_stmt => match ArrowStatement::from_parsed_rule(statement)? {
                        ArrowStatement::Declaration(decl) => block.add_decl(decl),
                        ArrowStatement::Constraint(cons) => block.add_cons(&cons)?,
                    },
                    Rule::logic_rule => {
                        block.add_rule(&BriocheRule::from_parsed_rule(statement)?)?;
                    }
                    other => {
                        return Err(ParserError::UnexpectedRule(
                            "command block".into(),
                            format!("{other:?}"),
                        ))
                    }
                }
            }
            return Ok(Self::Cmd(block));
        }

        let super_comp = match inner.peek() {
            Some(pair) if pair.as_rule() == Rule::identifier => {
                inner.next().map(|p| p.as_str().to_string())
            }
            _ => None,
        };
        let mut comp = Component::new(name, super_comp);
        for statement in inner {
            match statement.as_rule() {
                Rule::arrow_stmt => match ArrowStatement::from_parsed_rule(statement)? {
                    ArrowStatement::Declaration(decl) => comp.add_decl(decl),
                    ArrowStatement::Constraint(cons) => comp.add_cons(cons),
                },
                Rule::logic_rule => comp.add_rule(BriocheRule::from_parsed_rule(statement)?),
                other => {
                    return Err(ParserError::UnexpectedRule(
                        "component block".into(),
                        format!("{other:?}"),
                    ))
                }
            }
        }
        Ok(Self::Plain(comp))
    }
}
