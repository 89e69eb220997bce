//! Relation-shaped elements of Brioche Datalog programs.
//!
//! - [`RelationElement`]: plain atoms, e.g. `edge(x, y)` or `edge@past(x, y)`
//! - [`FunctionalElement`]: functional atoms, e.g. `salary[p] = n`
//! - [`RefModeElement`]: refmode atoms, e.g. `Person:id(p:n)`
//!
//! Each carries an optional stage suffix and knows how to rescope its
//! relation name under an [`Initializer`].

use super::Expr;
use crate::declaration::{AtomKind, BareAtom};
use crate::error::ParserError;
use crate::scope::Initializer;
use crate::{Lexeme, Result, Rule};
use itertools::Itertools;
use pest::iterators::Pair;
use std::fmt;

/// A plain relation atom: `name(args)`, optionally staged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationElement {
    name: String,
    stage: Option<String>,
    args: Vec<Expr>,
}

impl RelationElement {
    #[must_use]
    pub fn new(name: String, stage: Option<String>, args: Vec<Expr>) -> Self {
        Self { name, stage, args }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    #[must_use]
    #[inline]
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// True when every argument is a plain variable.
    #[must_use]
    pub fn all_vars(&self) -> bool {
        self.args.iter().all(Expr::is_var)
    }

    #[must_use]
    pub fn vars(&self) -> Vec<&String> {
        self.args.iter().flat_map(Expr::vars).collect()
    }

    /// Name and arity of the referenced relation, for bookkeeping.
    #[must_use]
    pub fn referenced(&self) -> BareAtom {
        BareAtom::new(self.name.clone(), AtomKind::Predicate, self.args.len())
    }

    /// Rescope the relation name; the stage annotation is consumed by
    /// the rename when it is `@past`.
    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            name: initializer.name(&self.name, self.stage.as_deref()),
            stage: initializer.stage(self.stage.as_deref()),
            args: self.args.iter().map(|a| a.init(initializer)).collect(),
        }
    }
}

impl fmt::Display for RelationElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}({})",
            self.name,
            self.stage.as_deref().unwrap_or(""),
            self.args.iter().join(", ")
        )
    }
}

impl Lexeme for RelationElement {
    /// Parse `pred_name stage? "(" args ")"`.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        let mut inner = parsed_rule.into_inner().peekable();
        let name = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("relation name".into(), "predicate".into()))?
            .as_str()
            .to_string();

        let stage = match inner.peek() {
            Some(pair) if pair.as_rule() == Rule::stage => {
                Some(inner.next().map(|p| p.as_str().to_string()).unwrap_or_default())
            }
            _ => None,
        };

        let args = inner.map(Expr::from_parsed_rule).collect::<Result<Vec<_>>>()?;
        Ok(Self { name, stage, args })
    }
}

/// A functional atom: `name[keys]` with an optional bound value.
///
/// In rule heads and bodies the value is present (`salary[p] = n`); as
/// a term inside an expression only the application appears (`salary[p]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionalElement {
    name: String,
    stage: Option<String>,
    keys: Vec<Expr>,
    value: Option<Expr>,
}

impl FunctionalElement {
    #[must_use]
    pub fn new(name: String, stage: Option<String>, keys: Vec<Expr>, value: Option<Expr>) -> Self {
        Self {
            name,
            stage,
            keys,
            value,
        }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn keys(&self) -> &[Expr] {
        &self.keys
    }

    #[must_use]
    #[inline]
    pub fn value(&self) -> Option<&Expr> {
        self.value.as_ref()
    }

    /// Keys plus the bound value, the full argument list of the relation.
    #[must_use]
    pub fn all_args(&self) -> Vec<&Expr> {
        let mut out: Vec<&Expr> = self.keys.iter().collect();
        if let Some(value) = &self.value {
            out.push(value);
        }
        out
    }

    /// True when every key (and the value, if bound) is a plain variable.
    #[must_use]
    pub fn all_vars(&self) -> bool {
        self.all_args().iter().all(|a| a.is_var())
    }

    #[must_use]
    pub fn vars(&self) -> Vec<&String> {
        self.all_args().iter().flat_map(|a| a.vars()).collect()
    }

    /// Name and arity of the referenced relation. The bound value counts
    /// towards the arity whether or not it is present syntactically.
    #[must_use]
    pub fn referenced(&self) -> BareAtom {
        BareAtom::new(self.name.clone(), AtomKind::Functional, self.keys.len() + 1)
    }

    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            name: initializer.name(&self.name, self.stage.as_deref()),
            stage: initializer.stage(self.stage.as_deref()),
            keys: self.keys.iter().map(|k| k.init(initializer)).collect(),
            value: self.value.as_ref().map(|v| v.init(initializer)),
        }
    }
}

impl fmt::Display for FunctionalElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}[{}]",
            self.name,
            self.stage.as_deref().unwrap_or(""),
            self.keys.iter().join(", ")
        )?;
        if let Some(value) = &self.value {
            write!(f, " = {value}")?;
        }
        Ok(())
    }
}

impl Lexeme for FunctionalElement {
    /// Parse either a full functional element (`f[x] = v`) or a bare
    /// functional head used inside an expression (`f[x]`).
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        let rule = parsed_rule.as_rule();
        let mut inner = parsed_rule.into_inner().peekable();
        let name = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("relation name".into(), "functional".into()))?
            .as_str()
            .to_string();

        let stage = match inner.peek() {
            Some(pair) if pair.as_rule() == Rule::stage => {
                Some(inner.next().map(|p| p.as_str().to_string()).unwrap_or_default())
            }
            _ => None,
        };

        let keys_pair = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("key list".into(), "functional".into()))?;
        let keys = keys_pair
            .into_inner()
            .map(Expr::from_parsed_rule)
            .collect::<Result<Vec<_>>>()?;

        let value = match rule {
            Rule::functional_head => None,
            _ => {
                let value_pair = inner.next().ok_or_else(|| {
                    ParserError::MissingToken("bound value".into(), "functional".into())
                })?;
                let expr_pair = value_pair.into_inner().next().ok_or_else(|| {
                    ParserError::MissingToken("value expression".into(), "functional".into())
                })?;
                Some(Expr::from_parsed_rule(expr_pair)?)
            }
        };

        Ok(Self {
            name,
            stage,
            keys,
            value,
        })
    }
}

/// A refmode atom: `Entity:ref(entityVar:valueExpr)`, optionally staged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefModeElement {
    name: String,
    stage: Option<String>,
    entity_var: String,
    value: Expr,
}

impl RefModeElement {
    #[must_use]
    pub fn new(name: String, stage: Option<String>, entity_var: String, value: Expr) -> Self {
        Self {
            name,
            stage,
            entity_var,
            value,
        }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn entity_var(&self) -> &str {
        &self.entity_var
    }

    #[must_use]
    #[inline]
    pub fn value(&self) -> &Expr {
        &self.value
    }

    #[must_use]
    pub fn vars(&self) -> Vec<&String> {
        let mut out = vec![&self.entity_var];
        out.extend(self.value.vars());
        out
    }

    #[must_use]
    pub fn referenced(&self) -> BareAtom {
        BareAtom::new(self.name.clone(), AtomKind::Refmode, 2)
    }

    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            name: initializer.name(&self.name, self.stage.as_deref()),
            stage: initializer.stage(self.stage.as_deref()),
            entity_var: self.entity_var.clone(),
            value: self.value.init(initializer),
        }
    }
}

impl fmt::Display for RefModeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}({}:{})",
            self.name,
            self.stage.as_deref().unwrap_or(""),
            self.entity_var,
            self.value
        )
    }
}

impl Lexeme for RefModeElement {
    /// Parse `qualified_name stage? "(" variable ":" expr ")"`.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        let mut inner = parsed_rule.into_inner().peekable();
        let name = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("relation name".into(), "refmode".into()))?
            .as_str()
            .to_string();

        let stage = match inner.peek() {
            Some(pair) if pair.as_rule() == Rule::stage => {
                Some(inner.next().map(|p| p.as_str().to_string()).unwrap_or_default())
            }
            _ => None,
        };

        let entity_var = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("entity variable".into(), "refmode".into()))?
            .as_str()
            .to_string();
        let value_pair = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("value expression".into(), "refmode".into()))?;

        Ok(Self {
            name,
            stage,
            entity_var,
            value: Expr::from_parsed_rule(value_pair)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ini(scope: &str) -> Initializer {
        Initializer::new(Some(scope.to_string()), HashSet::new())
    }

    #[test]
    fn relation_display() {
        let rel = RelationElement::new(
            "edge".into(),
            None,
            vec![Expr::Var("x".into()), Expr::Var("y".into())],
        );
        assert_eq!(rel.to_string(), "edge(x, y)");

        let staged = RelationElement::new("edge".into(), Some("@past".into()), vec![]);
        assert_eq!(staged.to_string(), "edge@past()");
    }

    #[test]
    fn relation_init_consumes_past_stage() {
        let rel = RelationElement::new(
            "edge".into(),
            Some("@past".into()),
            vec![Expr::Var("x".into())],
        );
        let scoped = rel.init(&ini("S"));
        assert_eq!(scoped.name(), "S:edge:past");
        assert_eq!(scoped.stage(), None);
        assert_eq!(scoped.to_string(), "S:edge:past(x)");
    }

    #[test]
    fn functional_display_with_and_without_value() {
        let full = FunctionalElement::new(
            "salary".into(),
            None,
            vec![Expr::Var("p".into())],
            Some(Expr::Var("n".into())),
        );
        assert_eq!(full.to_string(), "salary[p] = n");

        let head = FunctionalElement::new("salary".into(), None, vec![Expr::Var("p".into())], None);
        assert_eq!(head.to_string(), "salary[p]");
    }

    #[test]
    fn functional_arity_counts_value_slot() {
        let head = FunctionalElement::new(
            "salary".into(),
            None,
            vec![Expr::Var("p".into())],
            None,
        );
        assert_eq!(head.referenced().arity(), 2);
    }

    #[test]
    fn refmode_display_and_vars() {
        let refmode = RefModeElement::new(
            "Person:id".into(),
            None,
            "p".into(),
            Expr::Var("n".into()),
        );
        assert_eq!(refmode.to_string(), "Person:id(p:n)");
        assert_eq!(refmode.vars(), vec![&"p".to_string(), &"n".to_string()]);
    }

    #[test]
    fn relation_all_vars() {
        use crate::primitive::ConstType;
        let all = RelationElement::new("p".into(), None, vec![Expr::Var("x".into())]);
        assert!(all.all_vars());
        let not_all =
            RelationElement::new("p".into(), None, vec![Expr::Const(ConstType::Integer(1))]);
        assert!(!not_all.all_vars());
    }
}
