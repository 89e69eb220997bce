//! Rule and constraint structures for Brioche Datalog programs.
//!
//! A rule is `head <- body.` (or a bodiless fact `head.`); a constraint
//! is `lhs -> rhs.` where the right-hand side must hold whenever the
//! left-hand side does.

use super::{Element, LogicalElement};
use crate::declaration::{BareAtom, Directive};
use crate::error::ParserError;
use crate::scope::Initializer;
use crate::{Lexeme, Result, Rule};
use pest::iterators::Pair;
use std::fmt;

/// A complete Brioche rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BriocheRule {
    head: LogicalElement,
    body: Option<Element>,
}

impl BriocheRule {
    /// Construct a rule. The body is normalized here, exactly once.
    #[must_use]
    pub fn new(head: LogicalElement, body: Option<Element>) -> Self {
        let body = body.map(|mut b| {
            b.normalize();
            b
        });
        Self { head, body }
    }

    #[must_use]
    #[inline]
    pub fn head(&self) -> &LogicalElement {
        &self.head
    }

    #[must_use]
    #[inline]
    pub fn body(&self) -> Option<&Element> {
        self.body.as_ref()
    }

    /// The directive carried by a bodiless single-directive rule.
    #[must_use]
    pub fn directive(&self) -> Option<&Directive> {
        if self.body.is_some() {
            return None;
        }
        match self.head.elements() {
            [Element::Directive(dir)] => Some(dir),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_directive(&self) -> bool {
        self.directive().is_some()
    }

    /// Relations referenced by the body, for schema bookkeeping.
    #[must_use]
    pub fn body_atoms(&self) -> Vec<BareAtom> {
        self.body.as_ref().map(Element::atoms).unwrap_or_default()
    }

    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            head: self.head.init(initializer),
            body: self.body.as_ref().map(|b| b.init(initializer)),
        }
    }
}

impl fmt::Display for BriocheRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Some(body) => write!(f, "{} <- {}.", self.head, body),
            None => write!(f, "{}.", self.head),
        }
    }
}

impl Lexeme for BriocheRule {
    /// Parse `head ("<-" disjunction)? "."`.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        let mut inner = parsed_rule.into_inner();
        let head_pair = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("head".into(), "rule".into()))?;
        let head = LogicalElement::from_parsed_rule(head_pair)?;
        let body = inner.next().map(Element::from_parsed_rule).transpose()?;
        Ok(Self::new(head, body))
    }
}

/// An integrity constraint: the head must hold whenever the body does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    head: Element,
    body: Option<Element>,
}

impl Constraint {
    #[must_use]
    pub fn new(head: Element, body: Option<Element>) -> Self {
        let body = body.map(|mut b| {
            b.normalize();
            b
        });
        Self { head, body }
    }

    #[must_use]
    #[inline]
    pub fn head(&self) -> &Element {
        &self.head
    }

    #[must_use]
    #[inline]
    pub fn body(&self) -> Option<&Element> {
        self.body.as_ref()
    }

    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            head: self.head.init(initializer),
            body: self.body.as_ref().map(|b| b.init(initializer)),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Some(body) => write!(f, "{} -> {}.", self.head, body),
            None => write!(f, "{} -> .", self.head),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{Expr, RelationElement};
    use std::collections::HashSet;

    fn rel(name: &str, args: &[&str]) -> Element {
        Element::Relation(RelationElement::new(
            name.into(),
            None,
            args.iter().map(|a| Expr::Var((*a).into())).collect(),
        ))
    }

    fn path_rule() -> BriocheRule {
        let head = LogicalElement::conjunction(vec![rel("path", &["x", "y"])]);
        let body = Element::Logical(LogicalElement::conjunction(vec![
            rel("path", &["x", "z"]),
            rel("edge", &["z", "y"]),
        ]));
        BriocheRule::new(head, Some(body))
    }

    #[test]
    fn display_golden() {
        assert_eq!(
            path_rule().to_string(),
            "path(x, y) <- path(x, z), edge(z, y)."
        );

        let fact = BriocheRule::new(
            LogicalElement::conjunction(vec![rel("root", &["x"])]),
            None,
        );
        assert_eq!(fact.to_string(), "root(x).");
    }

    #[test]
    fn init_rescopes_head_and_body() {
        let ini = Initializer::new(Some("S".into()), HashSet::new());
        assert_eq!(
            path_rule().init(&ini).to_string(),
            "S:path(x, y) <- S:path(x, z), S:edge(z, y)."
        );
    }

    #[test]
    fn non_directive_rule_has_no_directive() {
        assert!(!path_rule().is_directive());
        assert!(path_rule().directive().is_none());
    }

    #[test]
    fn body_atoms_signatures() {
        let signatures: Vec<String> = path_rule()
            .body_atoms()
            .iter()
            .map(|a| a.signature())
            .collect();
        assert_eq!(signatures, vec!["path/2", "edge/2"]);
    }

    #[test]
    fn constraint_display() {
        let cons = Constraint::new(rel("p", &["x"]), Some(rel("q", &["x"])));
        assert_eq!(cons.to_string(), "p(x) -> q(x).");
    }
}
