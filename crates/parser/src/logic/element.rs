//! Rule-body elements for Brioche Datalog programs.
//!
//! [`Element`] is the sum of everything that may appear in a rule body:
//! relational atoms, comparisons, logical connectives, negation,
//! grouping and aggregation. [`LogicalElement`] is the n-ary
//! conjunction/disjunction also used for rule heads.

use super::{
    AggregationElement, ComparisonElement, FunctionalElement, RefModeElement, RelationElement,
};
use crate::declaration::{BareAtom, Directive};
use crate::error::ParserError;
use crate::scope::Initializer;
use crate::{Lexeme, Result, Rule};
use itertools::Itertools;
use pest::iterators::Pair;
use std::fmt;

/// N-ary conjunction (`,`) or disjunction (`;`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalElement {
    is_and: bool,
    elements: Vec<Element>,
}

impl LogicalElement {
    #[must_use]
    pub fn conjunction(elements: Vec<Element>) -> Self {
        Self {
            is_and: true,
            elements,
        }
    }

    #[must_use]
    pub fn disjunction(elements: Vec<Element>) -> Self {
        Self {
            is_and: false,
            elements,
        }
    }

    #[must_use]
    #[inline]
    pub fn is_and(&self) -> bool {
        self.is_and
    }

    #[must_use]
    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn vars(&self) -> Vec<&String> {
        self.elements.iter().flat_map(Element::vars).collect()
    }

    #[must_use]
    pub fn atoms(&self) -> Vec<BareAtom> {
        self.elements.iter().flat_map(Element::atoms).collect()
    }

    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            is_and: self.is_and,
            elements: self.elements.iter().map(|e| e.init(initializer)).collect(),
        }
    }
}

impl fmt::Display for LogicalElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_and { ", " } else { "; " };
        write!(f, "{}", self.elements.iter().join(sep))
    }
}

impl Lexeme for LogicalElement {
    /// Parse a `conjunction`, `disjunction` or `head` into its elements.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        match parsed_rule.as_rule() {
            Rule::conjunction | Rule::head => Ok(Self::conjunction(
                parsed_rule
                    .into_inner()
                    .map(Element::from_parsed_rule)
                    .collect::<Result<Vec<_>>>()?,
            )),
            Rule::disjunction => Ok(Self::disjunction(
                parsed_rule
                    .into_inner()
                    .map(Element::from_parsed_rule)
                    .collect::<Result<Vec<_>>>()?,
            )),
            other => Err(ParserError::UnexpectedRule(
                "logical element".into(),
                format!("{other:?}"),
            )),
        }
    }
}

/// A single rule-body element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    /// Plain relational atom, e.g. `edge(x, y)`.
    Relation(RelationElement),
    /// Functional atom, e.g. `salary[p] = n`.
    Functional(FunctionalElement),
    /// Refmode atom, e.g. `Person:id(p:n)`.
    RefMode(RefModeElement),
    /// Meta-instruction atom, e.g. `` lang:cmd:export(`Foo) ``.
    Directive(Directive),
    /// Comparison between two terms.
    Comparison(ComparisonElement),
    /// N-ary conjunction or disjunction.
    Logical(LogicalElement),
    /// Negation as failure.
    Negation(Box<Element>),
    /// Parenthesized sub-formula.
    Group(Box<Element>),
    /// Aggregate binding.
    Aggregation(AggregationElement),
}

impl Element {
    #[must_use]
    pub fn vars(&self) -> Vec<&String> {
        match self {
            Self::Relation(rel) => rel.vars(),
            Self::Functional(func) => func.vars(),
            Self::RefMode(refmode) => refmode.vars(),
            Self::Directive(_) => vec![],
            Self::Comparison(cmp) => cmp.vars(),
            Self::Logical(logical) => logical.vars(),
            Self::Negation(inner) | Self::Group(inner) => inner.vars(),
            Self::Aggregation(agg) => agg.vars(),
        }
    }

    /// Every relation referenced by this element, as name/kind/arity
    /// records. Directives are meta atoms and are not reported.
    #[must_use]
    pub fn atoms(&self) -> Vec<BareAtom> {
        match self {
            Self::Relation(rel) => vec![rel.referenced()],
            Self::Functional(func) => vec![func.referenced()],
            Self::RefMode(refmode) => vec![refmode.referenced()],
            Self::Directive(_) => vec![],
            Self::Comparison(cmp) => {
                let mut out = expr_atoms(cmp.left());
                out.extend(expr_atoms(cmp.right()));
                out
            }
            Self::Logical(logical) => logical.atoms(),
            Self::Negation(inner) | Self::Group(inner) => inner.atoms(),
            Self::Aggregation(agg) => {
                let mut out = vec![agg.relation().referenced()];
                out.extend(agg.body().atoms());
                out
            }
        }
    }

    /// Returns a copy with every contained scoped name rewritten.
    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        match self {
            Self::Relation(rel) => Self::Relation(rel.init(initializer)),
            Self::Functional(func) => Self::Functional(func.init(initializer)),
            Self::RefMode(refmode) => Self::RefMode(refmode.init(initializer)),
            Self::Directive(dir) => Self::Directive(dir.init(initializer)),
            Self::Comparison(cmp) => Self::Comparison(cmp.init(initializer)),
            Self::Logical(logical) => Self::Logical(logical.init(initializer)),
            Self::Negation(inner) => Self::Negation(Box::new(inner.init(initializer))),
            Self::Group(inner) => Self::Group(Box::new(inner.init(initializer))),
            Self::Aggregation(agg) => Self::Aggregation(agg.init(initializer)),
        }
    }

    /// One-time post-parse rewriting hook. Negation and grouping
    /// propagate into their child; every other node is a fixed point.
    /// The no-op default is part of the contract, do not extend it here.
    pub fn normalize(&mut self) {
        match self {
            Self::Negation(inner) | Self::Group(inner) => inner.normalize(),
            _ => {}
        }
    }
}

/// Relations referenced from within a term, via functional heads.
fn expr_atoms(expr: &super::Expr) -> Vec<BareAtom> {
    use super::Expr;
    match expr {
        Expr::Var(_) | Expr::Const(_) => vec![],
        Expr::Binary { left, right, .. } => {
            let mut out = expr_atoms(left);
            out.extend(expr_atoms(right));
            out
        }
        Expr::Group(inner) => expr_atoms(inner),
        Expr::FunctionalHead(func) => vec![func.referenced()],
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relation(rel) => write!(f, "{rel}"),
            Self::Functional(func) => write!(f, "{func}"),
            Self::RefMode(refmode) => write!(f, "{refmode}"),
            Self::Directive(dir) => write!(f, "{dir}"),
            Self::Comparison(cmp) => write!(f, "{cmp}"),
            Self::Logical(logical) => write!(f, "{logical}"),
            Self::Negation(inner) => write!(f, "!{inner}"),
            Self::Group(inner) => write!(f, "({inner})"),
            Self::Aggregation(agg) => write!(f, "{agg}"),
        }
    }
}

impl Lexeme for Element {
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        match parsed_rule.as_rule() {
            Rule::element => {
                let inner = parsed_rule.into_inner().next().ok_or_else(|| {
                    ParserError::MissingToken("inner token".into(), "element".into())
                })?;
                Self::from_parsed_rule(inner)
            }
            Rule::predicate => Ok(Self::Relation(RelationElement::from_parsed_rule(
                parsed_rule,
            )?)),
            Rule::functional_element | Rule::functional_head => Ok(Self::Functional(
                FunctionalElement::from_parsed_rule(parsed_rule)?,
            )),
            Rule::refmode_element => Ok(Self::RefMode(RefModeElement::from_parsed_rule(
                parsed_rule,
            )?)),
            Rule::directive => Ok(Self::Directive(Directive::from_parsed_rule(parsed_rule)?)),
            Rule::comparison => Ok(Self::Comparison(ComparisonElement::from_parsed_rule(
                parsed_rule,
            )?)),
            Rule::negation => {
                let inner = parsed_rule.into_inner().next().ok_or_else(|| {
                    ParserError::MissingToken("negated element".into(), "negation".into())
                })?;
                Ok(Self::Negation(Box::new(Self::from_parsed_rule(inner)?)))
            }
            Rule::group => {
                let inner = parsed_rule.into_inner().next().ok_or_else(|| {
                    ParserError::MissingToken("grouped formula".into(), "group".into())
                })?;
                Ok(Self::Group(Box::new(Self::from_parsed_rule(inner)?)))
            }
            Rule::aggregation => Ok(Self::Aggregation(AggregationElement::from_parsed_rule(
                parsed_rule,
            )?)),
            // A connective with a single child collapses to the child.
            Rule::conjunction | Rule::disjunction => {
                let is_and = parsed_rule.as_rule() == Rule::conjunction;
                let mut children = parsed_rule
                    .into_inner()
                    .map(Self::from_parsed_rule)
                    .collect::<Result<Vec<_>>>()?;
                if children.len() == 1 {
                    children.pop().ok_or_else(|| {
                        ParserError::MissingToken("child element".into(), "connective".into())
                    })
                } else {
                    Ok(Self::Logical(LogicalElement {
                        is_and,
                        elements: children,
                    }))
                }
            }
            other => Err(ParserError::UnexpectedRule(
                "body element".into(),
                format!("{other:?}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Expr;
    use std::collections::HashSet;

    fn rel(name: &str, args: &[&str]) -> Element {
        Element::Relation(RelationElement::new(
            name.into(),
            None,
            args.iter().map(|a| Expr::Var((*a).into())).collect(),
        ))
    }

    #[test]
    fn logical_display_uses_connective() {
        let and = LogicalElement::conjunction(vec![rel("p", &["x"]), rel("q", &["x"])]);
        assert_eq!(and.to_string(), "p(x), q(x)");

        let or = LogicalElement::disjunction(vec![rel("p", &["x"]), rel("q", &["x"])]);
        assert_eq!(or.to_string(), "p(x); q(x)");
    }

    #[test]
    fn negation_and_group_display() {
        let neg = Element::Negation(Box::new(rel("p", &["x"])));
        assert_eq!(neg.to_string(), "!p(x)");

        let group = Element::Group(Box::new(Element::Logical(LogicalElement::disjunction(
            vec![rel("p", &["x"]), rel("q", &["x"])],
        ))));
        assert_eq!(group.to_string(), "(p(x); q(x))");
    }

    #[test]
    fn normalize_is_identity() {
        let mut nested = Element::Negation(Box::new(Element::Group(Box::new(rel("p", &["x"])))));
        let before = nested.clone();
        nested.normalize();
        assert_eq!(nested, before);
    }

    #[test]
    fn atoms_collects_through_wrappers() {
        let body = Element::Logical(LogicalElement::conjunction(vec![
            rel("p", &["x"]),
            Element::Negation(Box::new(rel("q", &["x", "y"]))),
        ]));
        let atoms = body.atoms();
        let signatures: Vec<String> = atoms.iter().map(|a| a.signature()).collect();
        assert_eq!(signatures, vec!["p/1", "q/2"]);
    }

    #[test]
    fn init_rescopes_every_relation() {
        let ini = Initializer::new(Some("S".into()), HashSet::new());
        let body = Element::Logical(LogicalElement::conjunction(vec![
            rel("p", &["x"]),
            Element::Group(Box::new(rel("q", &["x"]))),
        ]));
        assert_eq!(body.init(&ini).to_string(), "S:p(x), (S:q(x))");
    }
}
