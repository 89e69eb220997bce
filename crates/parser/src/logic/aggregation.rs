//! Aggregation elements for Brioche Datalog programs.
//!
//! `agg<<n = count(x)>>(body)` binds `n` to the aggregate relation
//! applied over the solutions of `body`.

use super::{Element, RelationElement};
use crate::error::ParserError;
use crate::scope::Initializer;
use crate::{Lexeme, Result, Rule};
use pest::iterators::Pair;
use std::fmt;

/// An aggregation: a bound variable, the aggregate relation and the
/// aggregated body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregationElement {
    var: String,
    relation: RelationElement,
    body: Box<Element>,
}

impl AggregationElement {
    #[must_use]
    pub fn new(var: String, relation: RelationElement, body: Element) -> Self {
        Self {
            var,
            relation,
            body: Box::new(body),
        }
    }

    #[must_use]
    #[inline]
    pub fn var(&self) -> &str {
        &self.var
    }

    #[must_use]
    #[inline]
    pub fn relation(&self) -> &RelationElement {
        &self.relation
    }

    #[must_use]
    #[inline]
    pub fn body(&self) -> &Element {
        &self.body
    }

    #[must_use]
    pub fn vars(&self) -> Vec<&String> {
        let mut out = vec![&self.var];
        out.extend(self.relation.vars());
        out.extend(self.body.vars());
        out
    }

    /// Rescoping descends uniformly into the aggregate relation and
    /// the aggregated body.
    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            var: self.var.clone(),
            relation: self.relation.init(initializer),
            body: Box::new(self.body.init(initializer)),
        }
    }
}

impl fmt::Display for AggregationElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agg<<{} = {}>>({})", self.var, self.relation, self.body)
    }
}

impl Lexeme for AggregationElement {
    /// Parse `"agg" "<<" variable "=" predicate ">>" "(" disjunction ")"`.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        let mut inner = parsed_rule.into_inner();
        let var = inner
            .next()
            .ok_or_else(|| ParserError::MissingToken("bound variable".into(), "aggregation".into()))?
            .as_str()
            .to_string();
        let relation_pair = inner.next().ok_or_else(|| {
            ParserError::MissingToken("aggregate relation".into(), "aggregation".into())
        })?;
        let body_pair = inner.next().ok_or_else(|| {
            ParserError::MissingToken("aggregated body".into(), "aggregation".into())
        })?;

        Ok(Self {
            var,
            relation: RelationElement::from_parsed_rule(relation_pair)?,
            body: Box::new(Element::from_parsed_rule(body_pair)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Expr;
    use crate::scope::Initializer;
    use std::collections::HashSet;

    fn count_over_edge() -> AggregationElement {
        let relation =
            RelationElement::new("count".into(), None, vec![Expr::Var("x".into())]);
        let body = Element::Relation(RelationElement::new(
            "edge".into(),
            None,
            vec![Expr::Var("x".into()), Expr::Var("y".into())],
        ));
        AggregationElement::new("n".into(), relation, body)
    }

    #[test]
    fn display_golden() {
        assert_eq!(
            count_over_edge().to_string(),
            "agg<<n = count(x)>>(edge(x, y))"
        );
    }

    #[test]
    fn init_descends_into_relation_and_body() {
        let ini = Initializer::new(Some("S".into()), HashSet::new());
        let scoped = count_over_edge().init(&ini);
        assert_eq!(scoped.relation().name(), "S:count");
        assert_eq!(
            scoped.to_string(),
            "agg<<n = S:count(x)>>(S:edge(x, y))"
        );
    }

    #[test]
    fn vars_include_bound_variable() {
        let agg = count_over_edge();
        let vars = agg.vars();
        assert_eq!(vars[0], &"n".to_string());
        assert!(vars.contains(&&"y".to_string()));
    }
}
