//! Plain components with single inheritance.

use super::Comp;
use crate::declaration::Decl;
use crate::error::ParserError;
use crate::logic::{BriocheRule, Constraint};
use crate::scope::Initializer;
use crate::Result;
use std::collections::{BTreeMap, HashSet};

/// A named block of declarations, rules and constraints, optionally
/// inheriting from a parent component.
#[derive(Debug, Clone, Default)]
pub struct Component {
    name: String,
    super_comp: Option<String>,
    preds: BTreeMap<String, Decl>,
    types: BTreeMap<String, Decl>,
    rules: Vec<BriocheRule>,
    constraints: Vec<Constraint>,
}

impl Component {
    #[must_use]
    pub fn new(name: String, super_comp: Option<String>) -> Self {
        Self {
            name,
            super_comp,
            ..Self::default()
        }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn super_comp(&self) -> Option<&str> {
        self.super_comp.as_deref()
    }

    /// Ordinary predicate declarations, keyed by relation name.
    #[must_use]
    #[inline]
    pub fn preds(&self) -> &BTreeMap<String, Decl> {
        &self.preds
    }

    /// Entity and refmode declarations, keyed by relation name.
    #[must_use]
    #[inline]
    pub fn types(&self) -> &BTreeMap<String, Decl> {
        &self.types
    }

    #[must_use]
    #[inline]
    pub fn rules(&self) -> &[BriocheRule] {
        &self.rules
    }

    #[must_use]
    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Every relation name declared directly in this component.
    #[must_use]
    pub fn declared_names(&self) -> HashSet<String> {
        self.preds
            .keys()
            .chain(self.types.keys())
            .cloned()
            .collect()
    }

    pub fn add_decl(&mut self, decl: Decl) {
        let target = if decl.is_special() {
            &mut self.types
        } else {
            &mut self.preds
        };
        target.insert(decl.name(), decl);
    }

    pub fn add_rule(&mut self, rule: BriocheRule) {
        self.rules.push(rule);
    }

    pub fn add_cons(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Merge another component's contents into this one; existing
    /// declarations win on name collision.
    pub fn add_all(&mut self, other: &Self) {
        for (name, decl) in &other.preds {
            self.preds.entry(name.clone()).or_insert_with(|| decl.clone());
        }
        for (name, decl) in &other.types {
            self.types.entry(name.clone()).or_insert_with(|| decl.clone());
        }
        self.rules.extend(other.rules.iter().cloned());
        self.constraints.extend(other.constraints.iter().cloned());
    }

    /// Resolve the inheritance chain against a frozen registry,
    /// producing a parentless component holding the merged contents.
    pub fn flatten(&self, registry: &BTreeMap<String, Comp>) -> Result<Self> {
        let mut visited = HashSet::from([self.name.clone()]);
        self.flatten_into(registry, &mut visited)
    }

    fn flatten_into(
        &self,
        registry: &BTreeMap<String, Comp>,
        visited: &mut HashSet<String>,
    ) -> Result<Self> {
        let mut flat = self.clone();
        flat.super_comp = None;

        let Some(parent_name) = &self.super_comp else {
            return Ok(flat);
        };
        if !visited.insert(parent_name.clone()) {
            return Err(ParserError::CyclicInheritance(parent_name.clone()));
        }
        let parent = registry
            .get(parent_name)
            .ok_or_else(|| ParserError::UnknownComponent(parent_name.clone()))?;
        let parent = match parent {
            Comp::Plain(parent) => parent,
            Comp::Cmd(_) => {
                return Err(ParserError::CommandBlockInheritance(
                    self.name.clone(),
                    parent_name.clone(),
                ))
            }
        };

        let flat_parent = parent.flatten_into(registry, visited)?;
        flat.add_all(&flat_parent);
        Ok(flat)
    }

    /// Rewrite every declared and referenced name under the scope id.
    pub fn init(&self, initializer: &Initializer) -> Result<Self> {
        let mut preds = BTreeMap::new();
        for decl in self.preds.values() {
            let scoped = decl.init(initializer)?;
            preds.insert(scoped.name(), scoped);
        }
        let mut types = BTreeMap::new();
        for decl in self.types.values() {
            let scoped = decl.init(initializer)?;
            types.insert(scoped.name(), scoped);
        }
        Ok(Self {
            name: initializer.id().unwrap_or(&self.name).to_string(),
            super_comp: None,
            preds,
            types,
            rules: self.rules.iter().map(|r| r.init(initializer)).collect(),
            constraints: self
                .constraints
                .iter()
                .map(|c| c.init(initializer))
                .collect(),
        })
    }
}
