//! Scoped renaming for component instantiation.
//!
//! Instantiating a component under an id rewrites every relation name
//! declared or referenced inside it to `id:name`. A `@past` stage
//! annotation is consumed by the rename and becomes a `:past` suffix.
//! [`revert`] walks the encoding backwards, mapping a fully qualified
//! name to the instantiation(s) that logically produced it.

use std::collections::{HashMap, HashSet};
use std::fmt;

/// A relation name split into its scoping parts.
///
/// The textual encoding is `scope:local` with an optional `:past`
/// suffix; unscoped names are just `local`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopedName {
    scope: Option<String>,
    local: String,
    past: bool,
}

impl ScopedName {
    #[must_use]
    pub fn new(scope: Option<String>, local: String, past: bool) -> Self {
        Self { scope, local, past }
    }

    /// Split a textual name into scope, local part and past marker.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let (base, past) = match text.strip_suffix(":past") {
            Some(base) => (base, true),
            None => (text, false),
        };
        match base.split_once(':') {
            Some((scope, local)) => Self {
                scope: Some(scope.to_string()),
                local: local.to_string(),
                past,
            },
            None => Self {
                scope: None,
                local: base.to_string(),
                past,
            },
        }
    }

    #[must_use]
    #[inline]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn local(&self) -> &str {
        &self.local
    }

    #[must_use]
    #[inline]
    pub fn is_past(&self) -> bool {
        self.past
    }
}

impl fmt::Display for ScopedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.scope {
            write!(f, "{scope}:")?;
        }
        write!(f, "{}", self.local)?;
        if self.past {
            write!(f, ":past")?;
        }
        Ok(())
    }
}

/// The renaming engine for one component instantiation.
///
/// Holds the scope id (`None` for the global component) and the set of
/// names declared in the global component, which are exempt from
/// scoping everywhere.
#[derive(Debug, Clone)]
pub struct Initializer {
    scope_id: Option<String>,
    global_atoms: HashSet<String>,
}

impl Initializer {
    #[must_use]
    pub fn new(scope_id: Option<String>, global_atoms: HashSet<String>) -> Self {
        Self {
            scope_id,
            global_atoms,
        }
    }

    #[must_use]
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.scope_id.as_deref()
    }

    /// True when the name is declared globally and exempt from scoping.
    #[must_use]
    pub fn exclude(&self, local: &str) -> bool {
        self.global_atoms.contains(local)
    }

    /// Rewrite a local relation name under this scope.
    ///
    /// Globally exempt names and names under the global scope pass
    /// through unchanged; a `@past` stage on such a name is an internal
    /// inconsistency, there is no earlier stage to refer to.
    #[must_use]
    pub fn name(&self, local: &str, stage: Option<&str>) -> String {
        let Some(scope_id) = &self.scope_id else {
            debug_assert!(stage != Some("@past"), "@past on unscoped name {local}");
            return local.to_string();
        };
        if self.exclude(local) {
            debug_assert!(stage != Some("@past"), "@past on global name {local}");
            return local.to_string();
        }
        ScopedName::new(
            Some(scope_id.clone()),
            local.to_string(),
            stage == Some("@past"),
        )
        .to_string()
    }

    /// The residual stage after renaming. `@past` is consumed by the
    /// rename; any other annotation is left as written.
    #[must_use]
    pub fn stage(&self, stage: Option<&str>) -> Option<String> {
        match stage {
            Some("@past") => None,
            other => other.map(str::to_string),
        }
    }
}

/// Map a fully qualified name back to the name(s) it was scoped from.
///
/// Strips the leading instantiation id when there is one. A `:past`
/// suffix resolves through `reverse_props`: every component that
/// propagated into the id during the current stage is a possible
/// origin.
#[must_use]
pub fn revert(
    scoped: &str,
    init_ids: &HashSet<String>,
    reverse_props: &HashMap<String, HashSet<String>>,
) -> HashSet<String> {
    let name = ScopedName::parse(scoped);
    let Some(id) = name.scope() else {
        return HashSet::from([scoped.to_string()]);
    };
    if !init_ids.contains(id) {
        return HashSet::from([scoped.to_string()]);
    }

    if name.is_past() {
        if let Some(sources) = reverse_props.get(id) {
            return sources
                .iter()
                .map(|from| {
                    ScopedName::new(Some(from.clone()), name.local().to_string(), false)
                        .to_string()
                })
                .collect();
        }
    }
    HashSet::from([ScopedName::new(None, name.local().to_string(), name.is_past()).to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ini(scope: Option<&str>, globals: &[&str]) -> Initializer {
        Initializer::new(
            scope.map(str::to_string),
            globals.iter().map(|g| (*g).to_string()).collect(),
        )
    }

    #[test]
    fn scoped_name_parse_and_display() {
        let plain = ScopedName::parse("edge");
        assert_eq!(plain.scope(), None);
        assert_eq!(plain.local(), "edge");
        assert!(!plain.is_past());
        assert_eq!(plain.to_string(), "edge");

        let full = ScopedName::parse("S:edge:past");
        assert_eq!(full.scope(), Some("S"));
        assert_eq!(full.local(), "edge");
        assert!(full.is_past());
        assert_eq!(full.to_string(), "S:edge:past");
    }

    #[test]
    fn stage_suffix_composition() {
        assert_eq!(ini(Some("S"), &[]).name("P", Some("@past")), "S:P:past");
        assert_eq!(ini(Some("S"), &[]).name("P", None), "S:P");
        assert_eq!(ini(None, &[]).name("P", None), "P");
    }

    #[test]
    fn renamed_names_round_trip_through_parse() {
        let staged = ScopedName::parse(&ini(Some("S"), &[]).name("edge", Some("@past")));
        assert_eq!(staged.scope(), Some("S"));
        assert_eq!(staged.local(), "edge");
        assert!(staged.is_past());

        let plain = ScopedName::parse(&ini(Some("S"), &[]).name("edge", None));
        assert!(!plain.is_past());
        assert_eq!(plain.to_string(), "S:edge");
    }

    #[test]
    fn init_composition_is_not_commutative() {
        let a = ini(Some("A"), &[]);
        let b = ini(Some("B"), &[]);
        let once = a.name("n", None);
        let twice = b.name(&once, None);
        assert_eq!(twice, "B:A:n");
        assert_ne!(twice, b.name("n", None));
    }

    #[test]
    fn global_names_are_exempt() {
        let scoped = ini(Some("M1"), &["Global"]);
        assert_eq!(scoped.name("Local", None), "M1:Local");
        assert_eq!(scoped.name("Global", None), "Global");
        assert!(scoped.exclude("Global"));
        assert!(!scoped.exclude("Local"));
    }

    #[test]
    fn stage_consumes_past_marker() {
        let scoped = ini(Some("S"), &[]);
        assert_eq!(scoped.stage(Some("@past")), None);
        assert_eq!(scoped.stage(Some("@init")), Some("@init".to_string()));
        assert_eq!(scoped.stage(None), None);
    }

    #[test]
    fn revert_unscoped_is_identity() {
        let out = revert("edge", &HashSet::new(), &HashMap::new());
        assert_eq!(out, HashSet::from(["edge".to_string()]));
    }

    #[test]
    fn revert_strips_known_instantiation_id() {
        let ids = HashSet::from(["S".to_string()]);
        let out = revert("S:edge", &ids, &HashMap::new());
        assert_eq!(out, HashSet::from(["edge".to_string()]));
    }

    #[test]
    fn revert_leaves_unknown_prefix_alone() {
        let ids = HashSet::from(["S".to_string()]);
        let out = revert("Person:id", &ids, &HashMap::new());
        assert_eq!(out, HashSet::from(["Person:id".to_string()]));
    }

    #[test]
    fn revert_resolves_past_through_propagations() {
        let ids = HashSet::from(["S".to_string()]);
        let reverse = HashMap::from([(
            "S".to_string(),
            HashSet::from(["A".to_string(), "B".to_string()]),
        )]);
        let out = revert("S:edge:past", &ids, &reverse);
        assert_eq!(
            out,
            HashSet::from(["A:edge".to_string(), "B:edge".to_string()])
        );
    }

    #[test]
    fn revert_keeps_past_without_propagations() {
        let ids = HashSet::from(["S".to_string()]);
        let out = revert("S:edge:past", &ids, &HashMap::new());
        assert_eq!(out, HashSet::from(["edge:past".to_string()]));
    }
}
