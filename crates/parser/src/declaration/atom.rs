//! Schema atoms for Brioche Datalog programs.
//!
//! An [`Atom`] names a relation in a declaration: a plain predicate, an
//! entity, a primitive type, a refmode or a functional relation. Atoms
//! carry the variables the declaration was written with; the bare
//! [`BareAtom`] form keeps only name, kind and arity for bookkeeping.

use crate::logic::Expr;
use crate::primitive::PrimitiveType;
use crate::scope::Initializer;
use itertools::Itertools;
use std::fmt;

/// The relation kind an atom declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    Predicate,
    Functional,
    Refmode,
}

/// Name, kind and arity of a relation, with the argument terms erased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BareAtom {
    name: String,
    kind: AtomKind,
    arity: usize,
}

impl BareAtom {
    #[must_use]
    pub fn new(name: String, kind: AtomKind, arity: usize) -> Self {
        Self { name, kind, arity }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn kind(&self) -> AtomKind {
        self.kind
    }

    #[must_use]
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// `name/arity` form used in schema output.
    #[must_use]
    pub fn signature(&self) -> String {
        format!("{}/{}", self.name, self.arity)
    }
}

impl fmt::Display for BareAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature())
    }
}

/// A plain predicate head, e.g. `Foo(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PredicateAtom {
    name: String,
    exprs: Vec<Expr>,
}

impl PredicateAtom {
    #[must_use]
    pub fn new(name: String, exprs: Vec<Expr>) -> Self {
        Self { name, exprs }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }

    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            name: initializer.name(&self.name, None),
            exprs: self.exprs.clone(),
        }
    }
}

impl fmt::Display for PredicateAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.exprs.iter().join(", "))
    }
}

/// A unary relation declaring an object type, e.g. `Person(p)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    name: String,
    var: Expr,
}

impl Entity {
    #[must_use]
    pub fn new(name: String, var: Expr) -> Self {
        Self { name, var }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn var(&self) -> &Expr {
        &self.var
    }

    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            name: initializer.name(&self.name, None),
            var: self.var.clone(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.var)
    }
}

/// A built-in scalar type applied to one variable, e.g. `int[32](x)`.
///
/// Numeric kinds always carry a capacity, defaulting to 64 bits;
/// `boolean` and `string` never do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Primitive {
    kind: PrimitiveType,
    capacity: Option<u64>,
    var: Expr,
}

impl Primitive {
    #[must_use]
    pub fn new(kind: PrimitiveType, capacity: Option<u64>, var: Expr) -> Self {
        let capacity = if kind.has_capacity() {
            Some(capacity.unwrap_or(64))
        } else {
            None
        };
        Self {
            kind,
            capacity,
            var,
        }
    }

    #[must_use]
    #[inline]
    pub fn kind(&self) -> PrimitiveType {
        self.kind
    }

    #[must_use]
    #[inline]
    pub fn capacity(&self) -> Option<u64> {
        self.capacity
    }

    #[must_use]
    #[inline]
    pub fn var(&self) -> &Expr {
        &self.var
    }

    /// The normalized type name, e.g. `int[64]` or `boolean`.
    #[must_use]
    pub fn name(&self) -> String {
        match self.capacity {
            Some(capacity) => format!("{}[{}]", self.kind, capacity),
            None => self.kind.to_string(),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.var)
    }
}

/// A binary relation mapping an entity to a primitive key,
/// e.g. `Person:id(p:n)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefMode {
    name: String,
    entity: Entity,
    primitive: Primitive,
}

impl RefMode {
    #[must_use]
    pub fn new(name: String, entity: Entity, primitive: Primitive) -> Self {
        Self {
            name,
            entity,
            primitive,
        }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    #[must_use]
    #[inline]
    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    /// Rescopes the refmode name and its entity; the primitive backing
    /// type is global and stays untouched.
    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            name: initializer.name(&self.name, None),
            entity: self.entity.init(initializer),
            primitive: self.primitive.clone(),
        }
    }
}

impl fmt::Display for RefMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}:{})",
            self.name,
            self.entity.var(),
            self.primitive.var()
        )
    }
}

/// A functional relation head, e.g. `salary[p] = n`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionalAtom {
    name: String,
    keys: Vec<Expr>,
    value: Expr,
}

impl FunctionalAtom {
    #[must_use]
    pub fn new(name: String, keys: Vec<Expr>, value: Expr) -> Self {
        Self { name, keys, value }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn keys(&self) -> &[Expr] {
        &self.keys
    }

    #[must_use]
    #[inline]
    pub fn value(&self) -> &Expr {
        &self.value
    }

    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            name: initializer.name(&self.name, None),
            keys: self.keys.clone(),
            value: self.value.clone(),
        }
    }
}

impl fmt::Display for FunctionalAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] = {}",
            self.name,
            self.keys.iter().join(", "),
            self.value
        )
    }
}

/// A schema atom of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    Bare(BareAtom),
    Predicate(PredicateAtom),
    Entity(Entity),
    Primitive(Primitive),
    RefMode(RefMode),
    Functional(FunctionalAtom),
}

impl Atom {
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Bare(bare) => bare.name().to_string(),
            Self::Predicate(pred) => pred.name().to_string(),
            Self::Entity(entity) => entity.name().to_string(),
            Self::Primitive(prim) => prim.name(),
            Self::RefMode(refmode) => refmode.name().to_string(),
            Self::Functional(func) => func.name().to_string(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> AtomKind {
        match self {
            Self::Bare(bare) => bare.kind(),
            Self::RefMode(_) => AtomKind::Refmode,
            Self::Functional(_) => AtomKind::Functional,
            _ => AtomKind::Predicate,
        }
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Bare(bare) => bare.arity(),
            Self::Predicate(pred) => pred.exprs().len(),
            Self::Entity(_) | Self::Primitive(_) => 1,
            Self::RefMode(_) => 2,
            Self::Functional(func) => func.keys().len() + 1,
        }
    }

    /// `name/arity` form used in schema output.
    #[must_use]
    pub fn signature(&self) -> String {
        format!("{}/{}", self.name(), self.arity())
    }

    /// Rescope the declared name where the atom kind calls for it.
    /// Bare atoms and primitives are fixed points.
    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        match self {
            Self::Bare(_) | Self::Primitive(_) => self.clone(),
            Self::Predicate(pred) => Self::Predicate(pred.init(initializer)),
            Self::Entity(entity) => Self::Entity(entity.init(initializer)),
            Self::RefMode(refmode) => Self::RefMode(refmode.init(initializer)),
            Self::Functional(func) => Self::Functional(func.init(initializer)),
        }
    }

    /// The single variable of a unary atom, where it has one.
    #[must_use]
    pub fn single_var(&self) -> Option<&str> {
        match self {
            Self::Entity(entity) => entity.var().as_var(),
            Self::Primitive(prim) => prim.var().as_var(),
            Self::Predicate(pred) => match pred.exprs() {
                [expr] => expr.as_var(),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(bare) => write!(f, "{bare}"),
            Self::Predicate(pred) => write!(f, "{pred}"),
            Self::Entity(entity) => write!(f, "{entity}"),
            Self::Primitive(prim) => write!(f, "{prim}"),
            Self::RefMode(refmode) => write!(f, "{refmode}"),
            Self::Functional(func) => write!(f, "{func}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn var(n: &str) -> Expr {
        Expr::Var(n.into())
    }

    fn ini(scope: &str) -> Initializer {
        Initializer::new(Some(scope.to_string()), HashSet::new())
    }

    #[test]
    fn primitive_capacity_normalization() {
        let int = Primitive::new(PrimitiveType::Int, None, var("x"));
        assert_eq!(int.name(), "int[64]");

        let narrow = Primitive::new(PrimitiveType::Int, Some(32), var("x"));
        assert_eq!(narrow.name(), "int[32]");

        let boolean = Primitive::new(PrimitiveType::Boolean, Some(8), var("x"));
        assert_eq!(boolean.name(), "boolean");
    }

    #[test]
    fn entity_init_rescopes_name() {
        let entity = Entity::new("Person".into(), var("p"));
        let scoped = entity.init(&ini("S"));
        assert_eq!(scoped.name(), "S:Person");
        assert_eq!(scoped.to_string(), "S:Person(p)");
    }

    #[test]
    fn refmode_init_skips_primitive() {
        let refmode = RefMode::new(
            "Person:id".into(),
            Entity::new("Person".into(), var("p")),
            Primitive::new(PrimitiveType::Str, None, var("n")),
        );
        let scoped = refmode.init(&ini("S"));
        assert_eq!(scoped.name(), "S:Person:id");
        assert_eq!(scoped.entity().name(), "S:Person");
        assert_eq!(scoped.primitive().name(), "string");
    }

    #[test]
    fn refmode_display_and_arity() {
        let refmode = Atom::RefMode(RefMode::new(
            "Person:id".into(),
            Entity::new("Person".into(), var("p")),
            Primitive::new(PrimitiveType::Str, None, var("n")),
        ));
        assert_eq!(refmode.to_string(), "Person:id(p:n)");
        assert_eq!(refmode.arity(), 2);
        assert_eq!(refmode.kind(), AtomKind::Refmode);
    }

    #[test]
    fn bare_atom_is_init_fixed_point() {
        let bare = Atom::Bare(BareAtom::new("Foo".into(), AtomKind::Predicate, 2));
        assert_eq!(bare.init(&ini("S")), bare);
        assert_eq!(bare.signature(), "Foo/2");
    }

    #[test]
    fn single_var_per_kind() {
        let entity = Atom::Entity(Entity::new("Person".into(), var("p")));
        assert_eq!(entity.single_var(), Some("p"));

        let binary = Atom::Predicate(PredicateAtom::new("edge".into(), vec![var("x"), var("y")]));
        assert_eq!(binary.single_var(), None);
    }
}
