//! Declarations and the classification of `lhs -> rhs.` statements.
//!
//! An arrow statement is a predicate declaration, an entity
//! declaration, a refmode declaration or an integrity constraint,
//! depending on its shape. [`ArrowStatement`] performs that dispatch
//! after parsing.

use super::{Atom, Entity, FunctionalAtom, PredicateAtom, Primitive, RefMode};
use crate::error::ParserError;
use crate::logic::{Constraint, Element, Expr, LogicalElement, RelationElement};
use crate::primitive::PrimitiveType;
use crate::scope::Initializer;
use crate::{Lexeme, Result, Rule};
use itertools::Itertools;
use pest::iterators::Pair;
use std::fmt;

/// A declaration pairing a head atom with its column types.
///
/// The type list is stored reordered to the head's own variable
/// order; `types[i]` always describes head variable `i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration {
    atom: Atom,
    types: Vec<Atom>,
}

impl Declaration {
    /// Build a declaration, reordering `types` to the head's variable
    /// order. A non-empty type list must be unary per atom and cover
    /// every head variable exactly, so the head's variables must be
    /// pairwise distinct.
    pub fn new(atom: Atom, types: Vec<Atom>) -> Result<Self> {
        if types.is_empty() {
            return Ok(Self { atom, types });
        }

        let head_vars = head_vars(&atom);
        for (i, head_var) in head_vars.iter().enumerate() {
            if head_vars[..i].contains(head_var) {
                return Err(ParserError::MalformedDeclaration(
                    atom.name(),
                    format!("head variable {head_var} is bound more than once"),
                ));
            }
        }
        if types.len() != head_vars.len() {
            return Err(ParserError::MalformedDeclaration(
                atom.name(),
                format!(
                    "{} types supplied for {} head variables",
                    types.len(),
                    head_vars.len()
                ),
            ));
        }

        let mut ordered = Vec::with_capacity(head_vars.len());
        for head_var in &head_vars {
            let matched = types
                .iter()
                .find(|t| t.single_var() == Some(head_var.as_str()))
                .ok_or_else(|| {
                    ParserError::MalformedDeclaration(
                        atom.name(),
                        format!("no unary type atom over head variable {head_var}"),
                    )
                })?;
            ordered.push(matched.clone());
        }
        Ok(Self {
            atom,
            types: ordered,
        })
    }

    #[must_use]
    #[inline]
    pub fn atom(&self) -> &Atom {
        &self.atom
    }

    #[must_use]
    #[inline]
    pub fn types(&self) -> &[Atom] {
        &self.types
    }

    /// Only the head atom; the type atoms are references, not
    /// declarations of their own.
    #[must_use]
    pub fn atoms(&self) -> Vec<&Atom> {
        vec![&self.atom]
    }

    pub fn init(&self, initializer: &Initializer) -> Result<Self> {
        Self::new(
            self.atom.init(initializer),
            self.types.iter().map(|t| t.init(initializer)).collect(),
        )
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.types.is_empty() {
            write!(f, "{} -> .", self.atom)
        } else {
            write!(
                f,
                "{} -> {}.",
                self.atom,
                self.types.iter().map(Atom::signature).join(", ")
            )
        }
    }
}

/// A refmode declaration: an entity, its refmode relation and the
/// primitive backing type, declared in one statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefModeDeclaration {
    refmode: RefMode,
}

impl RefModeDeclaration {
    #[must_use]
    pub fn new(refmode: RefMode) -> Self {
        Self { refmode }
    }

    #[must_use]
    #[inline]
    pub fn refmode(&self) -> &RefMode {
        &self.refmode
    }

    #[must_use]
    #[inline]
    pub fn entity(&self) -> &Entity {
        self.refmode.entity()
    }

    #[must_use]
    #[inline]
    pub fn primitive(&self) -> &Primitive {
        self.refmode.primitive()
    }

    /// Two entries: the refmode relation and the entity it keys.
    #[must_use]
    pub fn atoms(&self) -> Vec<Atom> {
        vec![
            Atom::RefMode(self.refmode.clone()),
            Atom::Entity(self.entity().clone()),
        ]
    }

    #[must_use]
    pub fn init(&self, initializer: &Initializer) -> Self {
        Self {
            refmode: self.refmode.init(initializer),
        }
    }
}

impl fmt::Display for RefModeDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} -> {}.",
            self.entity(),
            self.refmode,
            self.primitive()
        )
    }
}

/// Any declaration statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Decl {
    Plain(Declaration),
    RefMode(RefModeDeclaration),
}

impl Decl {
    /// The declared relation's name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Plain(decl) => decl.atom().name(),
            Self::RefMode(decl) => decl.refmode().name().to_string(),
        }
    }

    /// True for declarations of entities and refmodes, which the
    /// assembled program reports separately from ordinary predicates.
    #[must_use]
    pub fn is_special(&self) -> bool {
        match self {
            Self::Plain(decl) => matches!(decl.atom(), Atom::Entity(_)),
            Self::RefMode(_) => true,
        }
    }

    #[must_use]
    pub fn atoms(&self) -> Vec<Atom> {
        match self {
            Self::Plain(decl) => decl.atoms().into_iter().cloned().collect(),
            Self::RefMode(decl) => decl.atoms(),
        }
    }

    pub fn init(&self, initializer: &Initializer) -> Result<Self> {
        Ok(match self {
            Self::Plain(decl) => Self::Plain(decl.init(initializer)?),
            Self::RefMode(decl) => Self::RefMode(decl.init(initializer)),
        })
    }

    /// Schema line for program output: `name/arity (type1 x type2)`.
    #[must_use]
    pub fn schema_line(&self) -> String {
        match self {
            Self::Plain(decl) => {
                let signature = decl.atom().signature();
                if decl.types().is_empty() {
                    signature
                } else {
                    format!(
                        "{} ({})",
                        signature,
                        decl.types().iter().map(Atom::name).join(" x ")
                    )
                }
            }
            Self::RefMode(decl) => format!(
                "{}/2 ({} x {})",
                decl.refmode().name(),
                decl.entity().name(),
                decl.primitive().name()
            ),
        }
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(decl) => write!(f, "{decl}"),
            Self::RefMode(decl) => write!(f, "{decl}"),
        }
    }
}

/// Outcome of classifying an `lhs -> rhs.` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrowStatement {
    Declaration(Decl),
    Constraint(Constraint),
}

impl Lexeme for ArrowStatement {
    /// Dispatch on the statement's shape, in decreasing specificity:
    /// refmode declaration, bare declaration, typed declaration,
    /// integrity constraint.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        let mut inner = parsed_rule.into_inner();
        let lhs_pair = inner.next().ok_or_else(|| {
            ParserError::MissingToken("left-hand side".into(), "arrow statement".into())
        })?;
        let lhs: Vec<Element> = lhs_pair
            .into_inner()
            .map(Element::from_parsed_rule)
            .collect::<Result<Vec<_>>>()?;
        let rhs_pair = inner.next();

        // `;` on the right can only be a constraint body.
        let rhs: Option<Vec<Element>> = match &rhs_pair {
            None => None,
            Some(pair) => {
                let conjunctions: Vec<_> = pair.clone().into_inner().collect();
                match conjunctions.as_slice() {
                    [single] if single.as_rule() == Rule::conjunction => Some(
                        single
                            .clone()
                            .into_inner()
                            .map(Element::from_parsed_rule)
                            .collect::<Result<Vec<_>>>()?,
                    ),
                    _ => Some(vec![]),
                }
            }
        };

        if let (Some(rhs_elements), true) = (&rhs, rhs_pair.is_some()) {
            if !rhs_elements.is_empty() {
                if let Some(decl) = try_refmode(&lhs, rhs_elements)? {
                    return Ok(Self::Declaration(Decl::RefMode(decl)));
                }
                if let Some(decl) = try_typed_declaration(&lhs, rhs_elements)? {
                    return Ok(Self::Declaration(Decl::Plain(decl)));
                }
            }
        }

        if rhs_pair.is_none() {
            return bare_declaration(&lhs).map(|d| Self::Declaration(Decl::Plain(d)));
        }

        // Everything else is an integrity constraint.
        let head = single_or_conjunction(lhs);
        let body = rhs_pair
            .map(Element::from_parsed_rule)
            .transpose()?;
        Ok(Self::Constraint(Constraint::new(head, body)))
    }
}

fn single_or_conjunction(mut elements: Vec<Element>) -> Element {
    if elements.len() == 1 {
        elements.remove(0)
    } else {
        Element::Logical(LogicalElement::conjunction(elements))
    }
}

/// `Entity(p), Entity:ref(p:n) -> primitive(n).`
fn try_refmode(lhs: &[Element], rhs: &[Element]) -> Result<Option<RefModeDeclaration>> {
    let [Element::Relation(entity_rel), Element::RefMode(refmode_el)] = lhs else {
        return Ok(None);
    };
    if entity_rel.arity() != 1 || !entity_rel.all_vars() {
        return Ok(None);
    }
    let [Element::Relation(backing)] = rhs else {
        return Ok(None);
    };
    let Some(entity_var) = entity_rel.args()[0].as_var() else {
        return Ok(None);
    };
    if refmode_el.entity_var() != entity_var {
        return Err(ParserError::ParseDispatch(
            refmode_el.name().to_string(),
            format!(
                "refmode keys variable {} but the entity binds {}",
                refmode_el.entity_var(),
                entity_var
            ),
        ));
    }

    // The refmode name is qualified by its owning entity.
    let owner = refmode_el.name().split(':').next().unwrap_or_default();
    if owner != entity_rel.name() {
        return Err(ParserError::ParseDispatch(
            refmode_el.name().to_string(),
            format!("refmode is not owned by entity {}", entity_rel.name()),
        ));
    }

    let primitive = primitive_from_relation(backing).ok_or_else(|| {
        ParserError::MalformedDeclaration(
            refmode_el.name().to_string(),
            format!("refmode backing type {} is not a primitive", backing.name()),
        )
    })?;
    let entity = Entity::new(
        entity_rel.name().to_string(),
        entity_rel.args()[0].clone(),
    );
    Ok(Some(RefModeDeclaration::new(RefMode::new(
        refmode_el.name().to_string(),
        entity,
        primitive,
    ))))
}

/// `Head(...) -> T1(v1), ..., Tn(vn).` where every rhs atom is unary
/// over one of the head's variables.
fn try_typed_declaration(lhs: &[Element], rhs: &[Element]) -> Result<Option<Declaration>> {
    let head = match lhs {
        [Element::Relation(rel)] if rel.all_vars() => Atom::Predicate(PredicateAtom::new(
            rel.name().to_string(),
            rel.args().to_vec(),
        )),
        [Element::Functional(func)] if func.all_vars() && func.value().is_some() => {
            let Some(value) = func.value() else {
                return Ok(None);
            };
            Atom::Functional(FunctionalAtom::new(
                func.name().to_string(),
                func.keys().to_vec(),
                value.clone(),
            ))
        }
        _ => return Ok(None),
    };

    let mut types = Vec::with_capacity(rhs.len());
    for element in rhs {
        let Element::Relation(rel) = element else {
            return Ok(None);
        };
        if rel.arity() != 1 || !rel.all_vars() {
            return Ok(None);
        }
        types.push(match primitive_from_relation(rel) {
            Some(primitive) => Atom::Primitive(primitive),
            None => Atom::Predicate(PredicateAtom::new(
                rel.name().to_string(),
                rel.args().to_vec(),
            )),
        });
    }

    // A unary type atom over a variable the head never binds makes
    // this a constraint, not a declaration.
    let bound = head_vars(&head);
    for t in &types {
        match t.single_var() {
            Some(var) if bound.iter().any(|b| b == var) => {}
            _ => return Ok(None),
        }
    }

    Declaration::new(head, types).map(Some)
}

/// `Name(x) -> .` declares an entity; wider heads declare a bare
/// predicate with no column types.
fn bare_declaration(lhs: &[Element]) -> Result<Declaration> {
    let [Element::Relation(rel)] = lhs else {
        return Err(ParserError::ParseDispatch(
            lhs.iter().map(ToString::to_string).join(", "),
            "a typeless declaration must have a single relation head".into(),
        ));
    };
    if !rel.all_vars() {
        return Err(ParserError::ParseDispatch(
            rel.name().to_string(),
            "declaration arguments must be variables".into(),
        ));
    }
    let atom = if rel.arity() == 1 {
        Atom::Entity(Entity::new(rel.name().to_string(), rel.args()[0].clone()))
    } else {
        Atom::Predicate(PredicateAtom::new(
            rel.name().to_string(),
            rel.args().to_vec(),
        ))
    };
    Declaration::new(atom, vec![])
}

/// Recognize `int[32](x)`-style relations as primitive type atoms.
fn primitive_from_relation(rel: &RelationElement) -> Option<Primitive> {
    if rel.arity() != 1 {
        return None;
    }
    let (kind, capacity) = PrimitiveType::parse_name(rel.name())?;
    Some(Primitive::new(kind, capacity, rel.args()[0].clone()))
}

/// Variables bound by a declaration head, in positional order.
fn head_vars(atom: &Atom) -> Vec<String> {
    let exprs: Vec<&Expr> = match atom {
        Atom::Predicate(pred) => pred.exprs().iter().collect(),
        Atom::Entity(entity) => vec![entity.var()],
        Atom::Functional(func) => {
            let mut out: Vec<&Expr> = func.keys().iter().collect();
            out.push(func.value());
            out
        }
        _ => vec![],
    };
    exprs
        .iter()
        .filter_map(|e| e.as_var().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::AtomKind;

    fn var(n: &str) -> Expr {
        Expr::Var(n.into())
    }

    fn pred(name: &str, vars: &[&str]) -> Atom {
        Atom::Predicate(PredicateAtom::new(
            name.into(),
            vars.iter().map(|v| var(v)).collect(),
        ))
    }

    fn unary_type(name: &str, v: &str) -> Atom {
        pred(name, &[v])
    }

    #[test]
    fn display_golden() {
        let decl = Declaration::new(pred("Foo", &["x"]), vec![unary_type("Bar", "x")])
            .expect("well-formed declaration");
        assert_eq!(decl.to_string(), "Foo(x) -> Bar/1.");
    }

    #[test]
    fn types_reorder_to_head_variable_order() {
        let decl = Declaration::new(
            pred("P", &["y", "x"]),
            vec![unary_type("T_for_x", "x"), unary_type("T_for_y", "y")],
        )
        .expect("well-formed declaration");
        let names: Vec<String> = decl.types().iter().map(Atom::name).collect();
        assert_eq!(names, vec!["T_for_y", "T_for_x"]);
    }

    #[test]
    fn partial_type_list_is_rejected() {
        let err = Declaration::new(pred("P", &["x", "y"]), vec![unary_type("T", "x")])
            .expect_err("partial type list");
        assert!(matches!(err, ParserError::MalformedDeclaration(_, _)));
    }

    #[test]
    fn duplicate_head_variable_is_rejected() {
        let err = Declaration::new(
            pred("P", &["x", "x"]),
            vec![unary_type("T", "x"), unary_type("U", "x")],
        )
        .expect_err("duplicate head variable");
        assert!(matches!(err, ParserError::MalformedDeclaration(_, _)));
    }

    #[test]
    fn type_over_unbound_variable_is_rejected() {
        let err = Declaration::new(pred("P", &["x"]), vec![unary_type("T", "z")])
            .expect_err("type over unbound variable");
        assert!(matches!(err, ParserError::MalformedDeclaration(_, _)));
    }

    #[test]
    fn refmode_declaration_reports_two_atoms() {
        let refmode = RefMode::new(
            "Person:id".into(),
            Entity::new("Person".into(), var("p")),
            Primitive::new(PrimitiveType::Str, None, var("n")),
        );
        let decl = RefModeDeclaration::new(refmode);
        assert_eq!(decl.to_string(), "Person(p), Person:id(p:n) -> string(n).");

        let atoms = decl.atoms();
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].kind(), AtomKind::Refmode);
        assert_eq!(atoms[1].name(), "Person");
    }

    #[test]
    fn schema_lines() {
        let typed = Decl::Plain(
            Declaration::new(
                pred("Foo", &["x", "y"]),
                vec![
                    unary_type("Bar", "x"),
                    Atom::Primitive(Primitive::new(PrimitiveType::Int, None, var("y"))),
                ],
            )
            .expect("well-formed declaration"),
        );
        assert_eq!(typed.schema_line(), "Foo/2 (Bar x int[64])");

        let refmode = Decl::RefMode(RefModeDeclaration::new(RefMode::new(
            "Person:id".into(),
            Entity::new("Person".into(), var("p")),
            Primitive::new(PrimitiveType::Str, None, var("n")),
        )));
        assert_eq!(refmode.schema_line(), "Person:id/2 (Person x string)");
        assert!(refmode.is_special());
    }

    #[test]
    fn entity_declaration_is_special() {
        let entity = Decl::Plain(
            Declaration::new(Atom::Entity(Entity::new("Person".into(), var("p"))), vec![])
                .expect("well-formed declaration"),
        );
        assert!(entity.is_special());
        assert_eq!(entity.to_string(), "Person(p) -> .");
    }
}
