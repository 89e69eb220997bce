//! Program representation and assembly.
//!
//! Parsing a source file yields a [`SourceUnit`]: the global component,
//! the named component blocks, the instantiations and the stage
//! propagations, exactly as written. [`SourceUnit::resolve`] flattens
//! inheritance, runs the scoped renaming for every instantiation and
//! assembles the final [`Program`].

use super::{
    component::{Comp, Component},
    declaration::{ArrowStatement, Decl},
    error::ParserError,
    logic::{BriocheRule, Constraint},
    scope::{revert, Initializer},
    BriocheParser, Lexeme, Result, Rule,
};
use pest::{iterators::Pair, Parser};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::{fmt, fs};
use tracing::{info, warn};

/// A `propagate {P, Q} from I to J.` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Propagation {
    preds: Vec<String>,
    from: String,
    to: String,
}

impl Propagation {
    #[must_use]
    #[inline]
    pub fn preds(&self) -> &[String] {
        &self.preds
    }

    #[must_use]
    #[inline]
    pub fn from(&self) -> &str {
        &self.from
    }

    #[must_use]
    #[inline]
    pub fn to(&self) -> &str {
        &self.to
    }
}

/// One parsed source file, before flattening and renaming.
#[derive(Debug, Clone, Default)]
pub struct SourceUnit {
    global: Component,
    comps: BTreeMap<String, Comp>,
    inits: Vec<(String, String)>,
    props: Vec<Propagation>,
}

impl SourceUnit {
    /// Parse a source string into its structural parts.
    pub fn parse_str(source: &str) -> Result<Self> {
        let parsed = BriocheParser::parse(Rule::main_grammar, source)
            .map_err(|e| ParserError::FailedToParseProgram(e.to_string()))?
            .next()
            .ok_or_else(|| {
                ParserError::FailedToParseProgram("no top-level grammar node".into())
            })?;
        Self::from_parsed_rule(parsed)
    }

    /// The top-level component holding file-scope declarations and rules.
    #[must_use]
    #[inline]
    pub fn global(&self) -> &Component {
        &self.global
    }

    #[must_use]
    #[inline]
    pub fn comps(&self) -> &BTreeMap<String, Comp> {
        &self.comps
    }

    #[must_use]
    #[inline]
    pub fn inits(&self) -> &[(String, String)] {
        &self.inits
    }

    #[must_use]
    #[inline]
    pub fn props(&self) -> &[Propagation] {
        &self.props
    }

    /// The instantiation ids in use.
    #[must_use]
    pub fn init_ids(&self) -> HashSet<String> {
        self.inits.iter().map(|(id, _)| id.clone()).collect()
    }

    /// For every propagation target, the set of source instantiations
    /// feeding it. This is the map [`revert`] consumes to resolve
    /// `:past` references back to their origin.
    #[must_use]
    pub fn reverse_props(&self) -> HashMap<String, HashSet<String>> {
        let mut reverse: HashMap<String, HashSet<String>> = HashMap::new();
        for prop in &self.props {
            reverse
                .entry(prop.to().to_string())
                .or_default()
                .insert(prop.from().to_string());
        }
        reverse
    }

    /// Map a fully qualified relation name back to the instantiation(s)
    /// that produced it.
    #[must_use]
    pub fn revert_name(&self, scoped: &str) -> HashSet<String> {
        revert(scoped, &self.init_ids(), &self.reverse_props())
    }

    /// Flatten, rename and assemble the program.
    pub fn resolve(&self) -> Result<Program> {
        let globals = self.global.declared_names();
        let global_ini = Initializer::new(None, globals.clone());
        let global = self.global.init(&global_ini)?;

        let mut predicates: Vec<Decl> = global.preds().values().cloned().collect();
        let mut special_predicates: Vec<Decl> = global.types().values().cloned().collect();
        let mut rules: Vec<BriocheRule> = global.rules().to_vec();
        let mut constraints: Vec<Constraint> = global.constraints().to_vec();

        let mut seen_ids = HashSet::new();
        for (id, comp_name) in &self.inits {
            if !seen_ids.insert(id.clone()) {
                return Err(ParserError::DuplicateInstantiation(id.clone()));
            }
            let comp = self
                .comps
                .get(comp_name)
                .ok_or_else(|| ParserError::UnknownComponent(comp_name.clone()))?;
            let ini = Initializer::new(Some(id.clone()), globals.clone());
            let scoped = comp.flatten(&self.comps)?.init(&ini)?;
            info!(id = %id, component = %comp_name, "instantiated component");

            match scoped {
                Comp::Plain(comp) => {
                    predicates.extend(comp.preds().values().cloned());
                    special_predicates.extend(comp.types().values().cloned());
                    rules.extend(comp.rules().iter().cloned());
                    constraints.extend(comp.constraints().iter().cloned());
                }
                Comp::Cmd(block) => {
                    for decl in block.decls() {
                        if decl.is_special() {
                            special_predicates.push(decl.clone());
                        } else {
                            predicates.push(decl.clone());
                        }
                    }
                }
            }
        }

        let program = Program::new(predicates, special_predicates, rules, constraints);
        program.warn_undeclared();
        Ok(program)
    }
}

impl Lexeme for SourceUnit {
    /// Collect the top-level statements of one source file.
    fn from_parsed_rule(parsed_rule: Pair<Rule>) -> Result<Self> {
        let mut unit = Self {
            global: Component::new(String::new(), None),
            ..Self::default()
        };

        for node in parsed_rule.into_inner() {
            match node.as_rule() {
                Rule::component_block | Rule::cmd_block => {
                    let comp = Comp::from_parsed_rule(node)?;
                    unit.comps.insert(comp.name().to_string(), comp);
                }
                Rule::init_stmt => {
                    let mut inner = node.into_inner();
                    let id = inner
                        .next()
                        .ok_or_else(|| {
                            ParserError::MissingToken("id".into(), "instantiation".into())
                        })?
                        .as_str()
                        .to_string();
                    let comp = inner
                        .next()
                        .ok_or_else(|| {
                            ParserError::MissingToken("component".into(), "instantiation".into())
                        })?
                        .as_str()
                        .to_string();
                    unit.inits.push((id, comp));
                }
                Rule::propagate_stmt => {
                    let mut names: Vec<String> = node
                        .into_inner()
                        .map(|p| p.as_str().to_string())
                        .collect();
                    if names.len() < 3 {
                        return Err(ParserError::MissingToken(
                            "source and target".into(),
                            "propagation".into(),
                        ));
                    }
                    let to = names.pop().unwrap_or_default();
                    let from = names.pop().unwrap_or_default();
                    unit.props.push(Propagation {
                        preds: names,
                        from,
                        to,
                    });
                }
                Rule::arrow_stmt => match ArrowStatement::from_parsed_rule(node)? {
                    ArrowStatement::Declaration(decl) => unit.global.add_decl(decl),
                    ArrowStatement::Constraint(cons) => unit.global.add_cons(cons),
                },
                Rule::logic_rule => unit.global.add_rule(BriocheRule::from_parsed_rule(node)?),
                Rule::EOI => {}
                other => {
                    return Err(ParserError::UnexpectedRule(
                        "source unit".into(),
                        format!("{other:?}"),
                    ))
                }
            }
        }
        Ok(unit)
    }
}

/// The fully flattened, name-resolved program.
#[derive(Debug, Clone)]
pub struct Program {
    predicates: Vec<Decl>,
    special_predicates: Vec<Decl>,
    rules: Vec<BriocheRule>,
    constraints: Vec<Constraint>,
}

impl Program {
    /// Assemble and freeze; each section is stably sorted by its
    /// printed representation so output is reproducible.
    #[must_use]
    pub fn new(
        mut predicates: Vec<Decl>,
        mut special_predicates: Vec<Decl>,
        mut rules: Vec<BriocheRule>,
        mut constraints: Vec<Constraint>,
    ) -> Self {
        predicates.sort_by_key(ToString::to_string);
        special_predicates.sort_by_key(ToString::to_string);
        rules.sort_by_key(ToString::to_string);
        constraints.sort_by_key(ToString::to_string);
        Self {
            predicates,
            special_predicates,
            rules,
            constraints,
        }
    }

    /// Parse and resolve a program from a file.
    pub fn parse(path: &str) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::parse_str(&source)
    }

    /// Parse and resolve a program from a source string.
    pub fn parse_str(source: &str) -> Result<Self> {
        SourceUnit::parse_str(source)?.resolve()
    }

    #[must_use]
    #[inline]
    pub fn predicates(&self) -> &[Decl] {
        &self.predicates
    }

    #[must_use]
    #[inline]
    pub fn special_predicates(&self) -> &[Decl] {
        &self.special_predicates
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

    /// Names declared in either predicate section.
    #[must_use]
    pub fn declared_names(&self) -> HashSet<String> {
        self.predicates
            .iter()
            .chain(self.special_predicates.iter())
            .map(Decl::name)
            .collect()
    }

    /// Log every relation referenced by a rule body but never declared.
    fn warn_undeclared(&self) {
        let declared = self.declared_names();
        let mut reported = HashSet::new();
        for rule in &self.rules {
            for atom in rule.body_atoms() {
                let name = atom.name().to_string();
                if !declared.contains(&name) && reported.insert(name.clone()) {
                    warn!(relation = %name, "referenced but never declared");
                }
            }
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decl in &self.predicates {
            writeln!(f, "{}", decl.schema_line())?;
        }
        for decl in &self.special_predicates {
            writeln!(f, "{}", decl.schema_line())?;
        }
        writeln!(f)?;
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        for cons in &self.constraints {
            writeln!(f, "{cons}")?;
        }
        Ok(())
    }
}
