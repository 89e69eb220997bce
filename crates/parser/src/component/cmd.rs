//! Command blocks: components carrying shell-execution metadata.
//!
//! A `cmd` block holds no rules or constraints of its own; its body is
//! restricted to declarations and the four `lang:cmd:*` directives.

use crate::declaration::{Decl, Directive};
use crate::error::ParserError;
use crate::logic::{BriocheRule, Constraint};
use crate::primitive::ConstType;
use crate::scope::Initializer;
use crate::Result;
use std::collections::BTreeSet;

const DIR_DIRECTIVE: &str = "lang:cmd:DIR";
const EVAL_DIRECTIVE: &str = "lang:cmd:EVAL";
const EXPORT_DIRECTIVE: &str = "lang:cmd:export";
const IMPORT_DIRECTIVE: &str = "lang:cmd:import";

/// A command block.
#[derive(Debug, Clone, Default)]
pub struct CmdComponent {
    name: String,
    dir: Option<String>,
    cmd: Option<String>,
    exports: BTreeSet<String>,
    imports: BTreeSet<String>,
    decls: Vec<Decl>,
}

impl CmdComponent {
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Working directory set by `lang:cmd:DIR`.
    #[must_use]
    #[inline]
    pub fn dir(&self) -> Option<&str> {
        self.dir.as_deref()
    }

    /// Shell command set by `lang:cmd:EVAL`.
    #[must_use]
    #[inline]
    pub fn cmd(&self) -> Option<&str> {
        self.cmd.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn exports(&self) -> &BTreeSet<String> {
        &self.exports
    }

    #[must_use]
    #[inline]
    pub fn imports(&self) -> &BTreeSet<String> {
        &self.imports
    }

    #[must_use]
    #[inline]
    pub fn decls(&self) -> &[Decl] {
        &self.decls
    }

    pub fn add_decl(&mut self, decl: Decl) {
        self.decls.push(decl);
    }

    /// Only directive-carrying rules are accepted; the directive is
    /// dispatched by name into the block's metadata.
    pub fn add_rule(&mut self, rule: &BriocheRule) -> Result<()> {
        let Some(directive) = rule.directive() else {
            return Err(ParserError::UnsupportedInBlock(
                rule.to_string(),
                self.name.clone(),
            ));
        };
        match directive.name() {
            DIR_DIRECTIVE => self.dir = Some(directive_text(directive)?),
            EVAL_DIRECTIVE => self.cmd = Some(directive_text(directive)?),
            EXPORT_DIRECTIVE => {
                self.exports.insert(format!("{}:past", backtick(directive)?));
            }
            IMPORT_DIRECTIVE => {
                self.imports.insert(backtick(directive)?.to_string());
            }
            other => return Err(ParserError::InvalidDirective(other.to_string())),
        }
        Ok(())
    }

    /// Command blocks cannot contain constraints.
    pub fn add_cons(&mut self, constraint: &Constraint) -> Result<()> {
        Err(ParserError::UnsupportedInBlock(
            constraint.to_string(),
            self.name.clone(),
        ))
    }

    /// Bulk merge is categorically unsupported on command blocks.
    pub fn add_all(&mut self, other_name: &str) -> Result<()> {
        let _ = other_name;
        Err(ParserError::UnsupportedOperation(format!(
            "addAll on command block {}",
            self.name
        )))
    }

    /// Command blocks take no part in inheritance.
    #[must_use]
    pub fn flatten(&self) -> Self {
        self.clone()
    }

    /// Rewrite every export/import reference and every contained
    /// declaration under the scope id. Exported names re-enter the
    /// rename with their past marker re-expressed as a stage.
    pub fn init(&self, initializer: &Initializer) -> Result<Self> {
        let exports = self
            .exports
            .iter()
            .map(|e| {
                let base = e.strip_suffix(":past").unwrap_or(e);
                initializer.name(base, Some("@past"))
            })
            .collect();
        let imports = self
            .imports
            .iter()
            .map(|i| initializer.name(i, None))
            .collect();
        let decls = self
            .decls
            .iter()
            .map(|d| d.init(initializer))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: initializer.id().unwrap_or(&self.name).to_string(),
            dir: self.dir.clone(),
            cmd: self.cmd.clone(),
            exports,
            imports,
            decls,
        })
    }
}

fn directive_text(directive: &Directive) -> Result<String> {
    directive
        .constant()
        .and_then(ConstType::as_text)
        .map(str::to_string)
        .ok_or_else(|| {
            ParserError::IncompleteDirective(
                directive.name().to_string(),
                "a string constant".into(),
            )
        })
}

fn backtick(directive: &Directive) -> Result<&str> {
    directive.backtick().ok_or_else(|| {
        ParserError::IncompleteDirective(
            directive.name().to_string(),
            "a backtick'd relation reference".into(),
        )
    })
}
