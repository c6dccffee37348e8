//! Scope-keyed alias table.
//!
//! A second walk over the same units gathers every alias definition under its
//! owning scope key. Tables from many units merge; a later definition of the
//! same (scope, name) pair overwrites an earlier one.

use crate::scope::ScopePath;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use umock_syntax::decl::{Decl, SourceUnit, TypeDecl};
use umock_syntax::members::{AliasDecl, Member};
use umock_syntax::types::TypeExpr;

/// One alias definition attributed to its owning scope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AliasDefinition {
    pub name: String,
    pub generic_params: Vec<String>,
    pub target: TypeExpr,
    pub scope_key: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AliasTable {
    by_scope: IndexMap<String, IndexMap<String, AliasDefinition>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a batch of units.
    pub fn build(units: &[SourceUnit]) -> Self {
        let mut table = Self::new();
        for unit in units {
            table.add_unit(unit);
        }
        table
    }

    pub fn add_unit(&mut self, unit: &SourceUnit) {
        let mut scope = ScopePath::root();
        for item in &unit.items {
            match item {
                Decl::Alias(alias) => self.insert(&scope, alias),
                Decl::Type(decl) => self.walk_type(decl, &mut scope),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_scope.is_empty()
    }

    pub fn insert(&mut self, scope: &ScopePath, alias: &AliasDecl) {
        let scope_key = scope.key();
        let definition = AliasDefinition {
            name: alias.name.clone(),
            generic_params: alias.generic_params.clone(),
            target: alias.target.clone(),
            scope_key: scope_key.clone(),
        };
        self.by_scope
            .entry(scope_key)
            .or_default()
            .insert(alias.name.clone(), definition);
    }

    /// Exact-scope lookup.
    pub fn lookup(&self, scope_key: &str, name: &str) -> Option<&AliasDefinition> {
        self.by_scope.get(scope_key)?.get(name)
    }

    /// Scope-chain lookup: innermost scope first, global scope last.
    pub fn lookup_in_chain(&self, name: &str, scope: &ScopePath) -> Option<&AliasDefinition> {
        scope
            .chain()
            .find_map(|scope_key| self.lookup(&scope_key, name))
    }

    /// Whether any enclosing scope of `scope` defines at least one alias.
    pub fn has_aliases_in_chain(&self, scope: &ScopePath) -> bool {
        scope.chain().any(|scope_key| {
            self.by_scope
                .get(&scope_key)
                .is_some_and(|aliases| !aliases.is_empty())
        })
    }

    fn walk_type(&mut self, decl: &TypeDecl, scope: &mut ScopePath) {
        scope.push(decl.name.clone());
        for member in &decl.members {
            match member {
                Member::Alias(alias) => self.insert(scope, alias),
                Member::Nested(nested) => self.walk_type(nested, scope),
                _ => {}
            }
        }
        scope.pop();
    }
}
