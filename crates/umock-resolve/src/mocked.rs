//! Mocked-type discovery and inheritance flattening.
//!
//! A declaration opts in with the marker in its leading comment. An annotated
//! extension redirects the marker to the first collected declaration with the
//! same name. Each inheritance walk is depth-first preorder over declared
//! inheritance lists with a per-call visited set, so diamonds contribute each
//! ancestor once and cycles terminate; a depth guard turns a pathological
//! graph into a fatal precondition failure instead of a stack overflow.

use crate::alias_table::AliasTable;
use crate::collector::{TypeId, TypeInfo};
use crate::scope::GLOBAL_SCOPE_KEY;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;
use umock_common::diagnostics::{Diagnostic, GenError, GenResult};
use umock_common::limits::MAX_INHERITANCE_DEPTH;
use umock_syntax::annotations::has_marker;
use umock_syntax::decl::TypeKind;

/// One declaration selected for synthesis, with its inheritance closure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MockedType {
    Interface {
        declaration: TypeInfo,
        /// Transitively inherited interfaces, depth-first preorder, each once.
        inherited: Vec<TypeInfo>,
    },
    Class {
        declaration: TypeInfo,
        /// Superclass chain, nearest first.
        superclasses: Vec<TypeInfo>,
        /// Interfaces adopted anywhere on the chain, flattened.
        interfaces: Vec<TypeInfo>,
    },
}

impl MockedType {
    pub fn declaration(&self) -> &TypeInfo {
        match self {
            Self::Interface { declaration, .. } | Self::Class { declaration, .. } => declaration,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration().name
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Self::Class { .. })
    }

    /// The declaration followed by everything it inherits members from, in
    /// member-collection order.
    pub fn family(&self) -> Vec<&TypeInfo> {
        match self {
            Self::Interface {
                declaration,
                inherited,
            } => std::iter::once(declaration).chain(inherited).collect(),
            Self::Class {
                declaration,
                superclasses,
                interfaces,
            } => std::iter::once(declaration)
                .chain(superclasses)
                .chain(interfaces)
                .collect(),
        }
    }
}

/// Output of mocked-type resolution: the selected types plus non-fatal
/// observations made along the way.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedMocks {
    pub mocks: Vec<MockedType>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct MockedTypeResolver<'a> {
    types: Vec<TypeInfo>,
    by_name: rustc_hash::FxHashMap<String, TypeId>,
    table: &'a AliasTable,
    marker_keys: Vec<String>,
}

impl<'a> MockedTypeResolver<'a> {
    /// Build the resolver over collected declarations. Extensions are merged
    /// into their base declaration here: their members join the base member
    /// lists flagged as extension-declared, and their directives join the
    /// base annotation map.
    pub fn new(collected: Vec<TypeInfo>, table: &'a AliasTable, marker_keys: Vec<String>) -> Self {
        let mut types = collected;
        let mut by_name = rustc_hash::FxHashMap::default();
        for (index, info) in types.iter().enumerate() {
            if !info.is_extension() {
                by_name
                    .entry(info.name.clone())
                    .or_insert(TypeId(index as u32));
            }
        }

        let merges: Vec<(usize, TypeId)> = types
            .iter()
            .enumerate()
            .filter(|(_, info)| info.is_extension())
            .filter_map(|(index, info)| by_name.get(&info.name).map(|id| (index, *id)))
            .collect();
        for (source, target) in merges {
            let mut extension = types[source].clone();
            for method in &mut extension.methods {
                method.declared_in_extension = true;
            }
            for property in &mut extension.properties {
                property.declared_in_extension = true;
            }
            for subscript in &mut extension.subscripts {
                subscript.declared_in_extension = true;
            }

            let base = &mut types[target.index()];
            base.methods.extend(extension.methods);
            base.properties.extend(extension.properties);
            base.subscripts.extend(extension.subscripts);
            base.inherited.extend(extension.inherited);
            for (key, values) in extension.annotations {
                base.annotations.entry(key).or_default().extend(values);
            }
        }

        Self {
            types,
            by_name,
            table,
            marker_keys,
        }
    }

    pub fn types(&self) -> &[TypeInfo] {
        &self.types
    }

    /// Select every annotated declaration and flatten its inheritance.
    pub fn resolve(&self) -> GenResult<ResolvedMocks> {
        let mut resolved = ResolvedMocks::default();
        let mut selected: FxHashSet<TypeId> = FxHashSet::default();
        let mut selected_names: FxHashSet<String> = FxHashSet::default();

        for (index, info) in self.types.iter().enumerate() {
            let Some(comment) = info.comment.as_deref() else {
                continue;
            };
            if !has_marker(comment, &self.marker_keys) {
                continue;
            }

            let target = if info.is_extension() {
                match self.by_name.get(&info.name) {
                    Some(id) => *id,
                    None => {
                        resolved.diagnostics.push(Diagnostic::warning(
                            Some(info.name.clone()),
                            "annotated extension has no matching declaration",
                        ));
                        continue;
                    }
                }
            } else {
                TypeId(index as u32)
            };

            // The same declaration annotated twice (directly and through an
            // extension) is selected once, silently.
            if !selected.insert(target) {
                debug!(name = %info.name, "declaration already selected; marker ignored");
                continue;
            }
            let declaration = &self.types[target.index()];
            if !selected_names.insert(declaration.name.clone()) {
                resolved.diagnostics.push(Diagnostic::warning(
                    Some(declaration.name.clone()),
                    "duplicate annotated declaration with this name; keeping the first",
                ));
                continue;
            }

            match declaration.kind {
                TypeKind::Interface => {
                    let mut visited: FxHashSet<TypeId> = FxHashSet::default();
                    visited.insert(target);
                    let mut inherited = Vec::new();
                    self.flatten_interfaces(declaration, &mut visited, 0, &mut inherited)?;
                    resolved.mocks.push(MockedType::Interface {
                        declaration: declaration.clone(),
                        inherited: inherited
                            .into_iter()
                            .map(|id| self.types[id.index()].clone())
                            .collect(),
                    });
                }
                TypeKind::Class => {
                    resolved.mocks.push(self.resolve_class(target, declaration)?);
                }
                TypeKind::ValueType | TypeKind::Enum | TypeKind::Extension => {
                    resolved.diagnostics.push(Diagnostic::warning(
                        Some(declaration.name.clone()),
                        "only interfaces and classes can be mocked",
                    ));
                }
            }
        }

        Ok(resolved)
    }

    fn resolve_class(&self, id: TypeId, declaration: &TypeInfo) -> GenResult<MockedType> {
        let mut superclasses = Vec::new();
        let mut interface_ids = Vec::new();
        let mut visited_classes: FxHashSet<TypeId> = FxHashSet::default();
        visited_classes.insert(id);
        let mut visited_interfaces: FxHashSet<TypeId> = FxHashSet::default();

        let mut current = declaration;
        loop {
            if superclasses.len() > MAX_INHERITANCE_DEPTH {
                return Err(GenError::precondition(
                    declaration.name.clone(),
                    "superclass chain exceeds the inheritance depth limit",
                ));
            }
            self.flatten_interfaces(current, &mut visited_interfaces, 0, &mut interface_ids)?;

            let next = current.inherited.iter().find_map(|name| {
                let parent = self.lookup_inherited(name)?;
                let is_new_class = self.types[parent.index()].kind == TypeKind::Class
                    && !visited_classes.contains(&parent);
                is_new_class.then_some(parent)
            });
            match next {
                Some(parent) => {
                    visited_classes.insert(parent);
                    superclasses.push(parent);
                    current = &self.types[parent.index()];
                }
                None => break,
            }
        }

        Ok(MockedType::Class {
            declaration: declaration.clone(),
            superclasses: superclasses
                .into_iter()
                .map(|id| self.types[id.index()].clone())
                .collect(),
            interfaces: interface_ids
                .into_iter()
                .map(|id| self.types[id.index()].clone())
                .collect(),
        })
    }

    /// Depth-first preorder over inherited interfaces. `visited` is shared
    /// across one walk only, which is what makes diamonds collapse and cycles
    /// terminate.
    fn flatten_interfaces(
        &self,
        info: &TypeInfo,
        visited: &mut FxHashSet<TypeId>,
        depth: usize,
        out: &mut Vec<TypeId>,
    ) -> GenResult<()> {
        if depth > MAX_INHERITANCE_DEPTH {
            return Err(GenError::precondition(
                info.name.clone(),
                "inheritance graph exceeds the depth limit",
            ));
        }
        for name in &info.inherited {
            let Some(parent) = self.lookup_inherited(name) else {
                // Unknown names (foreign interfaces, marker conformances)
                // contribute no members.
                continue;
            };
            let parent_info = &self.types[parent.index()];
            if parent_info.kind != TypeKind::Interface {
                continue;
            }
            if !visited.insert(parent) {
                continue;
            }
            out.push(parent);
            self.flatten_interfaces(parent_info, visited, depth + 1, out)?;
        }
        Ok(())
    }

    /// Resolve a spelled inheritance name to a collected declaration. A name
    /// that misses directly may be a global alias of the real declaration.
    fn lookup_inherited(&self, name: &str) -> Option<TypeId> {
        if let Some(id) = self.by_name.get(name) {
            return Some(*id);
        }
        let definition = self.table.lookup(GLOBAL_SCOPE_KEY, name)?;
        let head = definition.target.head_name()?;
        self.by_name.get(head).copied()
    }
}
