//! Declaration collection.
//!
//! Walks parsed source units with an explicit scope stack and emits one
//! ordered [`TypeInfo`] record per declared type or extension. Collection is
//! per-unit independent; records from many units are concatenated in input
//! order and identified by their position, so every later pass can use dense
//! [`TypeId`] indices for identity.

use crate::scope::ScopePath;
use serde::{Deserialize, Serialize};
use umock_syntax::annotations::{AnnotationMap, parse_annotations};
use umock_syntax::decl::{AccessLevel, Decl, SourceUnit, TypeDecl, TypeKind};
use umock_syntax::members::{
    AliasDecl, AssociatedTypeDecl, GenericConstraint, GenericParam, Member, Method, Property,
    Subscript,
};

/// Dense index of a collected type in the corpus, in collection order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One collected type declaration or extension, members categorized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub kind: TypeKind,
    pub name: String,
    /// Scope containing the declaration (not including its own name).
    pub scope: ScopePath,
    pub access: AccessLevel,
    pub inherited: Vec<String>,
    pub generic_params: Vec<GenericParam>,
    pub constraints: Vec<GenericConstraint>,
    pub methods: Vec<Method>,
    pub properties: Vec<Property>,
    pub subscripts: Vec<Subscript>,
    pub associated_types: Vec<AssociatedTypeDecl>,
    pub aliases: Vec<AliasDecl>,
    pub annotations: AnnotationMap,
    pub comment: Option<String>,
}

impl TypeInfo {
    pub fn is_extension(&self) -> bool {
        self.kind == TypeKind::Extension
    }

    /// Scope key *inside* this declaration, where its own aliases live.
    pub fn inner_scope(&self) -> ScopePath {
        self.scope.child(self.name.clone())
    }

    pub fn qualified_name(&self) -> String {
        if self.scope.is_root() {
            self.name.clone()
        } else {
            format!("{}.{}", self.scope.key(), self.name)
        }
    }
}

/// Walks source units and accumulates [`TypeInfo`] records.
pub struct TypeCollector {
    directive_prefix: String,
    scope: ScopePath,
    types: Vec<TypeInfo>,
}

impl TypeCollector {
    pub fn new(directive_prefix: impl Into<String>) -> Self {
        Self {
            directive_prefix: directive_prefix.into(),
            scope: ScopePath::root(),
            types: Vec::new(),
        }
    }

    /// Collect one unit. May be called repeatedly; records concatenate.
    pub fn collect_unit(&mut self, unit: &SourceUnit) {
        for item in &unit.items {
            if let Decl::Type(decl) = item {
                self.collect_type(decl);
            }
        }
    }

    pub fn finish(self) -> Vec<TypeInfo> {
        self.types
    }

    /// Convenience for collecting a batch of units at once.
    pub fn collect_units(units: &[SourceUnit], directive_prefix: &str) -> Vec<TypeInfo> {
        let mut collector = Self::new(directive_prefix);
        for unit in units {
            collector.collect_unit(unit);
        }
        collector.finish()
    }

    fn collect_type(&mut self, decl: &TypeDecl) {
        let mut info = TypeInfo {
            kind: decl.kind,
            name: decl.name.clone(),
            scope: self.scope.clone(),
            access: decl.access,
            inherited: decl.inherited.clone(),
            generic_params: decl.generic_params.clone(),
            constraints: decl.constraints.clone(),
            methods: Vec::new(),
            properties: Vec::new(),
            subscripts: Vec::new(),
            associated_types: Vec::new(),
            aliases: Vec::new(),
            annotations: decl
                .comment
                .as_deref()
                .map(|comment| parse_annotations(comment, &self.directive_prefix))
                .unwrap_or_default(),
            comment: decl.comment.clone(),
        };

        let mut nested = Vec::new();
        for member in &decl.members {
            match member {
                Member::Method(method) => info.methods.push(method.clone()),
                Member::Property(property) => info.properties.push(property.clone()),
                Member::Subscript(subscript) => info.subscripts.push(subscript.clone()),
                Member::AssociatedType(assoc) => info.associated_types.push(assoc.clone()),
                Member::Alias(alias) => info.aliases.push(alias.clone()),
                Member::Nested(nested_decl) => nested.push(nested_decl),
            }
        }

        self.types.push(info);

        // Nested declarations come after their parent, scoped under it.
        self.scope.push(decl.name.clone());
        for nested_decl in nested {
            self.collect_type(nested_decl);
        }
        self.scope.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umock_syntax::TypeExpr;

    fn unit_with_nested() -> SourceUnit {
        let inner = TypeDecl::new(TypeKind::Interface, "Inner")
            .with_members(vec![Member::Method(Method::new("ping"))]);
        let outer = TypeDecl::new(TypeKind::ValueType, "Outer").with_members(vec![
            Member::Alias(AliasDecl::new("ID", TypeExpr::ident("Int"))),
            Member::Nested(inner),
        ]);
        SourceUnit::new(vec![Decl::Type(outer)])
    }

    #[test]
    fn test_collects_nested_types_in_preorder() {
        let types = TypeCollector::collect_units(&[unit_with_nested()], "mock");
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].name, "Outer");
        assert!(types[0].scope.is_root());
        assert_eq!(types[0].aliases.len(), 1);
        assert_eq!(types[1].name, "Inner");
        assert_eq!(types[1].scope.key(), "Outer");
        assert_eq!(types[1].methods.len(), 1);
        assert_eq!(types[1].inner_scope().key(), "Outer.Inner");
    }

    #[test]
    fn test_parses_annotations_from_comment() {
        let decl = TypeDecl::new(TypeKind::Interface, "Greeter")
            .with_comment("// mock:AutoMockable\n// mock:skip=greet");
        let unit = SourceUnit::new(vec![Decl::Type(decl)]);
        let types = TypeCollector::collect_units(&[unit], "mock");
        assert_eq!(types[0].annotations["skip"], vec!["greet".to_string()]);
    }

    #[test]
    fn test_multiple_units_concatenate_in_order() {
        let first = SourceUnit::new(vec![Decl::Type(TypeDecl::new(TypeKind::Class, "A"))]);
        let second = SourceUnit::new(vec![Decl::Type(TypeDecl::new(TypeKind::Class, "B"))]);
        let types = TypeCollector::collect_units(&[first, second], "mock");
        let names: Vec<&str> = types.iter().map(|info| info.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
