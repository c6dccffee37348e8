//! Scope-aware, cycle-bounded alias resolution.
//!
//! Resolution walks a type expression and replaces every alias reference
//! found in the enclosing-scope chain. A hit with `k` declared generic
//! parameters must be applied to exactly `k` arguments, which are substituted
//! into the alias target; a mismatch leaves the reference unresolved rather
//! than half-substituting the downcast key. The rewrite runs as a fix-point
//! loop bounded by [`limits::MAX_ALIAS_PASSES`], which terminates alias-of-
//! alias chains and survives self- or mutually-referential definitions with a
//! best-effort result.

use crate::alias_table::AliasTable;
use crate::collector::TypeInfo;
use crate::rewriter::GenericArgRewriter;
use crate::scope::ScopePath;
use rustc_hash::FxHashMap;
use tracing::debug;
use umock_common::limits;
use umock_syntax::members::GenericConstraint;
use umock_syntax::types::{TypeExpr, TypeShape};

/// A resolved type expression plus its shape summary.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub expr: TypeExpr,
    pub shape: TypeShape,
}

pub struct AliasResolver<'a> {
    table: &'a AliasTable,
}

impl<'a> AliasResolver<'a> {
    pub fn new(table: &'a AliasTable) -> Self {
        Self { table }
    }

    /// Resolve every alias reference reachable in `expr` from `scope`.
    pub fn resolve(&self, expr: &TypeExpr, scope: &ScopePath) -> Resolution {
        let mut current = expr.clone();

        if self.table.has_aliases_in_chain(scope) {
            for pass in 0..limits::MAX_ALIAS_PASSES {
                let mut changed = false;
                current = self.rewrite(&current, scope, &mut changed);
                if !changed {
                    break;
                }
                if pass + 1 == limits::MAX_ALIAS_PASSES {
                    debug!(expr = %current, "alias resolution stopped at pass bound");
                }
            }
        }

        Resolution {
            shape: current.shape(),
            expr: current,
        }
    }

    /// Rewrite a collected declaration so that every member type is alias-
    /// free. Lookup scope is the inside of the declaration, where its own
    /// alias members are visible.
    pub fn resolve_type_info(&self, info: &TypeInfo) -> TypeInfo {
        let scope = info.inner_scope();
        if !self.table.has_aliases_in_chain(&scope) {
            return info.clone();
        }

        let mut resolved = info.clone();
        for method in &mut resolved.methods {
            for param in &mut method.params {
                param.ty = self.resolve(&param.ty, &scope).expr;
            }
            if let Some(ret) = &method.ret {
                method.ret = Some(self.resolve(ret, &scope).expr);
            }
            self.resolve_constraints(&mut method.constraints, &scope);
        }
        for property in &mut resolved.properties {
            property.ty = self.resolve(&property.ty, &scope).expr;
        }
        for subscript in &mut resolved.subscripts {
            for param in &mut subscript.params {
                param.ty = self.resolve(&param.ty, &scope).expr;
            }
            subscript.ret = self.resolve(&subscript.ret, &scope).expr;
        }
        for assoc in &mut resolved.associated_types {
            for conformance in &mut assoc.conformances {
                *conformance = self.resolve(conformance, &scope).expr;
            }
            self.resolve_constraints(&mut assoc.constraints, &scope);
        }
        self.resolve_constraints(&mut resolved.constraints, &scope);
        resolved
    }

    fn resolve_constraints(&self, constraints: &mut [GenericConstraint], scope: &ScopePath) {
        for constraint in constraints {
            match constraint {
                GenericConstraint::Conformance { left, right }
                | GenericConstraint::SameType { left, right } => {
                    *left = self.resolve(left, scope).expr;
                    *right = self.resolve(right, scope).expr;
                }
            }
        }
    }

    /// One rewrite pass. `changed` is set when any reference was expanded.
    fn rewrite(&self, expr: &TypeExpr, scope: &ScopePath, changed: &mut bool) -> TypeExpr {
        match expr {
            TypeExpr::Identifier { name, generic_args } => {
                let args: Vec<TypeExpr> = generic_args
                    .iter()
                    .map(|arg| self.rewrite(arg, scope, changed))
                    .collect();
                self.apply_alias(name, args, scope, changed)
            }
            TypeExpr::Member { base, name } => TypeExpr::Member {
                base: Box::new(self.rewrite(base, scope, changed)),
                name: name.clone(),
            },
            TypeExpr::Optional(inner) => {
                TypeExpr::Optional(Box::new(self.rewrite(inner, scope, changed)))
            }
            TypeExpr::ImplicitlyUnwrapped(inner) => {
                TypeExpr::ImplicitlyUnwrapped(Box::new(self.rewrite(inner, scope, changed)))
            }
            TypeExpr::Array(element) => {
                TypeExpr::Array(Box::new(self.rewrite(element, scope, changed)))
            }
            TypeExpr::Dictionary { key, value } => TypeExpr::Dictionary {
                key: Box::new(self.rewrite(key, scope, changed)),
                value: Box::new(self.rewrite(value, scope, changed)),
            },
            TypeExpr::Function {
                params,
                is_async,
                throws,
                ret,
            } => TypeExpr::Function {
                params: params
                    .iter()
                    .map(|param| self.rewrite(param, scope, changed))
                    .collect(),
                is_async: *is_async,
                throws: *throws,
                ret: Box::new(self.rewrite(ret, scope, changed)),
            },
            TypeExpr::Tuple(elements) => TypeExpr::Tuple(
                elements
                    .iter()
                    .map(|element| self.rewrite(element, scope, changed))
                    .collect(),
            ),
            TypeExpr::Attributed { attribute, base } => TypeExpr::Attributed {
                attribute: attribute.clone(),
                base: Box::new(self.rewrite(base, scope, changed)),
            },
            TypeExpr::Composition(parts) => TypeExpr::Composition(
                parts
                    .iter()
                    .map(|part| self.rewrite(part, scope, changed))
                    .collect(),
            ),
            TypeExpr::Constrained { marker, base } => TypeExpr::Constrained {
                marker: *marker,
                base: Box::new(self.rewrite(base, scope, changed)),
            },
        }
    }

    fn apply_alias(
        &self,
        name: &str,
        args: Vec<TypeExpr>,
        scope: &ScopePath,
        changed: &mut bool,
    ) -> TypeExpr {
        let Some(definition) = self.table.lookup_in_chain(name, scope) else {
            return TypeExpr::Identifier {
                name: name.to_string(),
                generic_args: args,
            };
        };

        if !definition.generic_params.is_empty() {
            if args.len() != definition.generic_params.len() {
                debug!(
                    alias = name,
                    expected = definition.generic_params.len(),
                    found = args.len(),
                    "generic alias applied with wrong arity; left unresolved"
                );
                return TypeExpr::Identifier {
                    name: name.to_string(),
                    generic_args: args,
                };
            }
            let substitutions: FxHashMap<String, TypeExpr> = definition
                .generic_params
                .iter()
                .cloned()
                .zip(args)
                .collect();
            *changed = true;
            return GenericArgRewriter::new(&substitutions).rewrite(&definition.target);
        }

        if !args.is_empty() {
            // A non-generic alias applied to arguments: re-attach the
            // argument clause to the target head when the target is a bare
            // identifier, otherwise leave the reference unresolved.
            if let TypeExpr::Identifier {
                name: target_name,
                generic_args: target_args,
            } = &definition.target
            {
                if target_args.is_empty() {
                    *changed = true;
                    return TypeExpr::Identifier {
                        name: target_name.clone(),
                        generic_args: args,
                    };
                }
            }
            return TypeExpr::Identifier {
                name: name.to_string(),
                generic_args: args,
            };
        }

        *changed = true;
        definition.target.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias_table::AliasTable;
    use umock_syntax::decl::{Decl, SourceUnit, TypeDecl, TypeKind};
    use umock_syntax::members::{AliasDecl, Member};
    use umock_syntax::parse_type;

    fn table() -> AliasTable {
        let store = TypeDecl::new(TypeKind::ValueType, "Store").with_members(vec![
            Member::Alias(AliasDecl::new("ID", parse_type("String").unwrap())),
            Member::Alias(
                AliasDecl::new("Pair", parse_type("[K: V]").unwrap())
                    .with_generic_params(vec!["K".to_string(), "V".to_string()]),
            ),
        ]);
        AliasTable::build(&[SourceUnit::new(vec![
            Decl::Alias(AliasDecl::new("ID", parse_type("Int").unwrap())),
            Decl::Alias(AliasDecl::new("IDs", parse_type("[ID]").unwrap())),
            Decl::Alias(AliasDecl::new("Loop", parse_type("Loop?").unwrap())),
            Decl::Type(store),
        ])])
    }

    fn resolve_at(expr: &str, scope_key: &str) -> String {
        let table = table();
        let resolver = AliasResolver::new(&table);
        resolver
            .resolve(&parse_type(expr).unwrap(), &ScopePath::from_key(scope_key))
            .expr
            .to_string()
    }

    #[test]
    fn test_global_alias_resolves_anywhere() {
        assert_eq!(resolve_at("ID", ""), "Int");
        // Deep scope without its own table still falls back to global.
        assert_eq!(resolve_at("ID", "A.B.C.D"), "Int");
    }

    #[test]
    fn test_inner_scope_shadows_global() {
        assert_eq!(resolve_at("ID", "Store"), "String");
        assert_eq!(resolve_at("ID", "Store.Nested"), "String");
    }

    #[test]
    fn test_alias_of_alias_chain() {
        // IDs = [ID], ID = Int: two passes.
        assert_eq!(resolve_at("IDs", ""), "[Int]");
        assert_eq!(resolve_at("[String: IDs]?", ""), "[String: [Int]]?");
    }

    #[test]
    fn test_generic_alias_substitution() {
        assert_eq!(resolve_at("Pair<ID, Bool>", "Store"), "[String: Bool]");
    }

    #[test]
    fn test_generic_alias_arity_mismatch_left_unresolved() {
        assert_eq!(resolve_at("Pair<Int>", "Store"), "Pair<Int>");
    }

    #[test]
    fn test_cyclic_alias_terminates() {
        // Loop = Loop? rewrites forever; the pass bound cuts it off.
        let resolved = resolve_at("Loop", "");
        assert_eq!(resolved.matches('?').count(), limits::MAX_ALIAS_PASSES);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let table = table();
        let resolver = AliasResolver::new(&table);
        let scope = ScopePath::from_key("Store");
        let once = resolver.resolve(&parse_type("Pair<ID, IDs>").unwrap(), &scope);
        let twice = resolver.resolve(&once.expr, &scope);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_shape_flags_from_resolution() {
        let table = AliasTable::build(&[SourceUnit::new(vec![Decl::Alias(AliasDecl::new(
            "Callback",
            parse_type("(() -> Void)?").unwrap(),
        ))])]);
        let resolver = AliasResolver::new(&table);
        let resolution = resolver.resolve(&parse_type("Callback").unwrap(), &ScopePath::root());
        assert!(resolution.shape.contains(TypeShape::OPTIONAL));
        assert!(resolution.shape.contains(TypeShape::FUNCTION));
    }
}
