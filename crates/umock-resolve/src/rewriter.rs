//! Generic-parameter substitution over type expressions.

use rustc_hash::FxHashMap;
use umock_syntax::types::TypeExpr;

/// Rewrites identifier types by name according to a substitution map.
///
/// Only bare identifiers are replaced wholesale; an identifier carrying its
/// own generic arguments is never a generic-parameter reference, so only its
/// arguments are rewritten.
pub struct GenericArgRewriter<'a> {
    substitutions: &'a FxHashMap<String, TypeExpr>,
}

impl<'a> GenericArgRewriter<'a> {
    pub fn new(substitutions: &'a FxHashMap<String, TypeExpr>) -> Self {
        Self { substitutions }
    }

    pub fn rewrite(&self, expr: &TypeExpr) -> TypeExpr {
        match expr {
            TypeExpr::Identifier { name, generic_args } => {
                if generic_args.is_empty() {
                    if let Some(replacement) = self.substitutions.get(name) {
                        return replacement.clone();
                    }
                    expr.clone()
                } else {
                    TypeExpr::Identifier {
                        name: name.clone(),
                        generic_args: self.rewrite_all(generic_args),
                    }
                }
            }
            TypeExpr::Member { base, name } => TypeExpr::Member {
                base: Box::new(self.rewrite(base)),
                name: name.clone(),
            },
            TypeExpr::Optional(inner) => TypeExpr::Optional(Box::new(self.rewrite(inner))),
            TypeExpr::ImplicitlyUnwrapped(inner) => {
                TypeExpr::ImplicitlyUnwrapped(Box::new(self.rewrite(inner)))
            }
            TypeExpr::Array(element) => TypeExpr::Array(Box::new(self.rewrite(element))),
            TypeExpr::Dictionary { key, value } => TypeExpr::Dictionary {
                key: Box::new(self.rewrite(key)),
                value: Box::new(self.rewrite(value)),
            },
            TypeExpr::Function {
                params,
                is_async,
                throws,
                ret,
            } => TypeExpr::Function {
                params: self.rewrite_all(params),
                is_async: *is_async,
                throws: *throws,
                ret: Box::new(self.rewrite(ret)),
            },
            TypeExpr::Tuple(elements) => TypeExpr::Tuple(self.rewrite_all(elements)),
            TypeExpr::Attributed { attribute, base } => TypeExpr::Attributed {
                attribute: attribute.clone(),
                base: Box::new(self.rewrite(base)),
            },
            TypeExpr::Composition(parts) => TypeExpr::Composition(self.rewrite_all(parts)),
            TypeExpr::Constrained { marker, base } => TypeExpr::Constrained {
                marker: *marker,
                base: Box::new(self.rewrite(base)),
            },
        }
    }

    fn rewrite_all(&self, exprs: &[TypeExpr]) -> Vec<TypeExpr> {
        exprs.iter().map(|expr| self.rewrite(expr)).collect()
    }
}
