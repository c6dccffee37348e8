//! Deterministic signature-identifier encoding.
//!
//! Every mockable member gets a stub identifier: a slug of its full signature
//! that names the entry in the generated stub table and doubles at runtime as
//! the key for downcasting the queued performer to the member's exact
//! function shape. Distinct signatures (name, parameter labels and types,
//! effects, return type, constraint clause) must therefore never collide;
//! every structural feature of the signature contributes its own token.

use umock_syntax::members::{GenericConstraint, Method, Parameter, Property, Subscript};
use umock_syntax::types::TypeExpr;

/// Slug of one type expression.
///
/// Shapes without a dedicated token (compositions, real tuples) fall back to
/// their canonical text with non-identifier characters replaced.
pub fn type_slug(expr: &TypeExpr) -> String {
    match expr {
        TypeExpr::Optional(inner) => format!("{}_opt", type_slug(inner)),
        TypeExpr::ImplicitlyUnwrapped(inner) => format!("{}_impopt", type_slug(inner)),
        TypeExpr::Member { base, name } => format!("{}_dot_{name}", type_slug(base)),
        TypeExpr::Array(element) => format!("lsb_{}_rsb", type_slug(element)),
        TypeExpr::Dictionary { key, value } => {
            format!("lsb_{}_col_{}_rsb", type_slug(key), type_slug(value))
        }
        TypeExpr::Attributed { base, .. } => type_slug(base),
        TypeExpr::Tuple(elements) if elements.len() == 1 => type_slug(&elements[0]),
        TypeExpr::Function {
            params,
            is_async,
            throws,
            ret,
        } => {
            let mut parts = vec!["lpar".to_string()];
            parts.extend(params.iter().map(type_slug));
            parts.push("rpar".to_string());
            if *is_async {
                parts.push("async".to_string());
            }
            if *throws {
                parts.push("throws".to_string());
            }
            parts.push("ret".to_string());
            parts.push(type_slug(ret));
            parts.join("_")
        }
        TypeExpr::Identifier { name, generic_args } => {
            let mut slug = name.clone();
            if !generic_args.is_empty() {
                slug.push_str("_lab_");
                slug.push_str(
                    &generic_args
                        .iter()
                        .map(type_slug)
                        .collect::<Vec<_>>()
                        .join("_"),
                );
                slug.push_str("_rab");
            }
            slug
        }
        TypeExpr::Constrained { marker, base } => {
            format!("{}_{}", marker.keyword(), type_slug(base))
        }
        TypeExpr::Tuple(_) | TypeExpr::Composition(_) => sanitize(&expr.to_string()),
    }
}

/// Full method identifier: name, one part per parameter, effect tokens, the
/// return slug, and the constraint clause.
pub fn method_identifier(method: &Method) -> String {
    let mut parts = vec![method.bare_name()];
    for param in &method.params {
        parts.push(parameter_part(param));
    }
    let ret = method.return_type();
    if method.is_async {
        parts.push("async".to_string());
    } else if ret.is_void() {
        // A void plain method would otherwise end in the bare `ret_Void` of
        // every other void plain method with the same parameters.
        parts.push("sync".to_string());
    }
    if method.throws {
        parts.push("throws".to_string());
    }
    parts.push(format!("ret_{}", type_slug(&ret)));
    if let Some(clause) = where_clause_part(&method.constraints) {
        parts.push(clause);
    }
    parts.join("_")
}

pub fn property_getter_identifier(property: &Property) -> String {
    format!("get_{}", property_base(property))
}

pub fn property_setter_identifier(property: &Property) -> String {
    format!("set_{}", property_base(property))
}

fn property_base(property: &Property) -> String {
    let mut parts = vec![property.bare_name()];
    if property.getter_is_async {
        parts.push("async".to_string());
    }
    if property.getter_throws {
        parts.push("throws".to_string());
    }
    parts.push(type_slug(&property.ty));
    parts.join("_")
}

pub fn subscript_getter_identifier(subscript: &Subscript) -> String {
    format!("subscript_get_{}", subscript_base(subscript))
}

pub fn subscript_setter_identifier(subscript: &Subscript) -> String {
    format!("subscript_set_{}", subscript_base(subscript))
}

fn subscript_base(subscript: &Subscript) -> String {
    let mut parts: Vec<String> = subscript.params.iter().map(parameter_part).collect();
    parts.push(type_slug(&subscript.ret));
    parts.join("_")
}

/// One parameter's contribution: the label (`_` when suppressed), the
/// internal name only when it differs from the label, then the type slug.
fn parameter_part(param: &Parameter) -> String {
    let label = param
        .label
        .as_deref()
        .unwrap_or("_")
        .replace('`', "");
    let name = param.name.replace('`', "");
    let slug = type_slug(&param.ty);
    if label == name {
        format!("{label}_{slug}")
    } else {
        format!("{label}_{name}_{slug}")
    }
}

fn where_clause_part(constraints: &[GenericConstraint]) -> Option<String> {
    if constraints.is_empty() {
        return None;
    }
    let parts: Vec<String> = constraints
        .iter()
        .map(|constraint| match constraint {
            GenericConstraint::Conformance { left, right } => {
                format!("{}_con_{}", type_slug(left), type_slug(right))
            }
            GenericConstraint::SameType { left, right } => {
                format!("{}_eq_{}", type_slug(left), type_slug(right))
            }
        })
        .collect();
    Some(format!("where_{}", parts.join("_and_")))
}

fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
