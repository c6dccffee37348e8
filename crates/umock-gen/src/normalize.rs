//! Type normalization applied before signatures enter the model.

use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};
use umock_resolve::GenericArgRewriter;
use umock_syntax::types::{TypeExpr, TypeMarker};

/// Keywords that must be backtick-escaped when reused as argument names in
/// generated code.
static ESCAPED_KEYWORDS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    ["internal", "inout", "public", "private", "open", "fileprivate"]
        .into_iter()
        .collect()
});

/// Escape an identifier that collides with a keyword.
pub fn escape_identifier(name: &str) -> String {
    if ESCAPED_KEYWORDS.contains(name) && !name.starts_with('`') {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

/// The closure-position spelling of a declared type: implicitly unwrapped
/// optionals become plain optionals, attributes are stripped, and opaque
/// `some` constraints widen to `any` (an opaque type cannot appear in a
/// stored function value).
pub fn soften(expr: &TypeExpr) -> TypeExpr {
    match expr {
        TypeExpr::ImplicitlyUnwrapped(inner) => TypeExpr::Optional(Box::new(soften(inner))),
        TypeExpr::Optional(inner) => TypeExpr::Optional(Box::new(soften(inner))),
        TypeExpr::Attributed { base, .. } => soften(base),
        TypeExpr::Constrained { marker: _, base } => TypeExpr::Constrained {
            marker: TypeMarker::Any,
            base: Box::new(soften(base)),
        },
        TypeExpr::Identifier { name, generic_args } => TypeExpr::Identifier {
            name: name.clone(),
            generic_args: generic_args.iter().map(soften).collect(),
        },
        TypeExpr::Member { base, name } => TypeExpr::Member {
            base: Box::new(soften(base)),
            name: name.clone(),
        },
        TypeExpr::Array(element) => TypeExpr::Array(Box::new(soften(element))),
        TypeExpr::Dictionary { key, value } => TypeExpr::Dictionary {
            key: Box::new(soften(key)),
            value: Box::new(soften(value)),
        },
        TypeExpr::Function {
            params,
            is_async,
            throws,
            ret,
        } => TypeExpr::Function {
            params: params.iter().map(soften).collect(),
            is_async: *is_async,
            throws: *throws,
            ret: Box::new(soften(ret)),
        },
        TypeExpr::Tuple(elements) => TypeExpr::Tuple(elements.iter().map(soften).collect()),
        TypeExpr::Composition(parts) => {
            TypeExpr::Composition(parts.iter().map(soften).collect())
        }
    }
}

/// Replace bare `Self` references with the mock type name.
pub fn substitute_self(expr: &TypeExpr, mock_name: &str) -> TypeExpr {
    let mut substitutions = FxHashMap::default();
    substitutions.insert("Self".to_string(), TypeExpr::ident(mock_name));
    GenericArgRewriter::new(&substitutions).rewrite(expr)
}

/// Whether a boxed argument of this type renders quoted in call
/// descriptions.
pub fn renders_quoted(expr: &TypeExpr) -> bool {
    matches!(
        expr.unwrap_sugar(),
        TypeExpr::Identifier { name, generic_args } if name == "String" && generic_args.is_empty()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use umock_syntax::parse_type;

    fn softened(text: &str) -> String {
        soften(&parse_type(text).unwrap()).to_string()
    }

    #[test]
    fn test_soften() {
        assert_eq!(softened("String!"), "String?");
        assert_eq!(softened("@escaping () -> Void"), "() -> Void");
        assert_eq!(softened("some Sequence"), "any Sequence");
        assert_eq!(softened("[Int!]"), "[Int?]");
        assert_eq!(softened("(Data!) -> Void"), "(Data?) -> Void");
    }

    #[test]
    fn test_substitute_self() {
        let expr = parse_type("(Self) -> Self?").unwrap();
        assert_eq!(
            substitute_self(&expr, "GreeterMock").to_string(),
            "(GreeterMock) -> GreeterMock?"
        );
    }

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("internal"), "`internal`");
        assert_eq!(escape_identifier("`internal`"), "`internal`");
        assert_eq!(escape_identifier("name"), "name");
    }

    #[test]
    fn test_renders_quoted() {
        assert!(renders_quoted(&parse_type("String").unwrap()));
        assert!(!renders_quoted(&parse_type("String?").unwrap()));
        assert!(!renders_quoted(&parse_type("Int").unwrap()));
    }
}
