//! Structured type expressions.
//!
//! `TypeExpr` is the shape the alias resolver rewrites and the signature
//! encoder walks. `Display` renders canonical source text, so an expression
//! can always be turned back into the emitter's input form.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `some` / `any` constraint markers on an existential or opaque type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeMarker {
    Some,
    Any,
}

impl TypeMarker {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Some => "some",
            Self::Any => "any",
        }
    }
}

/// A structured type expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeExpr {
    /// `Name` or `Name<A, B>`.
    Identifier {
        name: String,
        generic_args: Vec<TypeExpr>,
    },
    /// `Base.Name`.
    Member { base: Box<TypeExpr>, name: String },
    /// `T?`
    Optional(Box<TypeExpr>),
    /// `T!`
    ImplicitlyUnwrapped(Box<TypeExpr>),
    /// `[T]`
    Array(Box<TypeExpr>),
    /// `[K: V]`
    Dictionary {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `(A, B) async throws -> R`
    Function {
        params: Vec<TypeExpr>,
        is_async: bool,
        throws: bool,
        ret: Box<TypeExpr>,
    },
    /// `(A, B)`. A single-element tuple is kept structurally and unwrapped
    /// transparently by consumers.
    Tuple(Vec<TypeExpr>),
    /// `@attribute T`
    Attributed {
        attribute: String,
        base: Box<TypeExpr>,
    },
    /// `A & B`
    Composition(Vec<TypeExpr>),
    /// `some T` / `any T`
    Constrained {
        marker: TypeMarker,
        base: Box<TypeExpr>,
    },
}

bitflags! {
    /// Shape summary of a resolved type expression.
    ///
    /// `INOUT` is never derived from the expression itself; parameter
    /// positions set it from their declaration.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    pub struct TypeShape: u8 {
        const OPTIONAL = 1 << 0;
        const IMPLICITLY_UNWRAPPED = 1 << 1;
        const FUNCTION = 1 << 2;
        const INOUT = 1 << 3;
    }
}

impl TypeExpr {
    /// A plain identifier type with no generic arguments.
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier {
            name: name.into(),
            generic_args: Vec::new(),
        }
    }

    /// An identifier type with generic arguments.
    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        Self::Identifier {
            name: name.into(),
            generic_args: args,
        }
    }

    /// The `Void` return type.
    pub fn void() -> Self {
        Self::ident("Void")
    }

    pub fn optional(self) -> Self {
        Self::Optional(Box::new(self))
    }

    pub fn function(params: Vec<TypeExpr>, ret: TypeExpr) -> Self {
        Self::Function {
            params,
            is_async: false,
            throws: false,
            ret: Box::new(ret),
        }
    }

    /// `Void`, `()` and their optional-free spellings.
    pub fn is_void(&self) -> bool {
        match self {
            Self::Identifier { name, generic_args } => name == "Void" && generic_args.is_empty(),
            Self::Tuple(elements) => elements.is_empty(),
            Self::Attributed { base, .. } => base.is_void(),
            _ => false,
        }
    }

    pub fn is_function(&self) -> bool {
        match self {
            Self::Function { .. } => true,
            Self::Attributed { base, .. } => base.is_function(),
            Self::Tuple(elements) if elements.len() == 1 => elements[0].is_function(),
            _ => false,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Shape flags for this expression (`INOUT` excluded, see [`TypeShape`]).
    pub fn shape(&self) -> TypeShape {
        let mut shape = TypeShape::empty();
        match self {
            Self::Optional(inner) => {
                shape |= TypeShape::OPTIONAL;
                if inner.is_function() {
                    shape |= TypeShape::FUNCTION;
                }
            }
            Self::ImplicitlyUnwrapped(inner) => {
                shape |= TypeShape::IMPLICITLY_UNWRAPPED;
                if inner.is_function() {
                    shape |= TypeShape::FUNCTION;
                }
            }
            _ => {
                if self.is_function() {
                    shape |= TypeShape::FUNCTION;
                }
            }
        }
        shape
    }

    /// Strip attributes and transparent single-element tuples.
    pub fn unwrap_sugar(&self) -> &TypeExpr {
        match self {
            Self::Attributed { base, .. } => base.unwrap_sugar(),
            Self::Tuple(elements) if elements.len() == 1 => elements[0].unwrap_sugar(),
            _ => self,
        }
    }

    /// The head identifier name, when this is a plain or generic identifier.
    pub fn head_name(&self) -> Option<&str> {
        match self {
            Self::Identifier { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Postfix forms (`?`, `!`) bind tighter than their rendering suggests;
    /// function and composition types need parentheses under them.
    fn needs_parens_for_suffix(&self) -> bool {
        matches!(
            self,
            Self::Function { .. } | Self::Composition(_) | Self::Constrained { .. }
        )
    }
}

fn write_suffixed(f: &mut fmt::Formatter<'_>, inner: &TypeExpr, suffix: char) -> fmt::Result {
    if inner.needs_parens_for_suffix() {
        write!(f, "({inner}){suffix}")
    } else {
        write!(f, "{inner}{suffix}")
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeExpr], separator: &str) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier { name, generic_args } => {
                f.write_str(name)?;
                if !generic_args.is_empty() {
                    f.write_str("<")?;
                    write_list(f, generic_args, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Member { base, name } => write!(f, "{base}.{name}"),
            Self::Optional(inner) => write_suffixed(f, inner, '?'),
            Self::ImplicitlyUnwrapped(inner) => write_suffixed(f, inner, '!'),
            Self::Array(element) => write!(f, "[{element}]"),
            Self::Dictionary { key, value } => write!(f, "[{key}: {value}]"),
            Self::Function {
                params,
                is_async,
                throws,
                ret,
            } => {
                f.write_str("(")?;
                write_list(f, params, ", ")?;
                f.write_str(")")?;
                if *is_async {
                    f.write_str(" async")?;
                }
                if *throws {
                    f.write_str(" throws")?;
                }
                write!(f, " -> {ret}")
            }
            Self::Tuple(elements) => {
                f.write_str("(")?;
                write_list(f, elements, ", ")?;
                f.write_str(")")
            }
            Self::Attributed { attribute, base } => write!(f, "@{attribute} {base}"),
            Self::Composition(parts) => write_list(f, parts, " & "),
            Self::Constrained { marker, base } => write!(f, "{} {base}", marker.keyword()),
        }
    }
}
