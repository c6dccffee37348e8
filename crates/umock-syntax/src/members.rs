//! Member declarations: methods, properties, indexed accessors, abstract
//! member types and alias definitions.

use crate::decl::{AccessLevel, TypeDecl};
use crate::types::{TypeExpr, TypeShape};
use serde::{Deserialize, Serialize};

/// A member of a type declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Member {
    Method(Method),
    Property(Property),
    Subscript(Subscript),
    AssociatedType(AssociatedTypeDecl),
    Alias(AliasDecl),
    Nested(TypeDecl),
}

/// A generic parameter with inline conformance requirements
/// (`T: Hashable & Codable` keeps both parts).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenericParam {
    pub name: String,
    pub conformances: Vec<TypeExpr>,
}

impl GenericParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conformances: Vec::new(),
        }
    }
}

/// One requirement from a constraint clause.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GenericConstraint {
    /// `Left: Right`
    Conformance { left: TypeExpr, right: TypeExpr },
    /// `Left == Right`
    SameType { left: TypeExpr, right: TypeExpr },
}

/// A function parameter.
///
/// `label` is the external argument label; `None` models an explicitly
/// suppressed label (`_`). Closure/optional shape is derived from the type
/// rather than stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub label: Option<String>,
    pub name: String,
    pub ty: TypeExpr,
    pub is_inout: bool,
}

impl Parameter {
    /// A parameter whose label and internal name coincide, the common case.
    pub fn named(name: impl Into<String>, ty: TypeExpr) -> Self {
        let name = name.into();
        Self {
            label: Some(name.clone()),
            name,
            ty,
            is_inout: false,
        }
    }

    /// A parameter with a suppressed label (`_ name: Type`).
    pub fn unlabeled(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            label: None,
            name: name.into(),
            ty,
            is_inout: false,
        }
    }

    pub fn inout(mut self) -> Self {
        self.is_inout = true;
        self
    }

    pub fn is_closure(&self) -> bool {
        self.ty.is_function()
    }

    pub fn is_optional(&self) -> bool {
        self.ty.is_optional()
    }

    /// Shape of the parameter type, with `INOUT` folded in.
    pub fn shape(&self) -> TypeShape {
        let mut shape = self.ty.shape();
        if self.is_inout {
            shape |= TypeShape::INOUT;
        }
        shape
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub params: Vec<Parameter>,
    /// `None` is `Void`.
    pub ret: Option<TypeExpr>,
    pub is_async: bool,
    pub throws: bool,
    pub is_static: bool,
    /// `class func` on class declarations.
    pub is_class_member: bool,
    pub is_initializer: bool,
    pub is_required: bool,
    pub generic_params: Vec<GenericParam>,
    pub constraints: Vec<GenericConstraint>,
    pub access: AccessLevel,
    pub attributes: Vec<String>,
    /// Set during extension merging; extension members are never mocked.
    pub declared_in_extension: bool,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            ret: None,
            is_async: false,
            throws: false,
            is_static: false,
            is_class_member: false,
            is_initializer: false,
            is_required: false,
            generic_params: Vec::new(),
            constraints: Vec::new(),
            access: AccessLevel::default(),
            attributes: Vec::new(),
            declared_in_extension: false,
        }
    }

    pub fn with_params(mut self, params: Vec<Parameter>) -> Self {
        self.params = params;
        self
    }

    pub fn returning(mut self, ret: TypeExpr) -> Self {
        self.ret = Some(ret);
        self
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn throwing(mut self) -> Self {
        self.throws = true;
        self
    }

    /// Method name with escaping backticks stripped.
    pub fn bare_name(&self) -> String {
        self.name.replace('`', "")
    }

    /// The return type, with `None` normalized to `Void`.
    pub fn return_type(&self) -> TypeExpr {
        self.ret.clone().unwrap_or_else(TypeExpr::void)
    }

    /// The function type of this member as seen by a caller: parameter types
    /// in order, effects, return type. Labels do not participate.
    pub fn function_type(&self) -> TypeExpr {
        TypeExpr::Function {
            params: self.params.iter().map(|param| param.ty.clone()).collect(),
            is_async: self.is_async,
            throws: self.throws,
            ret: Box::new(self.return_type()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub ty: TypeExpr,
    pub is_constant: bool,
    /// Whether the declaration carries a setter requirement.
    pub is_writable: bool,
    pub getter_is_async: bool,
    pub getter_throws: bool,
    pub is_static: bool,
    pub access: AccessLevel,
    /// Setter access when narrower than the getter's.
    pub setter_access: Option<AccessLevel>,
    pub declared_in_extension: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            is_constant: false,
            is_writable: false,
            getter_is_async: false,
            getter_throws: false,
            is_static: false,
            access: AccessLevel::default(),
            setter_access: None,
            declared_in_extension: false,
        }
    }

    pub fn writable(mut self) -> Self {
        self.is_writable = true;
        self
    }

    pub fn bare_name(&self) -> String {
        self.name.replace('`', "")
    }

    /// `() -> T` (plus getter effects) — the downcast shape of a getter
    /// performer.
    pub fn getter_function_type(&self) -> TypeExpr {
        TypeExpr::Function {
            params: vec![],
            is_async: self.getter_is_async,
            throws: self.getter_throws,
            ret: Box::new(self.ty.clone()),
        }
    }

    /// `(T) -> Void` — the downcast shape of a setter performer.
    pub fn setter_function_type(&self) -> TypeExpr {
        TypeExpr::function(vec![self.ty.clone()], TypeExpr::void())
    }
}

/// An indexed accessor requirement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subscript {
    pub params: Vec<Parameter>,
    pub ret: TypeExpr,
    pub is_writable: bool,
    pub access: AccessLevel,
    pub declared_in_extension: bool,
}

impl Subscript {
    pub fn new(params: Vec<Parameter>, ret: TypeExpr) -> Self {
        Self {
            params,
            ret,
            is_writable: false,
            access: AccessLevel::default(),
            declared_in_extension: false,
        }
    }

    pub fn writable(mut self) -> Self {
        self.is_writable = true;
        self
    }

    /// `(Index...) -> T` — the downcast shape of a getter performer.
    pub fn getter_function_type(&self) -> TypeExpr {
        TypeExpr::function(
            self.params.iter().map(|param| param.ty.clone()).collect(),
            self.ret.clone(),
        )
    }

    /// `(Index..., T) -> Void` — the downcast shape of a setter performer.
    pub fn setter_function_type(&self) -> TypeExpr {
        let mut params: Vec<TypeExpr> = self.params.iter().map(|param| param.ty.clone()).collect();
        params.push(self.ret.clone());
        TypeExpr::function(params, TypeExpr::void())
    }
}

/// An abstract member type declared inside an interface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssociatedTypeDecl {
    pub name: String,
    /// Inline conformance list (`associatedtype T: Hashable`).
    pub conformances: Vec<TypeExpr>,
    /// Constraint clause attached to the abstract type itself.
    pub constraints: Vec<GenericConstraint>,
}

impl AssociatedTypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conformances: Vec::new(),
            constraints: Vec::new(),
        }
    }
}

/// An alias definition (`typealias Name<P...> = Target`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AliasDecl {
    pub name: String,
    pub generic_params: Vec<String>,
    pub target: TypeExpr,
}

impl AliasDecl {
    pub fn new(name: impl Into<String>, target: TypeExpr) -> Self {
        Self {
            name: name.into(),
            generic_params: Vec::new(),
            target,
        }
    }

    pub fn with_generic_params(mut self, params: Vec<String>) -> Self {
        self.generic_params = params;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_function_type() {
        let method = Method::new("fetch")
            .with_params(vec![Parameter::named("id", TypeExpr::ident("Int"))])
            .returning(TypeExpr::ident("String"))
            .asynchronous()
            .throwing();
        assert_eq!(
            method.function_type().to_string(),
            "(Int) async throws -> String"
        );
    }

    #[test]
    fn test_method_void_return() {
        let method = Method::new("reset");
        assert_eq!(method.function_type().to_string(), "() -> Void");
    }

    #[test]
    fn test_parameter_shape() {
        let param = Parameter::named(
            "completion",
            TypeExpr::function(vec![], TypeExpr::void()).optional(),
        );
        assert!(param.is_closure() || param.is_optional());
        assert!(param.shape().contains(TypeShape::OPTIONAL));

        let buffer = Parameter::named("buffer", TypeExpr::Array(Box::new(TypeExpr::ident("UInt8"))))
            .inout();
        assert!(buffer.shape().contains(TypeShape::INOUT));
    }

    #[test]
    fn test_subscript_function_types() {
        let sub = Subscript::new(
            vec![Parameter::unlabeled("index", TypeExpr::ident("Int"))],
            TypeExpr::ident("String"),
        )
        .writable();
        assert_eq!(sub.getter_function_type().to_string(), "(Int) -> String");
        assert_eq!(
            sub.setter_function_type().to_string(),
            "(Int, String) -> Void"
        );
    }

    #[test]
    fn test_property_function_types() {
        let mut prop = Property::new("title", TypeExpr::ident("String")).writable();
        prop.getter_is_async = true;
        assert_eq!(prop.getter_function_type().to_string(), "() async -> String");
        assert_eq!(prop.setter_function_type().to_string(), "(String) -> Void");
    }
}
