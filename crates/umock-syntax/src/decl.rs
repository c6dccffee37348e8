//! Top-level declaration tree.
//!
//! A [`SourceUnit`] is what the parser collaborator hands over for one input
//! file: an ordered list of declarations, each retaining its leading comment
//! so marker annotations survive into resolution.

use crate::members::{AliasDecl, GenericConstraint, GenericParam, Member};
use serde::{Deserialize, Serialize};

/// One parsed input file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub items: Vec<Decl>,
}

impl SourceUnit {
    pub fn new(items: Vec<Decl>) -> Self {
        Self { items }
    }
}

/// A top-level (or nested) declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Type(TypeDecl),
    Alias(AliasDecl),
}

/// Declaration kind. Extensions keep the kind of nothing: they attach to a
/// base declaration by name and never change its declared kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Interface,
    Class,
    ValueType,
    Enum,
    Extension,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccessLevel {
    Private,
    FilePrivate,
    #[default]
    Internal,
    Public,
    Open,
}

impl AccessLevel {
    /// Access level used on synthesized members: `open` collapses to
    /// `public`, everything else carries through.
    pub fn for_implementation(self) -> Self {
        match self {
            Self::Open => Self::Public,
            other => other,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::FilePrivate => "fileprivate",
            Self::Internal => "internal",
            Self::Public => "public",
            Self::Open => "open",
        }
    }
}

/// A declared type, value type, enum, interface or extension, with its raw
/// members and trivia.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    pub access: AccessLevel,
    /// Names of inherited interfaces / the superclass, in declaration order.
    pub inherited: Vec<String>,
    pub generic_params: Vec<GenericParam>,
    /// Constraint clause attached to the declaration itself.
    pub constraints: Vec<GenericConstraint>,
    pub members: Vec<Member>,
    /// Leading comment, annotations included, exactly as written.
    pub comment: Option<String>,
}

impl TypeDecl {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            access: AccessLevel::default(),
            inherited: Vec::new(),
            generic_params: Vec::new(),
            constraints: Vec::new(),
            members: Vec::new(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_inherited(mut self, inherited: Vec<String>) -> Self {
        self.inherited = inherited;
        self
    }

    pub fn with_members(mut self, members: Vec<Member>) -> Self {
        self.members = members;
        self
    }

    pub fn is_extension(&self) -> bool {
        self.kind == TypeKind::Extension
    }
}
