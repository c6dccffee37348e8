//! Declaration tree and type expression model for the umock mock generator.
//!
//! This crate is the boundary to the front-end parser collaborator: it defines
//! the declaration tree the rest of the pipeline consumes (`SourceUnit`,
//! `TypeDecl`, members) and the structured type expression (`TypeExpr`) the
//! resolvers and the signature encoder operate on. It performs no file I/O
//! and no full-source parsing; only type *expressions* can be parsed from
//! text, because alias targets and test fixtures arrive that way.

pub mod types;
pub use types::{TypeExpr, TypeMarker, TypeShape};

pub mod type_parser;
pub use type_parser::{TypeParseError, parse_type};

pub mod decl;
pub use decl::{AccessLevel, Decl, SourceUnit, TypeDecl, TypeKind};

pub mod members;
pub use members::{
    AliasDecl, AssociatedTypeDecl, GenericConstraint, GenericParam, Member, Method, Parameter,
    Property, Subscript,
};

pub mod annotations;
pub use annotations::{AnnotationMap, has_marker, parse_annotations};
