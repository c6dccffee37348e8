//! Resolution passes for the umock mock generator.
//!
//! Collection walks parsed source units and produces flat, ordered
//! [`TypeInfo`] records plus a scope-keyed alias table. Resolution then runs
//! over the complete corpus: alias references are rewritten scope-aware and
//! cycle-bounded, associated-type constraints are solved, and annotated
//! declarations are flattened into [`MockedType`] models ready for synthesis.
//!
//! All passes are synchronous and free of shared mutable state: recursive
//! routines thread explicit visited sets through the call stack, so resolver
//! values can be reused across many types within one run.

pub mod scope;
pub use scope::ScopePath;

pub mod collector;
pub use collector::{TypeCollector, TypeId, TypeInfo};

pub mod alias_table;
pub use alias_table::{AliasDefinition, AliasTable};

pub mod rewriter;
pub use rewriter::GenericArgRewriter;

pub mod alias_resolver;
pub use alias_resolver::{AliasResolver, Resolution};

pub mod assoc;
pub use assoc::{AssociatedTypeResolver, ResolvedAssociatedType};

pub mod mocked;
pub use mocked::{MockedType, MockedTypeResolver, ResolvedMocks};
