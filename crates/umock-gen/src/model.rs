//! The synthesized mock model.
//!
//! Synthesis produces one [`MockUnit`] per mocked declaration: a structured
//! description of the generated mock that an external emitter renders to
//! source text. The model is fully resolved — every type expression in it is
//! alias-free and `Self`-free — so rendering needs no further lookups.

use serde::{Deserialize, Serialize};
use umock_syntax::decl::AccessLevel;
use umock_syntax::members::{GenericConstraint, GenericParam};
use umock_syntax::types::TypeExpr;

/// Names of runtime-library entities referenced by generated code. The
/// runtime itself is a collaborator; only its surface is known here.
pub mod runtime {
    pub const RECORDER: &str = "Recorder";
    pub const INVOCATION: &str = "Invocation";
    pub const PARAMETER: &str = "Parameter";
    pub const MOCK_METHOD: &str = "MockMethod";
    pub const METHOD_EXPECTATION: &str = "MethodExpectation";
    pub const PROPERTY_EXPECTATION: &str = "PropertyExpectation";
    pub const SUBSCRIPT_EXPECTATION: &str = "SubscriptExpectation";
    pub const RECORD_HELPER: &str = "_record";
    pub const PERFORM_HELPER: &str = "_perform";
    pub const FATAL_FAILURE: &str = "handleFatalFailure";
    pub const AUTO_FORWARDING_FLAG: &str = "autoForwardingEnabled";

    /// Caller-location fields captured by every recording entry point.
    pub const SOURCE_LOCATION_FIELDS: [&str; 4] = ["fileID", "filePath", "line", "column"];
}

/// One piece of a call-description template. Descriptions interpolate the
/// boxed actual arguments at call time for assertion-failure messages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DescPiece {
    Text(String),
    /// The argument at `index`; `String`-typed arguments render quoted.
    Arg { index: usize, quoted: bool },
}

impl DescPiece {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// One entry in the generated stub-identifier table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StubEntry {
    pub identifier: String,
    pub description: Vec<DescPiece>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpectationCategory {
    Method,
    Property,
    Subscript,
}

/// A parameter of an expectation factory, matched through the runtime
/// `Parameter<T>` wrapper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactoryParameter {
    pub label: Option<String>,
    pub name: String,
    /// The matched type `T` of `Parameter<T>`.
    pub matched: TypeExpr,
}

/// One factory operation on an expectation-builder type. Packages the stub
/// identifier with boxed argument matchers, constrained to
/// `Signature == <signature>`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpectationFactory {
    pub category: ExpectationCategory,
    pub name: String,
    pub stub_identifier: String,
    pub parameters: Vec<FactoryParameter>,
    pub signature: TypeExpr,
    pub generic_params: Vec<GenericParam>,
    pub constraints: Vec<GenericConstraint>,
    pub access: AccessLevel,
}

/// An actual argument forwarded into the invocation and the performer call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForwardedArgument {
    pub name: String,
    /// Inout parameters are passed by reference.
    pub by_reference: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ForwardingKind {
    Method { name: String },
    PropertyGetter { name: String },
    PropertySetter { name: String },
    SubscriptGetter,
    SubscriptSetter,
}

/// One forwarding implementation: build the invocation, pop the queued
/// performer, downcast it to `cast_signature`, invoke it threading `await`
/// and `try` only when declared. Overriding members short-circuit to the
/// superclass implementation while auto-forwarding is active.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForwardingMember {
    pub kind: ForwardingKind,
    pub stub_identifier: String,
    pub arguments: Vec<ForwardedArgument>,
    pub cast_signature: TypeExpr,
    pub is_async: bool,
    pub throws: bool,
    pub is_override: bool,
}

/// Default performer attached to an expect-setter's closure parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultPerformer {
    /// The caller must supply a performer.
    None,
    /// A do-nothing closure (void members).
    Empty,
    /// A closure calling through to the superclass implementation.
    ForwardToSuper,
}

impl DefaultPerformer {
    /// Overriding members default to calling through; void members default
    /// to doing nothing; everything else requires an explicit performer.
    pub fn for_member(is_override: bool, is_void: bool) -> Self {
        if is_override {
            Self::ForwardToSuper
        } else if is_void {
            Self::Empty
        } else {
            Self::None
        }
    }
}

/// One `expect(...)` entry point recording an expectation plus performer.
/// Fatal at runtime when invoked while the mock is disabled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpectSetter {
    pub category: ExpectationCategory,
    pub stub_identifier: String,
    /// Generic argument of the expectation parameter type.
    pub expectation_signature: TypeExpr,
    /// Shape of the performer closure the caller supplies. On class mocks
    /// this carries a leading forward-to-super parameter.
    pub perform_signature: TypeExpr,
    pub default_performer: DefaultPerformer,
    pub generic_params: Vec<GenericParam>,
    pub constraints: Vec<GenericConstraint>,
    pub access: AccessLevel,
}

/// A derived abstract member type, emitted as a concrete alias on the mock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AliasMember {
    pub name: String,
    pub target: TypeExpr,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MockKind {
    Interface,
    Class {
        /// Direct superclass, target of auto-forwarding and super calls.
        superclass: Option<String>,
    },
}

/// The synthesized mock for one mocked declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MockUnit {
    /// Generated type name (mocked name plus the configured suffix).
    pub name: String,
    pub mocked_name: String,
    pub kind: MockKind,
    pub access: AccessLevel,
    /// Primary abstract types, one generic parameter each.
    pub generic_params: Vec<GenericParam>,
    /// Derived abstract types, one alias member each.
    pub aliases: Vec<AliasMember>,
    pub stub_entries: Vec<StubEntry>,
    pub factories: Vec<ExpectationFactory>,
    pub forwarding: Vec<ForwardingMember>,
    pub expect_setters: Vec<ExpectSetter>,
    /// Required initializers of the mocked class, marked unavailable on the
    /// mock.
    pub unavailable_initializers: Vec<String>,
    /// Class mocks start disabled (auto-forwarding) during superclass
    /// initialization and become active, irreversibly, at the end of
    /// construction. Interface mocks are always active.
    pub starts_auto_forwarding: bool,
}

impl MockUnit {
    /// `is_enabled` is the negation of the auto-forwarding flag at runtime;
    /// a unit that never auto-forwards is always enabled.
    pub fn always_enabled(&self) -> bool {
        !self.starts_auto_forwarding
    }
}

/// The emitter collaborator: renders synthesized units to source text.
pub trait MockEmitter {
    fn render(&mut self, units: &[MockUnit]) -> String;
}
