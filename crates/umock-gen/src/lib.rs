//! Mock synthesis for the umock generator.
//!
//! This crate turns resolved [`MockedType`](umock_resolve::MockedType) values
//! into [`MockUnit`] models: deterministic stub-identifier tables,
//! expectation-builder factories, forwarding implementations and
//! expect-setters, exactly as an external emitter needs to render them.
//!
//! The identifier encoding in [`stub_id`] is the load-bearing piece: a stub
//! identifier keys the runtime downcast of a boxed performer, so it must be
//! collision-free over every distinct signature.

pub mod stub_id;

pub mod model;
pub use model::{
    AliasMember, DefaultPerformer, DescPiece, ExpectSetter, ExpectationCategory,
    ExpectationFactory, FactoryParameter, ForwardedArgument, ForwardingKind, ForwardingMember,
    MockEmitter, MockKind, MockUnit, StubEntry,
};

pub mod normalize;

pub mod method;
pub use method::MethodMock;

pub mod property;
pub use property::PropertyMock;

pub mod subscript;
pub use subscript::SubscriptMock;

pub mod mock_builder;
pub use mock_builder::MockBuilder;
