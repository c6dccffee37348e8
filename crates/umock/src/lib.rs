//! umock — deterministic mock generation.
//!
//! Feed parsed [`SourceUnit`] declaration trees to a [`Generator`] and get
//! back synthesized [`MockUnit`] models, ready for an emitter to render:
//!
//! ```
//! use umock::{Generator, GeneratorConfig};
//! use umock_syntax::decl::{Decl, SourceUnit, TypeDecl, TypeKind};
//!
//! let greeter = TypeDecl::new(TypeKind::Interface, "Greeter")
//!     .with_comment("// mock:AutoMockable");
//! let units = [SourceUnit::new(vec![Decl::Type(greeter)])];
//!
//! let generated = Generator::new(GeneratorConfig::default())
//!     .generate(&units)
//!     .unwrap();
//! assert_eq!(generated.mocks[0].name, "GreeterMock");
//! ```

pub mod config;
pub use config::GeneratorConfig;

pub mod pipeline;
pub use pipeline::{Generated, Generator};

pub use umock_common::diagnostics::{Diagnostic, DiagnosticCategory, GenError, GenResult};
pub use umock_common::logging::init_tracing;
pub use umock_gen::{MockEmitter, MockKind, MockUnit};
pub use umock_resolve::mocked::MockedType;
pub use umock_syntax::decl::SourceUnit;
