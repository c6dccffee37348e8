//! The end-to-end generation pipeline.
//!
//! collect → build alias table → select and flatten mocked types → resolve
//! aliases inside each selected declaration → synthesize. Collection is
//! per-unit independent and runs in parallel; everything after it needs the
//! complete corpus and runs as one sequential pass. The first fatal error
//! aborts the run with no partial output.

use crate::config::GeneratorConfig;
use anyhow::Context;
use rayon::prelude::*;
use tracing::debug;
use umock_common::diagnostics::{Diagnostic, GenResult};
use umock_gen::{MockBuilder, MockUnit};
use umock_resolve::alias_resolver::AliasResolver;
use umock_resolve::alias_table::AliasTable;
use umock_resolve::collector::{TypeCollector, TypeInfo};
use umock_resolve::mocked::{MockedType, MockedTypeResolver};
use umock_syntax::decl::SourceUnit;

/// Output of one run: the synthesized units plus non-fatal observations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Generated {
    pub mocks: Vec<MockUnit>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline, attaching context to a fatal failure.
    pub fn generate(&self, units: &[SourceUnit]) -> anyhow::Result<Generated> {
        self.try_generate(units)
            .with_context(|| format!("mock generation failed over {} unit(s)", units.len()))
    }

    pub fn try_generate(&self, units: &[SourceUnit]) -> GenResult<Generated> {
        // Units are independent during collection; records concatenate in
        // input order, which fixes every later dense index.
        let collected: Vec<TypeInfo> = units
            .par_iter()
            .map(|unit| {
                TypeCollector::collect_units(
                    std::slice::from_ref(unit),
                    &self.config.directive_prefix,
                )
            })
            .flatten()
            .collect();
        debug!(types = collected.len(), "collection finished");

        let table = AliasTable::build(units);
        let alias_resolver = AliasResolver::new(&table);
        let collected: Vec<TypeInfo> = collected
            .iter()
            .map(|info| alias_resolver.resolve_type_info(info))
            .collect();

        let resolver =
            MockedTypeResolver::new(collected, &table, self.config.marker_keys.clone());
        let resolved = resolver.resolve()?;

        let builder = MockBuilder::new(&self.config.mock_suffix);
        let mocks: Vec<MockUnit> = resolved
            .mocks
            .iter()
            .map(|mocked: &MockedType| builder.build(mocked))
            .collect::<GenResult<_>>()?;
        debug!(mocks = mocks.len(), "synthesis finished");

        Ok(Generated {
            mocks,
            diagnostics: resolved.diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umock_syntax::decl::{Decl, TypeDecl, TypeKind};
    use umock_syntax::members::{Member, Method};

    #[test]
    fn test_empty_corpus_generates_nothing() {
        let generated = Generator::new(GeneratorConfig::default())
            .try_generate(&[])
            .unwrap();
        assert!(generated.mocks.is_empty());
        assert!(generated.diagnostics.is_empty());
    }

    #[test]
    fn test_units_concatenate_in_input_order() {
        let first = SourceUnit::new(vec![Decl::Type(
            TypeDecl::new(TypeKind::Interface, "First")
                .with_comment("// mock:AutoMockable")
                .with_members(vec![Member::Method(Method::new("a"))]),
        )]);
        let second = SourceUnit::new(vec![Decl::Type(
            TypeDecl::new(TypeKind::Interface, "Second")
                .with_comment("// mock:AutoMockable")
                .with_members(vec![Member::Method(Method::new("b"))]),
        )]);
        let generated = Generator::new(GeneratorConfig::default())
            .try_generate(&[first, second])
            .unwrap();
        let names: Vec<&str> = generated
            .mocks
            .iter()
            .map(|unit| unit.name.as_str())
            .collect();
        assert_eq!(names, vec!["FirstMock", "SecondMock"]);
    }
}
