//! Mock assembly.
//!
//! Takes one resolved [`MockedType`] and produces its [`MockUnit`]: abstract
//! member types are partitioned into generic parameters and aliases, members
//! from the whole inheritance family are admitted and deduplicated, and the
//! per-member builders contribute their fragments in a fixed order. Every
//! fragment is a pure value, so assembly order never changes content, only
//! the (deterministic) sequence of the output vectors.

use crate::method::MethodMock;
use crate::model::{
    AliasMember, ExpectSetter, ExpectationFactory, ForwardingMember, MockKind, MockUnit, StubEntry,
};
use crate::property::PropertyMock;
use crate::subscript::SubscriptMock;
use rustc_hash::FxHashSet;
use tracing::debug;
use umock_common::diagnostics::{GenError, GenResult};
use umock_resolve::assoc::AssociatedTypeResolver;
use umock_resolve::collector::TypeInfo;
use umock_resolve::mocked::MockedType;
use umock_syntax::decl::AccessLevel;
use umock_syntax::members::GenericParam;

/// Annotation key listing member names excluded from synthesis.
const SKIP_KEY: &str = "skip";

pub struct MockBuilder {
    suffix: String,
}

/// Fragment accumulator threaded through member admission.
#[derive(Default)]
struct Fragments {
    stub_entries: Vec<StubEntry>,
    factories: Vec<ExpectationFactory>,
    forwarding: Vec<ForwardingMember>,
    expect_setters: Vec<ExpectSetter>,
    unavailable_initializers: Vec<String>,
    seen_identifiers: FxHashSet<String>,
    seen_factory_keys: FxHashSet<(String, String)>,
    seen_raw_signatures: FxHashSet<(&'static str, String)>,
}

impl MockBuilder {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn build(&self, mocked: &MockedType) -> GenResult<MockUnit> {
        let declaration = mocked.declaration();
        let mock_name = format!("{}{}", declaration.name, self.suffix);
        let family = mocked.family();

        let solved = AssociatedTypeResolver::solve(&family);
        let generic_params: Vec<GenericParam> = solved
            .primary()
            .map(|assoc| GenericParam {
                name: assoc.name.clone(),
                conformances: assoc.conformances.clone(),
            })
            .collect();
        let aliases: Vec<AliasMember> = solved
            .derived()
            .filter_map(|assoc| {
                assoc.equivalent.clone().map(|target| AliasMember {
                    name: assoc.name.clone(),
                    target,
                })
            })
            .collect();

        let skip: FxHashSet<&str> = declaration
            .annotations
            .get(SKIP_KEY)
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default();

        let mut fragments = Fragments::default();
        match mocked {
            MockedType::Interface {
                declaration,
                inherited,
            } => {
                for info in std::iter::once(declaration).chain(inherited.iter()) {
                    self.admit_members(info, &mock_name, false, false, &skip, &mut fragments)?;
                }
            }
            MockedType::Class {
                declaration,
                superclasses,
                interfaces,
            } => {
                for info in std::iter::once(declaration).chain(superclasses.iter()) {
                    self.admit_members(info, &mock_name, true, true, &skip, &mut fragments)?;
                }
                for info in interfaces {
                    self.admit_members(info, &mock_name, false, true, &skip, &mut fragments)?;
                }
            }
        }

        let kind = match mocked {
            MockedType::Interface { .. } => MockKind::Interface,
            MockedType::Class { superclasses, .. } => MockKind::Class {
                superclass: superclasses.first().map(|info| info.name.clone()),
            },
        };

        Ok(MockUnit {
            name: mock_name,
            mocked_name: declaration.name.clone(),
            access: declaration.access.for_implementation(),
            generic_params,
            aliases,
            stub_entries: fragments.stub_entries,
            factories: fragments.factories,
            forwarding: fragments.forwarding,
            expect_setters: fragments.expect_setters,
            unavailable_initializers: fragments.unavailable_initializers,
            starts_auto_forwarding: mocked.is_class(),
            kind,
        })
    }

    fn admit_members(
        &self,
        info: &TypeInfo,
        mock_name: &str,
        is_override: bool,
        is_class_mock: bool,
        skip: &FxHashSet<&str>,
        fragments: &mut Fragments,
    ) -> GenResult<()> {
        for method in &info.methods {
            if method.is_static
                || method.is_class_member
                || method.declared_in_extension
                || method.access == AccessLevel::Private
                || skip.contains(method.bare_name().as_str())
            {
                continue;
            }
            if method.is_initializer {
                // Initializers are not stubbed; on class mocks a required
                // initializer must still exist, so it is carried over marked
                // unavailable.
                if is_class_mock && method.is_required {
                    fragments.unavailable_initializers.push(method.bare_name());
                }
                continue;
            }

            let mock = MethodMock::new(method, mock_name, is_override);
            if !fragments.seen_identifiers.insert(mock.identifier()) {
                debug!(identifier = %mock.identifier(), "duplicate member signature skipped");
                continue;
            }
            fragments.stub_entries.push(mock.stub_entry());
            if fragments.seen_factory_keys.insert(mock.factory_key()) {
                fragments.factories.push(mock.factory());
            }
            fragments.forwarding.push(mock.forwarding());
            if fragments
                .seen_raw_signatures
                .insert(("method", mock.raw_signature()))
            {
                fragments.expect_setters.push(mock.expect_setter());
            }
        }

        for property in &info.properties {
            if property.is_static
                || property.declared_in_extension
                || property.access == AccessLevel::Private
                || skip.contains(property.bare_name().as_str())
            {
                continue;
            }
            if property.is_constant && property.is_writable {
                return Err(GenError::precondition(
                    info.name.clone(),
                    format!(
                        "constant property `{}` cannot carry a setter requirement",
                        property.bare_name()
                    ),
                ));
            }

            let mock = PropertyMock::new(property, mock_name, is_override);
            let mut raws = vec![("property_get", mock.raw_getter_signature())];
            if !mock.is_read_only() {
                raws.push(("property_set", mock.raw_setter_signature()));
            }
            // Accessors dedup independently: a re-declaration may narrow an
            // inherited property to read-only without suppressing the
            // ancestor's setter requirement.
            let accessors = mock
                .stub_entries()
                .into_iter()
                .zip(mock.factories())
                .zip(mock.forwarding())
                .zip(mock.expect_setters())
                .zip(raws);
            for ((((entry, factory), forwarding), setter), raw) in accessors {
                self.admit_accessor(entry, factory, forwarding, setter, raw, fragments);
            }
        }

        for subscript in &info.subscripts {
            if subscript.declared_in_extension || subscript.access == AccessLevel::Private {
                continue;
            }
            if subscript.params.is_empty() {
                return Err(GenError::precondition(
                    info.name.clone(),
                    "indexed accessor without index parameters",
                ));
            }

            let mock = SubscriptMock::new(subscript, mock_name, is_override);
            let mut raws = vec![("subscript", mock.raw_getter_signature())];
            if !mock.is_read_only() {
                raws.push(("subscript", mock.raw_setter_signature()));
            }
            let accessors = mock
                .stub_entries()
                .into_iter()
                .zip(mock.factories())
                .zip(mock.forwarding())
                .zip(mock.expect_setters())
                .zip(raws);
            for ((((entry, factory), forwarding), setter), raw) in accessors {
                self.admit_accessor(entry, factory, forwarding, setter, raw, fragments);
            }
        }

        Ok(())
    }

    /// Admit one accessor's fragment set, gated on its own stub identifier.
    fn admit_accessor(
        &self,
        entry: StubEntry,
        factory: ExpectationFactory,
        forwarding: ForwardingMember,
        setter: ExpectSetter,
        raw: (&'static str, String),
        fragments: &mut Fragments,
    ) {
        if !fragments.seen_identifiers.insert(entry.identifier.clone()) {
            debug!(identifier = %entry.identifier, "duplicate accessor signature skipped");
            return;
        }
        fragments.stub_entries.push(entry);
        let key = (factory.name.clone(), factory.signature.to_string());
        if fragments.seen_factory_keys.insert(key) {
            fragments.factories.push(factory);
        }
        fragments.forwarding.push(forwarding);
        if fragments.seen_raw_signatures.insert(raw) {
            fragments.expect_setters.push(setter);
        }
    }
}
