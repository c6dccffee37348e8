//! End-to-end pipeline tests over hand-built declaration trees.

use umock::{Generated, Generator, GeneratorConfig};
use umock_gen::{DescPiece, ExpectationCategory, MockKind};
use umock_syntax::decl::{Decl, SourceUnit, TypeDecl, TypeKind};
use umock_syntax::members::{
    AliasDecl, AssociatedTypeDecl, GenericConstraint, Member, Method, Parameter, Property,
    Subscript,
};
use umock_syntax::parse_type;

const MARKER: &str = "// mock:AutoMockable";

fn generate(units: &[SourceUnit]) -> Generated {
    Generator::new(GeneratorConfig::default())
        .try_generate(units)
        .unwrap()
}

fn interface(name: &str, members: Vec<Member>) -> Decl {
    Decl::Type(
        TypeDecl::new(TypeKind::Interface, name)
            .with_comment(MARKER)
            .with_members(members),
    )
}

#[test]
fn test_greeter_scenario() {
    let units = [SourceUnit::new(vec![interface(
        "Greeter",
        vec![Member::Method(
            Method::new("greet")
                .with_params(vec![Parameter::named("name", parse_type("String").unwrap())])
                .returning(parse_type("String").unwrap()),
        )],
    )])];
    let generated = generate(&units);
    assert_eq!(generated.mocks.len(), 1);

    let unit = &generated.mocks[0];
    assert_eq!(unit.name, "GreeterMock");
    assert_eq!(unit.kind, MockKind::Interface);

    // Exactly one stub entry, keyed by the documented identifier.
    assert_eq!(unit.stub_entries.len(), 1);
    assert_eq!(unit.stub_entries[0].identifier, "greet_name_String_ret_String");

    // One forwarding member performing one lookup under the same key.
    assert_eq!(unit.forwarding.len(), 1);
    assert_eq!(
        unit.forwarding[0].stub_identifier,
        "greet_name_String_ret_String"
    );

    // greet(name: Parameter<String>) -> MethodExpectation<(String) -> String>
    let factory = &unit.factories[0];
    assert_eq!(factory.category, ExpectationCategory::Method);
    assert_eq!(factory.name, "greet");
    assert_eq!(factory.parameters[0].label.as_deref(), Some("name"));
    assert_eq!(factory.parameters[0].matched.to_string(), "String");
    assert_eq!(factory.signature.to_string(), "(String) -> String");
}

#[test]
fn test_file_scope_alias_resolves_at_any_depth() {
    // `typealias ID = Int` at file scope, referenced by a member of a type
    // nested two levels deep.
    let service = TypeDecl::new(TypeKind::Interface, "Service")
        .with_comment(MARKER)
        .with_members(vec![Member::Method(
            Method::new("fetch")
                .with_params(vec![Parameter::named("id", parse_type("ID").unwrap())])
                .returning(parse_type("ID").unwrap()),
        )]);
    let inner = TypeDecl::new(TypeKind::ValueType, "Inner")
        .with_members(vec![Member::Nested(service)]);
    let outer = TypeDecl::new(TypeKind::ValueType, "Outer")
        .with_members(vec![Member::Nested(inner)]);
    let units = [SourceUnit::new(vec![
        Decl::Alias(AliasDecl::new("ID", parse_type("Int").unwrap())),
        Decl::Type(outer),
    ])];

    let generated = generate(&units);
    let unit = &generated.mocks[0];
    assert_eq!(unit.stub_entries[0].identifier, "fetch_id_Int_ret_Int");
    assert_eq!(
        unit.factories[0].parameters[0].matched.to_string(),
        "Int"
    );
    assert_eq!(unit.factories[0].signature.to_string(), "(Int) -> Int");
}

#[test]
fn test_scoped_alias_shadows_global() {
    // The interface declares its own `ID`; the file-scope one loses.
    let service = TypeDecl::new(TypeKind::Interface, "Service")
        .with_comment(MARKER)
        .with_members(vec![
            Member::Alias(AliasDecl::new("ID", parse_type("String").unwrap())),
            Member::Method(
                Method::new("fetch")
                    .with_params(vec![Parameter::named("id", parse_type("ID").unwrap())]),
            ),
        ]);
    let units = [SourceUnit::new(vec![
        Decl::Alias(AliasDecl::new("ID", parse_type("Int").unwrap())),
        Decl::Type(service),
    ])];
    let generated = generate(&units);
    assert_eq!(
        generated.mocks[0].stub_entries[0].identifier,
        "fetch_id_String_sync_ret_Void"
    );
}

#[test]
fn test_diamond_inheritance_flattens_once() {
    let units = [SourceUnit::new(vec![
        Decl::Type(
            TypeDecl::new(TypeKind::Interface, "D")
                .with_inherited(vec!["B".to_string(), "C".to_string()])
                .with_comment(MARKER),
        ),
        Decl::Type(
            TypeDecl::new(TypeKind::Interface, "B").with_inherited(vec!["A".to_string()]),
        ),
        Decl::Type(
            TypeDecl::new(TypeKind::Interface, "C").with_inherited(vec!["A".to_string()]),
        ),
        Decl::Type(
            TypeDecl::new(TypeKind::Interface, "A")
                .with_members(vec![Member::Method(Method::new("shared"))]),
        ),
    ])];
    let generated = generate(&units);
    let unit = &generated.mocks[0];
    assert_eq!(unit.name, "DMock");
    assert_eq!(unit.stub_entries.len(), 1);
    assert_eq!(unit.forwarding.len(), 1);
}

#[test]
fn test_pinned_associated_type_becomes_alias() {
    let mut element = AssociatedTypeDecl::new("Element");
    element.conformances = vec![parse_type("Hashable").unwrap()];
    let mut decl = TypeDecl::new(TypeKind::Interface, "Store")
        .with_comment(MARKER)
        .with_members(vec![Member::AssociatedType(element)]);
    decl.constraints = vec![GenericConstraint::SameType {
        left: parse_type("Element").unwrap(),
        right: parse_type("String").unwrap(),
    }];
    let units = [SourceUnit::new(vec![Decl::Type(decl)])];
    let generated = generate(&units);
    let unit = &generated.mocks[0];

    // Same-type + conformance: alias wins, no generic parameter.
    assert!(unit.generic_params.is_empty());
    assert_eq!(unit.aliases.len(), 1);
    assert_eq!(unit.aliases[0].name, "Element");
    assert_eq!(unit.aliases[0].target.to_string(), "String");
}

#[test]
fn test_effects_only_difference_distinguishes() {
    let units = [SourceUnit::new(vec![interface(
        "Loader",
        vec![
            Member::Method(Method::new("load").returning(parse_type("Data").unwrap())),
            Member::Method(
                Method::new("load")
                    .returning(parse_type("Data").unwrap())
                    .asynchronous()
                    .throwing(),
            ),
        ],
    )])];
    let generated = generate(&units);
    let unit = &generated.mocks[0];

    assert_eq!(unit.stub_entries.len(), 2);
    assert_ne!(
        unit.stub_entries[0].identifier,
        unit.stub_entries[1].identifier
    );
    // Different expectation signature constraints as well.
    assert_eq!(unit.factories.len(), 2);
    assert_eq!(unit.factories[0].signature.to_string(), "() -> Data");
    assert_eq!(
        unit.factories[1].signature.to_string(),
        "() async throws -> Data"
    );
    assert!(unit.forwarding[1].is_async && unit.forwarding[1].throws);
}

#[test]
fn test_parameter_type_only_difference_distinguishes() {
    let units = [SourceUnit::new(vec![interface(
        "Repo",
        vec![
            Member::Method(
                Method::new("fetch")
                    .with_params(vec![Parameter::named("id", parse_type("Int").unwrap())])
                    .returning(parse_type("String").unwrap()),
            ),
            Member::Method(
                Method::new("fetch")
                    .with_params(vec![Parameter::named("id", parse_type("String").unwrap())])
                    .returning(parse_type("String").unwrap()),
            ),
        ],
    )])];
    let generated = generate(&units);
    let unit = &generated.mocks[0];
    assert_eq!(unit.stub_entries.len(), 2);
    assert_ne!(
        unit.stub_entries[0].identifier,
        unit.stub_entries[1].identifier
    );
}

#[test]
fn test_accessor_split_for_properties_and_subscripts() {
    let units = [SourceUnit::new(vec![interface(
        "Table",
        vec![
            Member::Property(Property::new("count", parse_type("Int").unwrap())),
            Member::Property(Property::new("title", parse_type("String").unwrap()).writable()),
            Member::Subscript(Subscript::new(
                vec![Parameter::unlabeled("index", parse_type("Int").unwrap())],
                parse_type("String").unwrap(),
            )),
            Member::Subscript(
                Subscript::new(
                    vec![Parameter::unlabeled("key", parse_type("String").unwrap())],
                    parse_type("Int").unwrap(),
                )
                .writable(),
            ),
        ],
    )])];
    let generated = generate(&units);
    let unit = &generated.mocks[0];

    let identifiers: Vec<&str> = unit
        .stub_entries
        .iter()
        .map(|entry| entry.identifier.as_str())
        .collect();
    assert_eq!(
        identifiers,
        vec![
            "get_count_Int",
            "get_title_String",
            "set_title_String",
            "subscript_get___index_Int_String",
            "subscript_get___key_String_Int",
            "subscript_set___key_String_Int",
        ]
    );

    // Setter description: `title = <quoted arg>`.
    let set_title = &unit.stub_entries[2];
    assert_eq!(
        set_title.description,
        vec![
            DescPiece::text("title = "),
            DescPiece::Arg {
                index: 0,
                quoted: true
            },
        ]
    );
}

#[test]
fn test_extension_marker_and_merged_members() {
    let units = [SourceUnit::new(vec![
        Decl::Type(
            TypeDecl::new(TypeKind::Interface, "Service")
                .with_members(vec![Member::Method(Method::new("run"))]),
        ),
        Decl::Type(
            TypeDecl::new(TypeKind::Extension, "Service")
                .with_comment(MARKER)
                .with_members(vec![Member::Method(Method::new("helper"))]),
        ),
    ])];
    let generated = generate(&units);

    // The marker on the extension selects the declaration; the extension's
    // own member is merged but never mocked.
    assert_eq!(generated.mocks.len(), 1);
    let unit = &generated.mocks[0];
    assert_eq!(unit.name, "ServiceMock");
    assert_eq!(unit.stub_entries.len(), 1);
    assert_eq!(unit.stub_entries[0].identifier, "run_sync_ret_Void");
}

#[test]
fn test_double_annotation_selects_once() {
    let units = [SourceUnit::new(vec![
        Decl::Type(TypeDecl::new(TypeKind::Interface, "Service").with_comment(MARKER)),
        Decl::Type(TypeDecl::new(TypeKind::Extension, "Service").with_comment(MARKER)),
    ])];
    let generated = generate(&units);
    assert_eq!(generated.mocks.len(), 1);
    assert!(generated.diagnostics.is_empty());
}

#[test]
fn test_class_mock_auto_forwarding() {
    let units = [SourceUnit::new(vec![
        Decl::Type(
            TypeDecl::new(TypeKind::Class, "Animator")
                .with_inherited(vec!["Engine".to_string()])
                .with_comment(MARKER)
                .with_members(vec![Member::Method(Method::new("start"))]),
        ),
        Decl::Type(TypeDecl::new(TypeKind::Class, "Engine")),
    ])];
    let generated = generate(&units);
    let unit = &generated.mocks[0];

    assert_eq!(
        unit.kind,
        MockKind::Class {
            superclass: Some("Engine".to_string())
        }
    );
    assert!(unit.starts_auto_forwarding);
    assert!(unit.forwarding[0].is_override);
    // Overrides downcast to a shape with the leading forward-to-super slot.
    assert_eq!(
        unit.forwarding[0].cast_signature.to_string(),
        "(() -> Void) -> Void"
    );
}

#[test]
fn test_fatal_precondition_aborts_whole_run() {
    // The healthy first type must not survive a fatal failure on the second.
    let units = [SourceUnit::new(vec![
        interface("Fine", vec![Member::Method(Method::new("run"))]),
        interface(
            "Broken",
            vec![Member::Subscript(Subscript::new(
                vec![],
                parse_type("Int").unwrap(),
            ))],
        ),
    ])];
    let result = Generator::new(GeneratorConfig::default()).try_generate(&units);
    assert!(result.is_err());
}

#[test]
fn test_generation_is_deterministic() {
    let units = [SourceUnit::new(vec![interface(
        "Greeter",
        vec![Member::Method(
            Method::new("greet")
                .with_params(vec![Parameter::named("name", parse_type("String").unwrap())])
                .returning(parse_type("String").unwrap()),
        )],
    )])];
    let first = generate(&units);
    let second = generate(&units);
    assert_eq!(first, second);
}
