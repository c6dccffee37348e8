//! Per-property synthesis.
//!
//! A property contributes a getter fragment set and, when it carries a
//! setter requirement, a setter fragment set. Getter effects (async, throws)
//! thread through the getter fragments only; setters are always plain.

use crate::model::{
    DefaultPerformer, DescPiece, ExpectSetter, ExpectationCategory, ExpectationFactory,
    ForwardedArgument, ForwardingKind, ForwardingMember, StubEntry,
};
use crate::normalize::{renders_quoted, soften, substitute_self};
use crate::stub_id;
use umock_syntax::members::Property;
use umock_syntax::types::TypeExpr;

pub struct PropertyMock<'a> {
    property: &'a Property,
    mock_name: &'a str,
    is_override: bool,
}

impl<'a> PropertyMock<'a> {
    pub fn new(property: &'a Property, mock_name: &'a str, is_override: bool) -> Self {
        Self {
            property,
            mock_name,
            is_override,
        }
    }

    pub fn getter_identifier(&self) -> String {
        stub_id::property_getter_identifier(self.property)
    }

    pub fn setter_identifier(&self) -> String {
        stub_id::property_setter_identifier(self.property)
    }

    pub fn is_read_only(&self) -> bool {
        !self.property.is_writable
    }

    pub fn raw_getter_signature(&self) -> String {
        soften(&self.property.getter_function_type()).to_string()
    }

    pub fn raw_setter_signature(&self) -> String {
        soften(&self.property.setter_function_type()).to_string()
    }

    pub fn stub_entries(&self) -> Vec<StubEntry> {
        let mut entries = vec![StubEntry {
            identifier: self.getter_identifier(),
            description: vec![DescPiece::text(self.property.bare_name())],
        }];
        if !self.is_read_only() {
            entries.push(StubEntry {
                identifier: self.setter_identifier(),
                description: vec![
                    DescPiece::text(format!("{} = ", self.property.bare_name())),
                    DescPiece::Arg {
                        index: 0,
                        quoted: renders_quoted(&self.property.ty),
                    },
                ],
            });
        }
        entries
    }

    /// Property factories take no matchers; the property name alone selects
    /// the member, and the accessor is picked by the signature constraint.
    pub fn factories(&self) -> Vec<ExpectationFactory> {
        let mut factories = vec![self.factory(self.getter_identifier(), self.getter_signature())];
        if !self.is_read_only() {
            factories.push(self.factory(self.setter_identifier(), self.setter_signature()));
        }
        factories
    }

    pub fn forwarding(&self) -> Vec<ForwardingMember> {
        let mut members = vec![ForwardingMember {
            kind: ForwardingKind::PropertyGetter {
                name: self.property.name.clone(),
            },
            stub_identifier: self.getter_identifier(),
            arguments: vec![],
            cast_signature: self.prepend_forward(self.getter_signature()),
            is_async: self.property.getter_is_async,
            throws: self.property.getter_throws,
            is_override: self.is_override,
        }];
        if !self.is_read_only() {
            members.push(ForwardingMember {
                kind: ForwardingKind::PropertySetter {
                    name: self.property.name.clone(),
                },
                stub_identifier: self.setter_identifier(),
                arguments: vec![ForwardedArgument {
                    name: "newValue".to_string(),
                    by_reference: false,
                }],
                cast_signature: self.prepend_forward(self.setter_signature()),
                is_async: false,
                throws: false,
                is_override: self.is_override,
            });
        }
        members
    }

    pub fn expect_setters(&self) -> Vec<ExpectSetter> {
        let mut setters = vec![ExpectSetter {
            category: ExpectationCategory::Property,
            stub_identifier: self.getter_identifier(),
            expectation_signature: self.getter_signature(),
            perform_signature: self.prepend_forward(self.getter_signature()),
            default_performer: DefaultPerformer::for_member(self.is_override, false),
            generic_params: vec![],
            constraints: vec![],
            access: self.property.access.for_implementation(),
        }];
        if !self.is_read_only() {
            setters.push(ExpectSetter {
                category: ExpectationCategory::Property,
                stub_identifier: self.setter_identifier(),
                expectation_signature: self.setter_signature(),
                perform_signature: self.prepend_forward(self.setter_signature()),
                default_performer: DefaultPerformer::for_member(self.is_override, true),
                generic_params: vec![],
                constraints: vec![],
                access: self
                    .property
                    .setter_access
                    .unwrap_or(self.property.access)
                    .for_implementation(),
            });
        }
        setters
    }

    fn factory(&self, stub_identifier: String, signature: TypeExpr) -> ExpectationFactory {
        ExpectationFactory {
            category: ExpectationCategory::Property,
            name: self.property.bare_name(),
            stub_identifier,
            parameters: vec![],
            signature,
            generic_params: vec![],
            constraints: vec![],
            access: self.property.access.for_implementation(),
        }
    }

    fn getter_signature(&self) -> TypeExpr {
        substitute_self(&soften(&self.property.getter_function_type()), self.mock_name)
    }

    fn setter_signature(&self) -> TypeExpr {
        substitute_self(&soften(&self.property.setter_function_type()), self.mock_name)
    }

    fn prepend_forward(&self, base: TypeExpr) -> TypeExpr {
        if !self.is_override {
            return base;
        }
        match &base {
            TypeExpr::Function {
                params,
                is_async,
                throws,
                ret,
            } => TypeExpr::Function {
                params: std::iter::once(base.clone())
                    .chain(params.iter().cloned())
                    .collect(),
                is_async: *is_async,
                throws: *throws,
                ret: ret.clone(),
            },
            _ => base,
        }
    }
}
