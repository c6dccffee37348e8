//! Per-subscript synthesis.
//!
//! Indexed accessors mirror properties with index parameters: read-only
//! declarations contribute getter fragments only, read-write ones also get
//! the setter set, whose boxed argument list appends the new value after the
//! indices. Call descriptions render as `[indices]` / `[indices] = value`.

use crate::model::{
    DefaultPerformer, DescPiece, ExpectSetter, ExpectationCategory, ExpectationFactory,
    FactoryParameter, ForwardedArgument, ForwardingKind, ForwardingMember, StubEntry,
};
use crate::normalize::{escape_identifier, renders_quoted, soften, substitute_self};
use crate::stub_id;
use umock_syntax::members::Subscript;
use umock_syntax::types::TypeExpr;

pub struct SubscriptMock<'a> {
    subscript: &'a Subscript,
    mock_name: &'a str,
    is_override: bool,
}

impl<'a> SubscriptMock<'a> {
    pub fn new(subscript: &'a Subscript, mock_name: &'a str, is_override: bool) -> Self {
        Self {
            subscript,
            mock_name,
            is_override,
        }
    }

    pub fn getter_identifier(&self) -> String {
        stub_id::subscript_getter_identifier(self.subscript)
    }

    pub fn setter_identifier(&self) -> String {
        stub_id::subscript_setter_identifier(self.subscript)
    }

    pub fn is_read_only(&self) -> bool {
        !self.subscript.is_writable
    }

    pub fn raw_getter_signature(&self) -> String {
        soften(&self.subscript.getter_function_type()).to_string()
    }

    pub fn raw_setter_signature(&self) -> String {
        soften(&self.subscript.setter_function_type()).to_string()
    }

    pub fn stub_entries(&self) -> Vec<StubEntry> {
        let mut entries = vec![StubEntry {
            identifier: self.getter_identifier(),
            description: self.index_description(),
        }];
        if !self.is_read_only() {
            let mut description = self.index_description();
            description.push(DescPiece::text(" = "));
            description.push(DescPiece::Arg {
                index: self.subscript.params.len(),
                quoted: renders_quoted(&self.subscript.ret),
            });
            entries.push(StubEntry {
                identifier: self.setter_identifier(),
                description,
            });
        }
        entries
    }

    pub fn factories(&self) -> Vec<ExpectationFactory> {
        let mut factories = vec![self.factory(self.getter_identifier(), self.getter_signature())];
        if !self.is_read_only() {
            factories.push(self.factory(self.setter_identifier(), self.setter_signature()));
        }
        factories
    }

    pub fn forwarding(&self) -> Vec<ForwardingMember> {
        let index_arguments: Vec<ForwardedArgument> = self
            .subscript
            .params
            .iter()
            .map(|param| ForwardedArgument {
                name: escape_identifier(&param.name),
                by_reference: param.is_inout,
            })
            .collect();

        let mut members = vec![ForwardingMember {
            kind: ForwardingKind::SubscriptGetter,
            stub_identifier: self.getter_identifier(),
            arguments: index_arguments.clone(),
            cast_signature: self.prepend_forward(self.getter_signature()),
            is_async: false,
            throws: false,
            is_override: self.is_override,
        }];
        if !self.is_read_only() {
            let mut arguments = index_arguments;
            arguments.push(ForwardedArgument {
                name: "newValue".to_string(),
                by_reference: false,
            });
            members.push(ForwardingMember {
                kind: ForwardingKind::SubscriptSetter,
                stub_identifier: self.setter_identifier(),
                arguments,
                cast_signature: self.prepend_forward(self.setter_signature()),
                is_async: false,
                throws: false,
                is_override: self.is_override,
            });
        }
        members
    }

    pub fn expect_setters(&self) -> Vec<ExpectSetter> {
        let access = self.subscript.access.for_implementation();
        let mut setters = vec![ExpectSetter {
            category: ExpectationCategory::Subscript,
            stub_identifier: self.getter_identifier(),
            expectation_signature: self.getter_signature(),
            perform_signature: self.prepend_forward(self.getter_signature()),
            default_performer: DefaultPerformer::for_member(self.is_override, false),
            generic_params: vec![],
            constraints: vec![],
            access,
        }];
        if !self.is_read_only() {
            setters.push(ExpectSetter {
                category: ExpectationCategory::Subscript,
                stub_identifier: self.setter_identifier(),
                expectation_signature: self.setter_signature(),
                perform_signature: self.prepend_forward(self.setter_signature()),
                default_performer: DefaultPerformer::for_member(self.is_override, true),
                generic_params: vec![],
                constraints: vec![],
                access,
            });
        }
        setters
    }

    fn index_description(&self) -> Vec<DescPiece> {
        let mut description = vec![DescPiece::text("[")];
        for (index, param) in self.subscript.params.iter().enumerate() {
            if index > 0 {
                description.push(DescPiece::text(", "));
            }
            if let Some(label) = &param.label {
                description.push(DescPiece::text(format!("{label}: ")));
            }
            description.push(DescPiece::Arg {
                index,
                quoted: renders_quoted(&param.ty),
            });
        }
        description.push(DescPiece::text("]"));
        description
    }

    fn factory(&self, stub_identifier: String, signature: TypeExpr) -> ExpectationFactory {
        ExpectationFactory {
            category: ExpectationCategory::Subscript,
            name: "subscript".to_string(),
            stub_identifier,
            parameters: self
                .subscript
                .params
                .iter()
                .map(|param| FactoryParameter {
                    label: param.label.clone(),
                    name: param.name.clone(),
                    matched: substitute_self(&soften(&param.ty), self.mock_name),
                })
                .collect(),
            signature,
            generic_params: vec![],
            constraints: vec![],
            access: self.subscript.access.for_implementation(),
        }
    }

    fn getter_signature(&self) -> TypeExpr {
        substitute_self(&soften(&self.subscript.getter_function_type()), self.mock_name)
    }

    fn setter_signature(&self) -> TypeExpr {
        substitute_self(&soften(&self.subscript.setter_function_type()), self.mock_name)
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

#[cfg(test)]
mod tests {
    use super::*;
    use umock_syntax::members::Parameter;
    use umock_syntax::parse_type;

    fn indexed(writable: bool) -> Subscript {
        let subscript = Subscript::new(
            vec![Parameter::unlabeled("index", parse_type("Int").unwrap())],
            parse_type("String").unwrap(),
        );
        if writable { subscript.writable() } else { subscript }
    }

    #[test]
    fn test_read_only_subscript_synthesizes_getter_only() {
        let subscript = indexed(false);
        let mock = SubscriptMock::new(&subscript, "StoreMock", false);
        assert_eq!(mock.stub_entries().len(), 1);
        assert_eq!(mock.factories().len(), 1);
        assert_eq!(mock.forwarding().len(), 1);
        assert_eq!(mock.expect_setters().len(), 1);
    }

    #[test]
    fn test_read_write_subscript_synthesizes_both() {
        let subscript = indexed(true);
        let mock = SubscriptMock::new(&subscript, "StoreMock", false);
        assert_eq!(mock.stub_entries().len(), 2);
        assert_eq!(mock.factories().len(), 2);
        assert_eq!(
            mock.factories()[0].signature.to_string(),
            "(Int) -> String"
        );
        assert_eq!(
            mock.factories()[1].signature.to_string(),
            "(Int, String) -> Void"
        );
    }

    #[test]
    fn test_setter_description_appends_new_value() {
        let subscript = indexed(true);
        let mock = SubscriptMock::new(&subscript, "StoreMock", false);
        let entries = mock.stub_entries();
        assert_eq!(
            entries[1].description,
            vec![
                DescPiece::text("["),
                DescPiece::Arg {
                    index: 0,
                    quoted: false
                },
                DescPiece::text("]"),
                DescPiece::text(" = "),
                DescPiece::Arg {
                    index: 1,
                    quoted: true
                },
            ]
        );
    }

    #[test]
    fn test_setter_forwarding_appends_new_value_argument() {
        let subscript = indexed(true);
        let mock = SubscriptMock::new(&subscript, "StoreMock", false);
        let forwarding = mock.forwarding();
        let names: Vec<&str> = forwarding[1]
            .arguments
            .iter()
            .map(|arg| arg.name.as_str())
            .collect();
        assert_eq!(names, vec!["index", "newValue"]);
    }
}
