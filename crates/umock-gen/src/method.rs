//! Per-method synthesis.
//!
//! One [`MethodMock`] wraps a resolved method declaration and produces each
//! synthesized fragment for it: the stub-table entry, the expectation
//! factory, the forwarding implementation and the expect-setter. Fragments
//! are independent values; the assembly order in the mock builder never
//! changes their content.

use crate::model::{
    DefaultPerformer, DescPiece, ExpectSetter, ExpectationCategory, ExpectationFactory,
    FactoryParameter, ForwardedArgument, ForwardingKind, ForwardingMember, StubEntry,
};
use crate::normalize::{escape_identifier, renders_quoted, soften, substitute_self};
use crate::stub_id;
use umock_syntax::members::Method;
use umock_syntax::types::TypeExpr;

pub struct MethodMock<'a> {
    method: &'a Method,
    mock_name: &'a str,
    /// Set for members a class mock overrides; adds the auto-forwarding
    /// short-circuit and the leading forward-to-super closure parameter.
    is_override: bool,
}

impl<'a> MethodMock<'a> {
    pub fn new(method: &'a Method, mock_name: &'a str, is_override: bool) -> Self {
        Self {
            method,
            mock_name,
            is_override,
        }
    }

    pub fn identifier(&self) -> String {
        stub_id::method_identifier(self.method)
    }

    /// Dedup key for expect-setters: the performer shape with labels erased
    /// and `Self` left alone.
    pub fn raw_signature(&self) -> String {
        soften(&self.method.function_type()).to_string()
    }

    /// Dedup key for factories: name plus the label-free signature.
    pub fn factory_key(&self) -> (String, String) {
        (self.method.bare_name(), self.signature().to_string())
    }

    pub fn stub_entry(&self) -> StubEntry {
        let mut description = vec![DescPiece::text(format!("{}(", self.method.bare_name()))];
        for (index, param) in self.method.params.iter().enumerate() {
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
        description.push(DescPiece::text(")"));
        StubEntry {
            identifier: self.identifier(),
            description,
        }
    }

    pub fn factory(&self) -> ExpectationFactory {
        ExpectationFactory {
            category: ExpectationCategory::Method,
            name: self.method.bare_name(),
            stub_identifier: self.identifier(),
            parameters: self
                .method
                .params
                .iter()
                .map(|param| FactoryParameter {
                    label: param.label.clone(),
                    name: param.name.clone(),
                    matched: substitute_self(&soften(&param.ty), self.mock_name),
                })
                .collect(),
            signature: self.signature(),
            generic_params: self.method.generic_params.clone(),
            constraints: self.method.constraints.clone(),
            access: self.method.access.for_implementation(),
        }
    }

    pub fn forwarding(&self) -> ForwardingMember {
        ForwardingMember {
            kind: ForwardingKind::Method {
                name: self.method.name.clone(),
            },
            stub_identifier: self.identifier(),
            arguments: self
                .method
                .params
                .iter()
                .map(|param| ForwardedArgument {
                    name: escape_identifier(&param.name),
                    by_reference: param.is_inout,
                })
                .collect(),
            cast_signature: self.perform_signature(),
            is_async: self.method.is_async,
            throws: self.method.throws,
            is_override: self.is_override,
        }
    }

    pub fn expect_setter(&self) -> ExpectSetter {
        let default_performer =
            DefaultPerformer::for_member(self.is_override, self.method.return_type().is_void());
        ExpectSetter {
            category: ExpectationCategory::Method,
            stub_identifier: self.identifier(),
            expectation_signature: self.signature(),
            perform_signature: self.perform_signature(),
            default_performer,
            generic_params: self.method.generic_params.clone(),
            constraints: self.method.constraints.clone(),
            access: self.method.access.for_implementation(),
        }
    }

    /// The `Signature ==` constraint type: the member's function type,
    /// softened and with `Self` rewritten to the mock name.
    fn signature(&self) -> TypeExpr {
        substitute_self(&soften(&self.method.function_type()), self.mock_name)
    }

    /// The shape the queued performer is downcast to. Overriding members
    /// carry a leading forward-to-super closure of the plain shape.
    fn perform_signature(&self) -> TypeExpr {
        let base = self.signature();
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

    fn greet() -> Method {
        Method::new("greet")
            .with_params(vec![Parameter::named("name", parse_type("String").unwrap())])
            .returning(parse_type("String").unwrap())
    }

    #[test]
    fn test_stub_entry_description() {
        let method = greet();
        let entry = MethodMock::new(&method, "GreeterMock", false).stub_entry();
        assert_eq!(entry.identifier, "greet_name_String_ret_String");
        assert_eq!(
            entry.description,
            vec![
                DescPiece::text("greet("),
                DescPiece::text("name: "),
                DescPiece::Arg {
                    index: 0,
                    quoted: true
                },
                DescPiece::text(")"),
            ]
        );
    }

    #[test]
    fn test_factory_packages_matchers_and_signature() {
        let method = greet();
        let factory = MethodMock::new(&method, "GreeterMock", false).factory();
        assert_eq!(factory.name, "greet");
        assert_eq!(factory.parameters.len(), 1);
        assert_eq!(factory.parameters[0].matched.to_string(), "String");
        assert_eq!(factory.signature.to_string(), "(String) -> String");
    }

    #[test]
    fn test_self_rewritten_in_signature() {
        let method = Method::new("clone").returning(parse_type("Self").unwrap());
        let factory = MethodMock::new(&method, "GreeterMock", false).factory();
        assert_eq!(factory.signature.to_string(), "() -> GreeterMock");
    }

    #[test]
    fn test_forwarding_threads_effects() {
        let method = Method::new("load")
            .returning(parse_type("Data").unwrap())
            .asynchronous()
            .throwing();
        let forwarding = MethodMock::new(&method, "LoaderMock", false).forwarding();
        assert!(forwarding.is_async);
        assert!(forwarding.throws);
        assert_eq!(
            forwarding.cast_signature.to_string(),
            "() async throws -> Data"
        );
    }

    #[test]
    fn test_override_prepends_forward_closure() {
        let method = greet();
        let mock = MethodMock::new(&method, "GreeterMock", true);
        assert_eq!(
            mock.forwarding().cast_signature.to_string(),
            "((String) -> String, String) -> String"
        );
        assert_eq!(
            mock.expect_setter().default_performer,
            DefaultPerformer::ForwardToSuper
        );
    }

    #[test]
    fn test_void_method_gets_empty_default_performer() {
        let method = Method::new("reset");
        let setter = MethodMock::new(&method, "GreeterMock", false).expect_setter();
        assert_eq!(setter.default_performer, DefaultPerformer::Empty);
        let method = greet();
        let setter = MethodMock::new(&method, "GreeterMock", false).expect_setter();
        assert_eq!(setter.default_performer, DefaultPerformer::None);
    }

    #[test]
    fn test_inout_parameter_forwarded_by_reference() {
        let method = Method::new("fill").with_params(vec![
            Parameter::named("buffer", parse_type("[UInt8]").unwrap()).inout(),
        ]);
        let forwarding = MethodMock::new(&method, "WriterMock", false).forwarding();
        assert!(forwarding.arguments[0].by_reference);
    }
}
