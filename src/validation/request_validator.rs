use crate::error::ContractError;
use crate::protocol::HttpRequest;
use crate::specification::model_registry::{ContractDocument, Operation, Parameter, PathItem};
use crate::specification::reference_resolver::ReferenceResolver;
use crate::specification::route_resolver::ResolvedOperation;
use crate::validation::content_validator::{validate_content, ContentValidator};
use crate::validation::parameter_validator::{ParameterValidator, ParameterValues};
use crate::validation::schema_validator::SchemaValidator;
use crate::validation::violation::{Violation, ViolationKind, ViolationReport};
use log::debug;

/// Where parameters implied by an operation's security requirements come from.
///
/// Security schemes are not interpreted yet, so the only source contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityParameterSource {
    #[default]
    NoSecurityScheme,
}

impl SecurityParameterSource {
    pub fn parameters<'a>(&self, _document: &'a ContractDocument, _operation: &'a Operation) -> Vec<&'a Parameter> {
        match self {
            SecurityParameterSource::NoSecurityScheme => Vec::new(),
        }
    }
}

/// Checks an outgoing request against the operation it resolved to
#[derive(Debug, Clone, Copy)]
pub struct RequestValidator<'a> {
    resolver: ReferenceResolver<'a>,
    security: SecurityParameterSource,
}

impl<'a> RequestValidator<'a> {
    pub fn new(document: &'a ContractDocument) -> Self {
        Self {
            resolver: ReferenceResolver::new(document),
            security: SecurityParameterSource::default(),
        }
    }

    pub fn with_security(mut self, security: SecurityParameterSource) -> Self {
        self.security = security;
        self
    }

    /// Security-derived, then path-item, then operation parameters, with `$ref`s
    /// resolved. A later declaration of the same name and location replaces an
    /// earlier one.
    pub fn expand_parameters(
        &self,
        path_item: &'a PathItem,
        operation: &'a Operation,
    ) -> Result<Vec<&'a Parameter>, ContractError> {
        let mut expanded = self.security.parameters(self.resolver.document(), operation);

        for referable in path_item.parameters.iter().chain(operation.parameters.iter()) {
            let parameter = self.resolver.resolve_parameter(referable)?;
            expanded.retain(|existing| {
                !(existing.name == parameter.name && existing.location == parameter.location)
            });
            expanded.push(parameter);
        }

        Ok(expanded)
    }

    /// Every violation of the request. Parameter violations are returned on their own,
    /// without looking at the body.
    pub fn check(
        &self,
        resolved: &ResolvedOperation<'a>,
        request: &HttpRequest,
        content_validators: &[Box<dyn ContentValidator>],
    ) -> Result<Vec<Violation>, ContractError> {
        let parameters = self.expand_parameters(resolved.path_item, resolved.operation)?;
        let values = ParameterValues::from_request(request, resolved.path_values.clone());

        let violations = ParameterValidator::with_resolver(self.resolver).validate(&parameters, &values)?;
        if !violations.is_empty() {
            debug!(
                "{} parameter violation(s) for {} {}, body not checked",
                violations.len(),
                resolved.method,
                resolved.path_template
            );
            return Ok(violations);
        }

        let request_body = match &resolved.operation.request_body {
            Some(request_body) => self.resolver.resolve_request_body(request_body)?,
            None => return Ok(violations),
        };

        match request.body.as_ref().filter(|body| !body.is_empty()) {
            Some(body) => validate_content(
                &request_body.content,
                body,
                SchemaValidator::with_resolver(self.resolver),
                content_validators,
            ),
            None if request_body.required => Ok(vec![Violation::new(
                "body",
                ViolationKind::RequiredContentMissing,
            )]),
            None => Ok(violations),
        }
    }

    /// Fail with `RequestDoesNotMatchSpec` carrying every violation found
    pub fn validate(
        &self,
        resolved: &ResolvedOperation<'a>,
        request: &HttpRequest,
        content_validators: &[Box<dyn ContentValidator>],
    ) -> Result<(), ContractError> {
        let violations = self.check(resolved, request, content_validators)?;
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ContractError::RequestDoesNotMatchSpec(ViolationReport::new(violations)))
        }
    }
}
