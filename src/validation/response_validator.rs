use crate::error::ContractError;
use crate::protocol::{HttpMethod, HttpResponse};
use crate::specification::model_registry::{ContractDocument, Operation};
use crate::specification::reference_resolver::ReferenceResolver;
use crate::validation::content_validator::{validate_content, ContentValidator};
use crate::validation::schema_validator::SchemaValidator;
use crate::validation::violation::{Violation, ViolationKind, ViolationReport};
use log::debug;

/// Checks an observed response against the operation's declared responses
#[derive(Debug, Clone, Copy)]
pub struct ResponseValidator<'a> {
    resolver: ReferenceResolver<'a>,
}

impl<'a> ResponseValidator<'a> {
    pub fn new(document: &'a ContractDocument) -> Self {
        Self {
            resolver: ReferenceResolver::new(document),
        }
    }

    /// Status codes must match exactly. Required header and body violations are
    /// aggregated into one `ResponseDoesNotMatchSpec`.
    pub fn validate(
        &self,
        path_template: &str,
        method: HttpMethod,
        operation: &'a Operation,
        expected_status: &str,
        response: &HttpResponse,
        content_validators: &[Box<dyn ContentValidator>],
    ) -> Result<(), ContractError> {
        let actual_status = response.status_code();
        if actual_status != expected_status {
            return Err(ContractError::StatusCodeMismatch {
                actual: actual_status,
                expected: expected_status.to_string(),
            });
        }

        // No wildcard or default fallback
        let response_spec = operation
            .response(expected_status)
            .ok_or_else(|| ContractError::SpecNotFound {
                uri: path_template.to_string(),
                method: method.to_string(),
                status_code: expected_status.to_string(),
            })?;

        let mut violations: Vec<Violation> = response_spec
            .required_headers()
            .filter(|name| !response.headers.contains(name))
            .map(|name| {
                Violation::new(
                    &format!("header.{}", name),
                    ViolationKind::MissingRequiredHeader { name: name.to_string() },
                )
            })
            .collect();

        if !response_spec.content.is_empty() {
            match response.body.as_ref().filter(|body| !body.is_empty()) {
                Some(body) => violations.extend(validate_content(
                    &response_spec.content,
                    body,
                    SchemaValidator::with_resolver(self.resolver),
                    content_validators,
                )?),
                None => violations.push(Violation::new("body", ViolationKind::RequiredContentMissing)),
            }
        }

        if violations.is_empty() {
            debug!("Response {} for {} {} matches contract", actual_status, method, path_template);
            Ok(())
        } else {
            Err(ContractError::ResponseDoesNotMatchSpec(ViolationReport::new(violations)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::model_registry::{HeaderSpec, Response};
    use crate::specification::schema::Schema;
    use crate::validation::content_validator::default_content_validators;
    use serde_json::json;

    fn document() -> ContractDocument {
        ContractDocument::new("V1 API", "V1").with_schema(
            "product",
            Schema::object()
                .with_property("id", Schema::number())
                .with_required_property("name", Schema::string())
                .into(),
        )
    }

    fn operation() -> Operation {
        Operation::new()
            .with_response(
                "200",
                Response::new("OK").with_json_content(Schema::array(Schema::reference("product"))),
            )
            .with_response("201", Response::new("Created").with_header("Location", HeaderSpec::required()))
            .with_response("404", Response::new("Not found"))
    }

    fn validate(operation: &Operation, expected: &str, response: &HttpResponse) -> Result<(), ContractError> {
        let document = document();
        ResponseValidator::new(&document).validate(
            "/api/products",
            HttpMethod::Get,
            operation,
            expected,
            response,
            &default_content_validators(),
        )
    }

    #[test]
    fn test_status_code_mismatch_message() {
        let operation = operation();
        let response = HttpResponse::new(200);

        match validate(&operation, "404", &response) {
            Err(error) => assert_eq!(error.to_string(), "Status code '200' does not match expected value '404'"),
            Ok(()) => panic!("expected status mismatch"),
        }
    }

    #[test]
    fn test_valid_body() {
        let operation = operation();
        let response = HttpResponse::new(200).with_json_body(&json!([{ "id": 1, "name": "Test product" }]));

        assert!(validate(&operation, "200", &response).is_ok());
    }

    #[test]
    fn test_header_and_body_violations_aggregate() {
        let operation = operation().with_response(
            "200",
            Response::new("OK")
                .with_header("X-Total", HeaderSpec::required())
                .with_json_content(Schema::array(Schema::reference("product"))),
        );
        let response = HttpResponse::new(200).with_json_body(&json!([{ "id": 1 }, { "name": 2 }]));

        match validate(&operation, "200", &response) {
            Err(ContractError::ResponseDoesNotMatchSpec(report)) => {
                let locations: Vec<&str> = report.violations().iter().map(|v| v.location.as_str()).collect();
                assert_eq!(locations, vec!["header.X-Total", "$[0].name", "$[1].name"]);
            }
            other => panic!("expected response mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_required_header() {
        let operation = operation();

        let missing = HttpResponse::new(201);
        assert!(matches!(
            validate(&operation, "201", &missing),
            Err(ContractError::ResponseDoesNotMatchSpec(_))
        ));

        let present = HttpResponse::new(201).with_header("location", "/api/products/1");
        assert!(validate(&operation, "201", &present).is_ok());
    }

    #[test]
    fn test_missing_declared_body() {
        let operation = operation();
        let response = HttpResponse::new(200);

        match validate(&operation, "200", &response) {
            Err(ContractError::ResponseDoesNotMatchSpec(report)) => {
                assert_eq!(report.violations()[0].kind, ViolationKind::RequiredContentMissing)
            }
            other => panic!("expected response mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_undeclared_body_is_ignored() {
        let operation = operation();
        let response = HttpResponse::new(404).with_json_body(&json!({ "error": "missing" }));

        assert!(validate(&operation, "404", &response).is_ok());
    }
}
