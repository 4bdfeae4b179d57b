use crate::error::ContractError;
use crate::protocol::{normalize_media_type, HttpBody};
use crate::specification::model_registry::MediaTypeSpec;
use crate::validation::schema_validator::{SchemaValidator, ROOT_PATH};
use crate::validation::violation::{Violation, ViolationKind};
use log::debug;
use std::collections::BTreeMap;

/// Body validation strategy for a family of media types
pub trait ContentValidator: Send + Sync {
    /// Whether this validator handles the (lowercase, parameter-free) media type
    fn can_validate(&self, media_type: &str) -> bool;

    fn validate<'a>(
        &self,
        spec: &'a MediaTypeSpec,
        schema_validator: SchemaValidator<'a>,
        body: &HttpBody,
    ) -> Result<Vec<Violation>, ContractError>;
}

/// Validates JSON bodies; claims every media type containing `json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonContentValidator;

impl ContentValidator for JsonContentValidator {
    fn can_validate(&self, media_type: &str) -> bool {
        media_type.contains("json")
    }

    fn validate<'a>(
        &self,
        spec: &'a MediaTypeSpec,
        schema_validator: SchemaValidator<'a>,
        body: &HttpBody,
    ) -> Result<Vec<Violation>, ContractError> {
        let schema = match &spec.schema {
            Some(schema) => schema,
            None => return Ok(Vec::new()),
        };

        let value = match body.parse_json() {
            Ok(value) => value,
            Err(e) => {
                return Ok(vec![Violation::new(
                    ROOT_PATH,
                    ViolationKind::InvalidJson { reason: e.to_string() },
                )])
            }
        };

        Ok(schema_validator.validate(schema, &value)?.violations)
    }
}

/// Validators installed on a new runner
pub fn default_content_validators() -> Vec<Box<dyn ContentValidator>> {
    vec![Box::new(JsonContentValidator)]
}

/// Validate a body against declared content.
///
/// An undeclared media type is a violation; a declared one that no validator claims
/// is accepted unchecked. Every claiming validator runs and their violations aggregate.
pub fn validate_content<'a>(
    content: &'a BTreeMap<String, MediaTypeSpec>,
    body: &HttpBody,
    schema_validator: SchemaValidator<'a>,
    validators: &[Box<dyn ContentValidator>],
) -> Result<Vec<Violation>, ContractError> {
    let media_type = body.media_type();

    let spec = match content
        .iter()
        .find(|(declared, _)| normalize_media_type(declared) == media_type)
    {
        Some((_, spec)) => spec,
        None => {
            return Ok(vec![Violation::new(
                "body",
                ViolationKind::UnspecifiedMediaType { media_type },
            )])
        }
    };

    let mut violations = Vec::new();
    let mut claimed = false;
    for validator in validators.iter().filter(|v| v.can_validate(&media_type)) {
        claimed = true;
        violations.extend(validator.validate(spec, schema_validator, body)?);
    }

    if !claimed {
        debug!("No content validator claims '{}', body accepted unchecked", media_type);
    }

    Ok(violations)
}
