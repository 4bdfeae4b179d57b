use crate::error::ContractError;
use crate::protocol::{HeaderMap, HttpRequest};
use crate::specification::model_registry::{ContractDocument, Parameter, ParameterLocation};
use crate::specification::reference_resolver::ReferenceResolver;
use crate::specification::schema::{ScalarType, Schema};
use crate::utils::UriUtils;
use crate::validation::schema_validator::check_rules;
use crate::validation::violation::{Violation, ViolationKind};
use log::debug;
use serde_json::{Number, Value};
use std::collections::HashMap;

/// Actual parameter values of one HTTP message.
///
/// Path and query names are case-sensitive; header names are not, and multi-valued
/// headers read back joined with a comma.
#[derive(Debug, Clone, Default)]
pub struct ParameterValues {
    path: HashMap<String, String>,
    query: HashMap<String, String>,
    headers: HeaderMap,
}

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values of a request whose path variables were extracted by template matching
    pub fn from_request(request: &HttpRequest, path_values: HashMap<String, String>) -> Self {
        Self {
            path: path_values,
            query: request.query().map(UriUtils::parse_query).unwrap_or_default(),
            headers: request.headers.clone(),
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            headers: headers.clone(),
            ..Default::default()
        }
    }

    pub fn with_path_value(mut self, name: &str, value: &str) -> Self {
        self.path.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_query_value(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn get(&self, location: ParameterLocation, name: &str) -> Option<String> {
        match location {
            ParameterLocation::Path => self.path.get(name).cloned(),
            ParameterLocation::Query => self.query.get(name).cloned(),
            ParameterLocation::Header => self.headers.get(name),
        }
    }
}

/// Checks presence and scalar type of declared parameters
#[derive(Debug, Clone, Copy)]
pub struct ParameterValidator<'a> {
    resolver: ReferenceResolver<'a>,
}

impl<'a> ParameterValidator<'a> {
    pub fn new(document: &'a ContractDocument) -> Self {
        Self::with_resolver(ReferenceResolver::new(document))
    }

    pub fn with_resolver(resolver: ReferenceResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Validate every parameter spec against the actual values, collecting all violations
    pub fn validate(
        &self,
        parameters: &[&'a Parameter],
        values: &ParameterValues,
    ) -> Result<Vec<Violation>, ContractError> {
        let mut violations = Vec::new();

        for parameter in parameters {
            self.validate_parameter(parameter, values, &mut violations)?;
        }

        debug!(
            "Validated {} parameter(s), {} violation(s)",
            parameters.len(),
            violations.len()
        );
        Ok(violations)
    }

    fn validate_parameter(
        &self,
        parameter: &'a Parameter,
        values: &ParameterValues,
        violations: &mut Vec<Violation>,
    ) -> Result<(), ContractError> {
        let location = format!("{}.{}", parameter.location, parameter.name);

        let raw = match values.get(parameter.location, &parameter.name) {
            Some(raw) => raw,
            None => {
                if parameter.is_required() {
                    violations.push(Violation::new(
                        &location,
                        ViolationKind::MissingRequiredParameter {
                            name: parameter.name.clone(),
                        },
                    ));
                }
                return Ok(());
            }
        };

        let schema = match &parameter.schema {
            Some(schema) => self.resolver.resolve_schema(schema)?,
            None => return Ok(()),
        };

        // Object, array and untyped parameters are not coerced
        let scalar = match schema {
            Schema::Scalar(scalar) => scalar,
            _ => return Ok(()),
        };

        match Self::coerce(scalar.scalar_type, &raw) {
            Some(typed) => check_rules(&scalar.rules, &typed, &location, violations),
            None => {
                violations.push(Violation::new(
                    &location,
                    ViolationKind::ParameterTypeMismatch {
                        name: parameter.name.clone(),
                        expected: scalar.scalar_type.as_str().to_string(),
                        actual: raw,
                    },
                ));
                Ok(())
            }
        }
    }

    /// Parse a raw parameter string as the declared scalar type
    pub fn coerce(scalar_type: ScalarType, raw: &str) -> Option<Value> {
        match scalar_type {
            ScalarType::String => Some(Value::String(raw.to_string())),
            ScalarType::Integer => raw.parse::<i64>().ok().map(Value::from),
            ScalarType::Number => match raw.parse::<i64>() {
                Ok(integer) => Some(Value::from(integer)),
                Err(_) => raw
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number),
            },
            ScalarType::Boolean => {
                if raw.eq_ignore_ascii_case("true") {
                    Some(Value::Bool(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Some(Value::Bool(false))
                } else {
                    None
                }
            }
        }
    }
}
