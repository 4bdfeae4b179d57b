use crate::error::ContractError;
use crate::specification::model_registry::ContractDocument;
use crate::specification::reference_resolver::ReferenceResolver;
use crate::specification::schema::{ObjectSchema, ScalarType, Schema, ValidationRules};
use crate::validation::violation::{ValidationResult, Violation, ViolationKind};
use log::debug;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Instant;

/// Breadcrumb of the root of a JSON payload
pub const ROOT_PATH: &str = "$";

/// Recursive validator for JSON values against schema nodes of one document.
///
/// Violations accumulate with their breadcrumb so a malformed payload reports every
/// failing clause at once. Resolution failures (dangling or circular references, bad
/// patterns) are configuration errors and abort the walk with `Err`.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator<'a> {
    resolver: ReferenceResolver<'a>,
}

#[derive(Default)]
struct Walk {
    violations: Vec<Violation>,
    fields_validated: usize,
    patterns: PatternCache,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(document: &'a ContractDocument) -> Self {
        Self::with_resolver(ReferenceResolver::new(document))
    }

    pub fn with_resolver(resolver: ReferenceResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Validate a JSON payload, reporting breadcrumbs from `$`
    pub fn validate(&self, schema: &'a Schema, value: &Value) -> Result<ValidationResult, ContractError> {
        self.validate_at(schema, value, ROOT_PATH)
    }

    /// Validate a value whose breadcrumbs start at `location`
    pub fn validate_at(
        &self,
        schema: &'a Schema,
        value: &Value,
        location: &str,
    ) -> Result<ValidationResult, ContractError> {
        let start_time = Instant::now();
        let mut walk = Walk::default();

        self.validate_value(schema, value, location, &mut walk)?;

        let validation_time = start_time.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "Validated {} schema node(s) at '{}' in {:.3}ms, {} violation(s)",
            walk.fields_validated,
            location,
            validation_time,
            walk.violations.len()
        );

        Ok(ValidationResult {
            valid: walk.violations.is_empty(),
            violations: walk.violations,
            validation_time,
            fields_validated: walk.fields_validated,
        })
    }

    fn validate_value(
        &self,
        schema: &'a Schema,
        value: &Value,
        field_path: &str,
        walk: &mut Walk,
    ) -> Result<(), ContractError> {
        let schema = self.resolver.resolve_schema(schema)?;
        walk.fields_validated += 1;

        match schema {
            Schema::Object(object) => match value {
                Value::Object(fields) => self.validate_object(object, fields, field_path, walk),
                other => {
                    walk.violations.push(type_mismatch(field_path, "object", other));
                    Ok(())
                }
            },
            Schema::Array(array) => match value {
                Value::Array(items) => {
                    for (index, item) in items.iter().enumerate() {
                        let item_path = format!("{}[{}]", field_path, index);
                        self.validate_value(&array.items, item, &item_path, walk)?;
                    }
                    Ok(())
                }
                other => {
                    walk.violations.push(type_mismatch(field_path, "array", other));
                    Ok(())
                }
            },
            Schema::Scalar(scalar) => {
                if matches_scalar_type(scalar.scalar_type, value) {
                    check_rules_with(
                        &scalar.rules,
                        value,
                        field_path,
                        &mut walk.violations,
                        &mut walk.patterns,
                    )
                } else {
                    walk.violations
                        .push(type_mismatch(field_path, scalar.scalar_type.as_str(), value));
                    Ok(())
                }
            }
            // resolve_schema never yields a reference
            Schema::Any | Schema::Reference(_) => Ok(()),
        }
    }

    fn validate_object(
        &self,
        object: &'a ObjectSchema,
        fields: &Map<String, Value>,
        field_path: &str,
        walk: &mut Walk,
    ) -> Result<(), ContractError> {
        for name in &object.required {
            if !fields.contains_key(name) {
                walk.violations.push(Violation::new(
                    &property_path(field_path, name),
                    ViolationKind::MissingRequiredProperty {
                        property: name.clone(),
                    },
                ));
            }
        }

        // Undeclared properties are permitted
        for (name, field_value) in fields {
            if let Some(property_schema) = object.properties.get(name) {
                self.validate_value(property_schema, field_value, &property_path(field_path, name), walk)?;
            }
        }

        Ok(())
    }
}

fn property_path(parent: &str, name: &str) -> String {
    format!("{}.{}", parent, name)
}

fn type_mismatch(field_path: &str, expected: &str, actual: &Value) -> Violation {
    Violation::new(
        field_path,
        ViolationKind::TypeMismatch {
            expected: expected.to_string(),
            actual: json_type_name(actual).to_string(),
        },
    )
}

/// Runtime kind of a JSON value, as named in diagnostics
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `integer` accepts any JSON number with a zero fractional part
pub fn matches_scalar_type(scalar_type: ScalarType, value: &Value) -> bool {
    match (scalar_type, value) {
        (ScalarType::String, Value::String(_)) => true,
        (ScalarType::Number, Value::Number(_)) => true,
        (ScalarType::Integer, Value::Number(number)) => {
            number.is_i64()
                || number.is_u64()
                || number.as_f64().map_or(false, |f| f.is_finite() && f.fract() == 0.0)
        }
        (ScalarType::Boolean, Value::Bool(_)) => true,
        _ => false,
    }
}

/// Compiled `pattern` rules keyed by their source, so a rule shared by many
/// values (array items, repeated objects) compiles once per walk
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: HashMap<String, Regex>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiled regex for `pattern`; an invalid pattern is a document error
    pub fn compile(&mut self, pattern: &str, field_path: &str) -> Result<&Regex, ContractError> {
        match self.compiled.entry(pattern.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let regex = Regex::new(pattern).map_err(|e| {
                    ContractError::InvalidDocument(format!("Invalid pattern '{}' at {}: {}", pattern, field_path, e))
                })?;
                Ok(entry.insert(regex))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

/// Check a value of the right scalar kind against its enum, length, pattern and
/// range rules
pub fn check_rules(
    rules: &ValidationRules,
    value: &Value,
    field_path: &str,
    violations: &mut Vec<Violation>,
) -> Result<(), ContractError> {
    check_rules_with(rules, value, field_path, violations, &mut PatternCache::new())
}

/// As [`check_rules`], reusing patterns already compiled in `patterns`
pub fn check_rules_with(
    rules: &ValidationRules,
    value: &Value,
    field_path: &str,
    violations: &mut Vec<Violation>,
    patterns: &mut PatternCache,
) -> Result<(), ContractError> {
    if let Some(allowed) = &rules.enum_values {
        if !allowed.contains(value) {
            violations.push(Violation::new(
                field_path,
                ViolationKind::NotInEnum {
                    allowed: allowed.clone(),
                    actual: value.clone(),
                },
            ));
        }
    }

    match value {
        Value::String(text) => check_string_rules(rules, text, field_path, violations, patterns),
        Value::Number(number) => {
            if let Some(actual) = number.as_f64() {
                check_numeric_rules(rules, actual, value, field_path, violations);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn check_string_rules(
    rules: &ValidationRules,
    text: &str,
    field_path: &str,
    violations: &mut Vec<Violation>,
    patterns: &mut PatternCache,
) -> Result<(), ContractError> {
    let length = text.chars().count();

    if let Some(min_length) = rules.min_length {
        if length < min_length {
            violations.push(constraint_violated(field_path, "minLength", min_length, Value::from(length)));
        }
    }

    if let Some(max_length) = rules.max_length {
        if length > max_length {
            violations.push(constraint_violated(field_path, "maxLength", max_length, Value::from(length)));
        }
    }

    if let Some(pattern) = &rules.pattern {
        if !patterns.compile(pattern, field_path)?.is_match(text) {
            violations.push(constraint_violated(
                field_path,
                "pattern",
                pattern,
                Value::String(text.to_string()),
            ));
        }
    }

    Ok(())
}

fn check_numeric_rules(
    rules: &ValidationRules,
    actual: f64,
    value: &Value,
    field_path: &str,
    violations: &mut Vec<Violation>,
) {
    if let Some(minimum) = rules.minimum {
        if actual < minimum {
            violations.push(constraint_violated(field_path, "minimum", minimum, value.clone()));
        }
    }

    if let Some(maximum) = rules.maximum {
        if actual > maximum {
            violations.push(constraint_violated(field_path, "maximum", maximum, value.clone()));
        }
    }
}

fn constraint_violated(
    field_path: &str,
    constraint: &str,
    expected: impl ToString,
    actual: Value,
) -> Violation {
    Violation::new(
        field_path,
        ViolationKind::ConstraintViolated {
            constraint: constraint.to_string(),
            expected: expected.to_string(),
            actual,
        },
    )
}
