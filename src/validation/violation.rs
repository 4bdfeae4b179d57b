use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// What contract clause was not satisfied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ViolationKind {
    MissingRequiredParameter { name: String },
    ParameterTypeMismatch { name: String, expected: String, actual: String },
    MissingRequiredHeader { name: String },
    MissingRequiredProperty { property: String },
    TypeMismatch { expected: String, actual: String },
    NotInEnum { allowed: Vec<Value>, actual: Value },
    ConstraintViolated { constraint: String, expected: String, actual: Value },
    RequiredContentMissing,
    UnspecifiedMediaType { media_type: String },
    InvalidJson { reason: String },
}

/// One structured record of a failed contract clause.
///
/// `location` is a breadcrumb: `query.pageNo` / `header.X-Id` for parameters,
/// `$.items[2].name` for JSON payloads, `body` for content-level failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub location: String,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(location: &str, kind: ViolationKind) -> Self {
        Self {
            location: location.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::MissingRequiredParameter { name } => {
                write!(f, "Required parameter '{}' is not present", name)
            }
            ViolationKind::ParameterTypeMismatch { name, expected, .. } => {
                write!(f, "Parameter '{}' is not of type '{}'", name, expected)
            }
            ViolationKind::MissingRequiredHeader { name } => {
                write!(f, "Required header '{}' is not present", name)
            }
            ViolationKind::MissingRequiredProperty { property } => {
                write!(f, "{}: required property '{}' is not present", self.location, property)
            }
            ViolationKind::TypeMismatch { expected, actual } => {
                write!(f, "{}: expected {} but found {}", self.location, expected, actual)
            }
            ViolationKind::NotInEnum { allowed, actual } => {
                let allowed: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                write!(
                    f,
                    "{}: value {} is not one of [{}]",
                    self.location,
                    actual,
                    allowed.join(", ")
                )
            }
            ViolationKind::ConstraintViolated { constraint, expected, actual } => {
                write!(
                    f,
                    "{}: {} violated (expected {}, actual {})",
                    self.location, constraint, expected, actual
                )
            }
            ViolationKind::RequiredContentMissing => write!(f, "Required content is not present"),
            ViolationKind::UnspecifiedMediaType { media_type } => {
                write!(f, "Content media type '{}' is not specified", media_type)
            }
            ViolationKind::InvalidJson { reason } => write!(f, "Content is not valid JSON: {}", reason),
        }
    }
}

/// Every violation found by one validation phase
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViolationReport {
    violations: Vec<Violation>,
}

impl ViolationReport {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ViolationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl From<Vec<Violation>> for ViolationReport {
    fn from(violations: Vec<Violation>) -> Self {
        Self::new(violations)
    }
}

/// Outcome of validating one value against one schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,

    /// Empty when valid
    pub violations: Vec<Violation>,

    /// Time taken in milliseconds
    pub validation_time: f64,

    /// Number of schema nodes visited
    pub fields_validated: usize,
}
