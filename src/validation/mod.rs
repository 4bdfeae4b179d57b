pub mod violation;
pub mod schema_validator;
pub mod parameter_validator;
pub mod content_validator;
pub mod request_validator;
pub mod response_validator;

pub use violation::{Violation, ViolationKind, ViolationReport, ValidationResult};
pub use schema_validator::SchemaValidator;
pub use parameter_validator::{ParameterValidator, ParameterValues};
pub use content_validator::{ContentValidator, JsonContentValidator, default_content_validators};
pub use request_validator::{RequestValidator, SecurityParameterSource};
pub use response_validator::ResponseValidator;
