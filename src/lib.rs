//! # RustApiContract
//!
//! Contract testing for HTTP APIs against OpenAPI-style documents.
//! Describe an endpoint once, then reuse the same contract to validate live
//! request/response traffic and to publish a canonical document per API group.
//!
//! ## Features
//!
//! - **Route Resolution**: REST path templates matched in declaration order
//! - **Reference Resolution**: lazy `$ref` lookup into document components
//! - **Parameter Validation**: presence and scalar type coercion for path, query and header values
//! - **Schema Validation**: recursive JSON checks with `$.items[2].name` breadcrumbs, all violations at once
//! - **Pluggable Content Validators**: strategies selected by media type
//! - **Export**: one `openapi.json` per group for publication
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rust_api_contract::prelude::*;
//! use async_trait::async_trait;
//!
//! struct Service;
//!
//! #[async_trait]
//! impl HttpClient for Service {
//!     async fn send(&self, _request: HttpRequest) -> std::result::Result<HttpResponse, anyhow::Error> {
//!         Ok(HttpResponse::new(200).with_json_body(&json!([{ "id": 1, "name": "Test product" }])))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let registry = DocumentRegistry::new().with_document(
//!         "v1",
//!         ContractDocument::new("V1 API", "V1").with_schema(
//!             "product",
//!             Schema::object()
//!                 .with_property("id", Schema::number())
//!                 .with_required_property("name", Schema::string())
//!                 .into(),
//!         ),
//!     )?;
//!
//!     let mut runner = ApiTestRunner::new(registry, ApiTestRunnerConfig::default())?;
//!     runner.describe(
//!         "v1",
//!         "/api/products",
//!         PathItem::new().with_operation(
//!             HttpMethod::Get,
//!             Operation::new()
//!                 .with_parameter(Parameter::query("pageNo").required().with_schema(Schema::number()))
//!                 .with_response(
//!                     "200",
//!                     Response::new("OK").with_json_content(Schema::array(Schema::reference("product"))),
//!                 ),
//!         ),
//!     )?;
//!
//!     let response = runner
//!         .test("v1", "200", HttpRequest::get("/api/products?pageNo=1"), &Service)
//!         .await?;
//!     println!("Contract satisfied with status {}", response.status);
//!
//!     Ok(())
//! }
//! ```

pub mod protocol;
pub mod specification;
pub mod validation;
pub mod runner;
pub mod config;
pub mod error;
pub mod utils;

// Protocol exports (HTTP message model and client seam)
pub use protocol::{HttpMethod, HeaderMap, HttpBody, HttpRequest, HttpResponse, HttpClient};

// Specification exports (contract document layer)
pub use specification::{
    ContractDocument, Info, Paths, PathItem, Operation, Parameter, ParameterLocation,
    RequestBody, Response, HeaderSpec, MediaTypeSpec, Components,
    Reference, ReferenceKind, Referable,
    Schema, ObjectSchema, ArraySchema, ScalarSchema, ScalarType, ValidationRules,
    DocumentRegistry, DocumentParser, ReferenceResolver, RouteResolver, ResolvedOperation, PathTemplate,
};

// Validation exports
pub use validation::{
    Violation, ViolationKind, ViolationReport, ValidationResult,
    SchemaValidator, ParameterValidator, ParameterValues,
    ContentValidator, JsonContentValidator,
    RequestValidator, ResponseValidator, SecurityParameterSource,
};

// Runner exports
pub use runner::ApiTestRunner;

// Configuration exports
pub use config::ApiTestRunnerConfig;

// Error exports
pub use error::{ContractError, ErrorKind};

// Result type alias
pub type Result<T> = std::result::Result<T, ContractError>;

// Re-export common dependencies for convenience
pub use serde::{Deserialize, Serialize};
pub use serde_json::{Value as JsonValue, json};

/// Prelude module for convenient importing
pub mod prelude {
    pub use crate::{
        ApiTestRunner, ApiTestRunnerConfig, DocumentRegistry, ContractDocument,
        PathItem, Operation, Parameter, RequestBody, Response, HeaderSpec, MediaTypeSpec,
        Schema, ValidationRules,
        HttpClient, HttpMethod, HttpRequest, HttpResponse, HttpBody,
        ContractError, Violation, ViolationKind, Result,
        Deserialize, Serialize, JsonValue, json,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
