pub mod model_registry;
pub mod schema;
pub mod document_registry;
pub mod document_parser;
pub mod reference_resolver;
pub mod route_resolver;

pub use model_registry::{
    ContractDocument, Info, Paths, PathItem, Operation, Parameter, ParameterLocation,
    RequestBody, Response, HeaderSpec, MediaTypeSpec, Components,
    Reference, ReferenceKind, Referable
};
pub use schema::{Schema, ObjectSchema, ArraySchema, ScalarSchema, ScalarType, ValidationRules};
pub use document_registry::DocumentRegistry;
pub use document_parser::DocumentParser;
pub use reference_resolver::ReferenceResolver;
pub use route_resolver::{RouteResolver, ResolvedOperation, PathTemplate, TemplateSegment};
