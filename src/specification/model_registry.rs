use crate::protocol::HttpMethod;
use crate::specification::schema::Schema;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Contract document for one API group (OpenAPI 3.0 shape)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractDocument {
    /// Document format version
    #[serde(default = "default_openapi_version")]
    pub openapi: String,

    /// Title and version of the described API
    pub info: Info,

    /// Path templates in declaration order
    #[serde(default)]
    pub paths: Paths,

    /// Reusable schemas, parameters and request bodies (optional)
    #[serde(default, skip_serializing_if = "Components::is_empty")]
    pub components: Components,
}

fn default_openapi_version() -> String {
    "3.0.1".to_string()
}

impl ContractDocument {
    /// Create an empty document
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            openapi: default_openapi_version(),
            info: Info {
                title: title.to_string(),
                version: version.to_string(),
                description: None,
            },
            paths: Paths::new(),
            components: Components::default(),
        }
    }

    /// Add a reusable schema under `#/components/schemas/<name>`
    pub fn with_schema(mut self, name: &str, schema: Schema) -> Self {
        self.add_schema(name, schema);
        self
    }

    pub fn add_schema(&mut self, name: &str, schema: Schema) {
        self.components.schemas.insert(name.to_string(), schema);
    }

    pub fn add_parameter(&mut self, name: &str, parameter: Parameter) {
        self.components.parameters.insert(name.to_string(), parameter);
    }

    pub fn add_request_body(&mut self, name: &str, request_body: RequestBody) {
        self.components.request_bodies.insert(name.to_string(), request_body);
    }

    /// Insert or replace a path item, returning the previous one
    pub fn add_path(&mut self, path_template: &str, path_item: PathItem) -> Option<PathItem> {
        self.paths.insert(path_template, path_item)
    }

    pub fn path(&self, path_template: &str) -> Option<&PathItem> {
        self.paths.get(path_template)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Insertion-ordered mapping of path template to path item.
/// Re-inserting an existing template replaces the item in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paths {
    entries: Vec<(String, PathItem)>,
}

impl Paths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path_template: &str, path_item: PathItem) -> Option<PathItem> {
        match self.entries.iter_mut().find(|(template, _)| template == path_template) {
            Some((_, existing)) => Some(std::mem::replace(existing, path_item)),
            None => {
                self.entries.push((path_template.to_string(), path_item));
                None
            }
        }
    }

    pub fn get(&self, path_template: &str) -> Option<&PathItem> {
        self.entries
            .iter()
            .find(|(template, _)| template == path_template)
            .map(|(_, item)| item)
    }

    pub fn contains(&self, path_template: &str) -> bool {
        self.get(path_template).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathItem)> {
        self.entries.iter().map(|(template, item)| (template.as_str(), item))
    }

    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(template, _)| template.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Paths {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (template, item) in &self.entries {
            map.serialize_entry(template, item)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Paths {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathsVisitor;

        impl<'de> Visitor<'de> for PathsVisitor {
            type Value = Paths;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of path templates to path items")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Paths, A::Error> {
                let mut paths = Paths::new();
                while let Some((template, item)) = access.next_entry::<String, PathItem>()? {
                    paths.insert(&template, item);
                }
                Ok(paths)
            }
        }

        deserializer.deserialize_map(PathsVisitor)
    }
}

/// Operations bound to one path template, plus parameters shared by all of them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(try_from = "PathItemRepr")]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parameters applying to every operation on the path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Referable<Parameter>>,

    /// At most one operation per method
    #[serde(flatten)]
    pub operations: BTreeMap<HttpMethod, Operation>,
}

impl PathItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(Referable::Item(parameter));
        self
    }

    pub fn with_parameter_ref(mut self, component_name: &str) -> Self {
        self.parameters.push(Referable::Reference(Reference::parameter(component_name)));
        self
    }

    /// Bind an operation to a method, replacing any previous one
    pub fn with_operation(mut self, method: HttpMethod, operation: Operation) -> Self {
        self.operations.insert(method, operation);
        self
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.operations.get(&method)
    }
}

/// Wire form of a path item. Keys other than the declared fields are operations
/// when they name a method; extensions (`x-...`), `servers` and `$ref` are skipped.
#[derive(Deserialize)]
struct PathItemRepr {
    #[serde(default)]
    summary: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    parameters: Vec<Referable<Parameter>>,

    #[serde(flatten)]
    other: BTreeMap<String, serde_json::Value>,
}

impl TryFrom<PathItemRepr> for PathItem {
    type Error = String;

    fn try_from(repr: PathItemRepr) -> Result<Self, Self::Error> {
        let mut operations = BTreeMap::new();
        for (key, value) in repr.other {
            let method = match HttpMethod::deserialize(serde_json::Value::String(key.clone())) {
                Ok(method) => method,
                Err(_) => continue,
            };
            let operation = serde_json::from_value::<Operation>(value)
                .map_err(|e| format!("Invalid '{}' operation: {}", key, e))?;
            operations.insert(method, operation);
        }

        Ok(Self {
            summary: repr.summary,
            description: repr.description,
            parameters: repr.parameters,
            operations,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Referable<Parameter>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Referable<RequestBody>>,

    /// Keyed by exact 3-digit status code
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_operation_id(mut self, operation_id: &str) -> Self {
        self.operation_id = Some(operation_id.to_string());
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(Referable::Item(parameter));
        self
    }

    pub fn with_parameter_ref(mut self, component_name: &str) -> Self {
        self.parameters.push(Referable::Reference(Reference::parameter(component_name)));
        self
    }

    pub fn with_request_body(mut self, request_body: RequestBody) -> Self {
        self.request_body = Some(Referable::Item(request_body));
        self
    }

    pub fn with_request_body_ref(mut self, component_name: &str) -> Self {
        self.request_body = Some(Referable::Reference(Reference::request_body(component_name)));
        self
    }

    pub fn with_response(mut self, status_code: &str, response: Response) -> Self {
        self.responses.insert(status_code.to_string(), response);
        self
    }

    pub fn response(&self, status_code: &str) -> Option<&Response> {
        self.responses.get(status_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl Parameter {
    pub fn new(name: &str, location: ParameterLocation) -> Self {
        Self {
            name: name.to_string(),
            location,
            required: false,
            description: None,
            schema: None,
        }
    }

    /// Path parameter, declared required as the wire format expects
    pub fn path(name: &str) -> Self {
        Self::new(name, ParameterLocation::Path).required()
    }

    pub fn query(name: &str) -> Self {
        Self::new(name, ParameterLocation::Query)
    }

    pub fn header(name: &str) -> Self {
        Self::new(name, ParameterLocation::Header)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Path parameters are required whatever the declared flag says
    pub fn is_required(&self) -> bool {
        self.required || self.location == ParameterLocation::Path
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub content: BTreeMap<String, MediaTypeSpec>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
}

impl RequestBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body declared as `application/json` with the given schema
    pub fn json(schema: Schema) -> Self {
        Self::new().with_content("application/json", MediaTypeSpec::new(schema))
    }

    pub fn with_content(mut self, media_type: &str, spec: MediaTypeSpec) -> Self {
        self.content.insert(media_type.to_string(), spec);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(try_from = "ResponseRepr")]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, HeaderSpec>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaTypeSpec>,
}

impl Response {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, header: HeaderSpec) -> Self {
        self.headers.insert(name.to_string(), header);
        self
    }

    pub fn with_content(mut self, media_type: &str, spec: MediaTypeSpec) -> Self {
        self.content.insert(media_type.to_string(), spec);
        self
    }

    pub fn with_json_content(self, schema: Schema) -> Self {
        self.with_content("application/json", MediaTypeSpec::new(schema))
    }

    pub fn required_headers(&self) -> impl Iterator<Item = &str> {
        self.headers
            .iter()
            .filter(|(_, header)| header.required)
            .map(|(name, _)| name.as_str())
    }
}

/// Wire form of a response; `$ref` is recognised only to be refused, since
/// response components are not part of the contract model
#[derive(Deserialize)]
struct ResponseRepr {
    #[serde(rename = "$ref", default)]
    reference: Option<String>,

    #[serde(default)]
    description: String,

    #[serde(default)]
    headers: BTreeMap<String, HeaderSpec>,

    #[serde(default)]
    content: BTreeMap<String, MediaTypeSpec>,
}

impl TryFrom<ResponseRepr> for Response {
    type Error = String;

    fn try_from(repr: ResponseRepr) -> Result<Self, Self::Error> {
        if let Some(reference) = repr.reference {
            return Err(format!(
                "Response reference '{}' is not supported, declare the response inline",
                reference
            ));
        }

        Ok(Self {
            description: repr.description,
            headers: repr.headers,
            content: repr.content,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HeaderSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl HeaderSpec {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Default::default()
        }
    }

    pub fn optional() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MediaTypeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl MediaTypeSpec {
    pub fn new(schema: Schema) -> Self {
        Self { schema: Some(schema) }
    }

    /// Media type with no schema, accepted unchecked
    pub fn untyped() -> Self {
        Self { schema: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, Schema>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Parameter>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub request_bodies: BTreeMap<String, RequestBody>,
}

impl Components {
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty() && self.parameters.is_empty() && self.request_bodies.is_empty()
    }
}

/// Component section a reference points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Schema,
    Parameter,
    RequestBody,
}

impl ReferenceKind {
    pub fn component_section(&self) -> &'static str {
        match self {
            ReferenceKind::Schema => "schemas",
            ReferenceKind::Parameter => "parameters",
            ReferenceKind::RequestBody => "requestBodies",
        }
    }
}

const COMPONENTS_PREFIX: &str = "#/components/";

/// `(kind, id)` pointer into the document's components
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ReferenceRepr", into = "ReferenceRepr")]
pub struct Reference {
    pub kind: ReferenceKind,
    pub id: String,
}

impl Reference {
    pub fn new(kind: ReferenceKind, id: &str) -> Self {
        Self { kind, id: id.to_string() }
    }

    pub fn schema(id: &str) -> Self {
        Self::new(ReferenceKind::Schema, id)
    }

    pub fn parameter(id: &str) -> Self {
        Self::new(ReferenceKind::Parameter, id)
    }

    pub fn request_body(id: &str) -> Self {
        Self::new(ReferenceKind::RequestBody, id)
    }

    /// Local JSON pointer form, e.g. `#/components/schemas/product`
    pub fn pointer(&self) -> String {
        format!("{}{}/{}", COMPONENTS_PREFIX, self.kind.component_section(), self.id)
    }

    pub fn parse(pointer: &str) -> Result<Self, String> {
        let rest = pointer
            .strip_prefix(COMPONENTS_PREFIX)
            .ok_or_else(|| format!("Unsupported reference '{}': only local component references are allowed", pointer))?;

        let (section, id) = rest
            .split_once('/')
            .ok_or_else(|| format!("Malformed reference '{}'", pointer))?;

        if id.is_empty() || id.contains('/') {
            return Err(format!("Malformed reference '{}'", pointer));
        }

        let kind = match section {
            "schemas" => ReferenceKind::Schema,
            "parameters" => ReferenceKind::Parameter,
            "requestBodies" => ReferenceKind::RequestBody,
            other => return Err(format!("Unsupported component section '{}' in '{}'", other, pointer)),
        };

        Ok(Self::new(kind, id))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pointer())
    }
}

#[derive(Serialize, Deserialize)]
struct ReferenceRepr {
    #[serde(rename = "$ref")]
    reference: String,
}

impl TryFrom<ReferenceRepr> for Reference {
    type Error = String;

    fn try_from(repr: ReferenceRepr) -> Result<Self, Self::Error> {
        Reference::parse(&repr.reference)
    }
}

impl From<Reference> for ReferenceRepr {
    fn from(reference: Reference) -> Self {
        Self { reference: reference.pointer() }
    }
}

/// Either an inline item or a `$ref` to a component of the same kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Referable<T> {
    Reference(Reference),
    Item(T),
}

impl<T> From<T> for Referable<T> {
    fn from(item: T) -> Self {
        Referable::Item(item)
    }
}
