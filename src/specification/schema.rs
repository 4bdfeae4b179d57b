use crate::specification::model_registry::Reference;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Structural type description used to validate JSON values and parameter strings.
///
/// A `Reference` node carries nothing but the pointer; it is resolved lazily against
/// the owning document by [`crate::specification::ReferenceResolver`]. The wire form is
/// the flat OpenAPI schema object (`{"type": "object", "properties": {...}}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaRepr", into = "SchemaRepr")]
pub enum Schema {
    Reference(Reference),
    Object(ObjectSchema),
    Array(ArraySchema),
    Scalar(ScalarSchema),
    /// Untyped node, accepts any value
    Any,
}

impl Schema {
    pub fn reference(schema_id: &str) -> Self {
        Schema::Reference(Reference::schema(schema_id))
    }

    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array(ArraySchema::new(items))
    }

    pub fn string() -> Self {
        Schema::Scalar(ScalarSchema::new(ScalarType::String))
    }

    pub fn number() -> Self {
        Schema::Scalar(ScalarSchema::new(ScalarType::Number))
    }

    pub fn integer() -> Self {
        Schema::Scalar(ScalarSchema::new(ScalarType::Integer))
    }

    pub fn boolean() -> Self {
        Schema::Scalar(ScalarSchema::new(ScalarType::Boolean))
    }

    /// Name of the declared type, as used in diagnostics
    pub fn type_name(&self) -> &str {
        match self {
            Schema::Reference(_) => "$ref",
            Schema::Object(_) => "object",
            Schema::Array(_) => "array",
            Schema::Scalar(scalar) => scalar.scalar_type.as_str(),
            Schema::Any => "any",
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Schema::Reference(_))
    }
}

impl Default for Schema {
    fn default() -> Self {
        Schema::Any
    }
}

/// Object node: declared properties plus the set of required names
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub properties: BTreeMap<String, Schema>,
    pub required: BTreeSet<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, name: &str, schema: Schema) -> Self {
        self.properties.insert(name.to_string(), schema);
        self
    }

    pub fn with_required_property(mut self, name: &str, schema: Schema) -> Self {
        self.required.insert(name.to_string());
        self.with_property(name, schema)
    }

    pub fn with_required(mut self, name: &str) -> Self {
        self.required.insert(name.to_string());
        self
    }

    pub fn is_property_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Schema::Object(object)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: Box<Schema>,
}

impl ArraySchema {
    pub fn new(items: Schema) -> Self {
        Self { items: Box::new(items) }
    }
}

impl From<ArraySchema> for Schema {
    fn from(array: ArraySchema) -> Self {
        Schema::Array(array)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ScalarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Number => "number",
            ScalarType::Integer => "integer",
            ScalarType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScalarType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ScalarType::String),
            "number" => Ok(ScalarType::Number),
            "integer" => Ok(ScalarType::Integer),
            "boolean" => Ok(ScalarType::Boolean),
            other => Err(format!("unsupported scalar type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSchema {
    pub scalar_type: ScalarType,
    /// Carried for publication, not enforced
    pub format: Option<String>,
    pub rules: ValidationRules,
}

impl ScalarSchema {
    pub fn new(scalar_type: ScalarType) -> Self {
        Self {
            scalar_type,
            format: None,
            rules: ValidationRules::default(),
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }
}

impl From<ScalarSchema> for Schema {
    fn from(scalar: ScalarSchema) -> Self {
        Schema::Scalar(scalar)
    }
}

/// Value constraints for scalar nodes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationRules {
    pub enum_values: Option<Vec<Value>>,
    pub pattern: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl ValidationRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_length_range(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn with_numeric_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.minimum = min;
        self.maximum = max;
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaRepr {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    schema_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<BTreeMap<String, Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    required: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Box<Schema>>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    maximum: Option<f64>,
}

impl TryFrom<SchemaRepr> for Schema {
    type Error = String;

    fn try_from(repr: SchemaRepr) -> Result<Self, Self::Error> {
        if let Some(pointer) = repr.reference {
            return Reference::parse(&pointer).map(Schema::Reference);
        }

        let schema_type = match repr.schema_type.as_deref() {
            Some(schema_type) => schema_type,
            None if repr.properties.is_some() => "object",
            None if repr.items.is_some() => "array",
            None => return Ok(Schema::Any),
        };

        match schema_type {
            "object" => Ok(Schema::Object(ObjectSchema {
                properties: repr.properties.unwrap_or_default(),
                required: repr.required.unwrap_or_default(),
            })),
            "array" => Ok(Schema::Array(ArraySchema {
                items: repr.items.unwrap_or_default(),
            })),
            other => {
                let scalar_type = other.parse::<ScalarType>()?;
                Ok(Schema::Scalar(ScalarSchema {
                    scalar_type,
                    format: repr.format,
                    rules: ValidationRules {
                        enum_values: repr.enum_values,
                        pattern: repr.pattern,
                        min_length: repr.min_length,
                        max_length: repr.max_length,
                        minimum: repr.minimum,
                        maximum: repr.maximum,
                    },
                }))
            }
        }
    }
}

impl From<Schema> for SchemaRepr {
    fn from(schema: Schema) -> Self {
        match schema {
            Schema::Reference(reference) => SchemaRepr {
                reference: Some(reference.pointer()),
                ..Default::default()
            },
            Schema::Object(object) => SchemaRepr {
                schema_type: Some("object".to_string()),
                properties: Some(object.properties),
                required: (!object.required.is_empty()).then_some(object.required),
                ..Default::default()
            },
            Schema::Array(array) => SchemaRepr {
                schema_type: Some("array".to_string()),
                items: Some(array.items),
                ..Default::default()
            },
            Schema::Scalar(scalar) => SchemaRepr {
                schema_type: Some(scalar.scalar_type.as_str().to_string()),
                format: scalar.format,
                enum_values: scalar.rules.enum_values,
                pattern: scalar.rules.pattern,
                min_length: scalar.rules.min_length,
                max_length: scalar.rules.max_length,
                minimum: scalar.rules.minimum,
                maximum: scalar.rules.maximum,
                ..Default::default()
            },
            Schema::Any => SchemaRepr::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_schema() -> Schema {
        Schema::object()
            .with_property("id", Schema::number())
            .with_required_property("name", Schema::string())
            .into()
    }

    #[test]
    fn test_object_schema_wire_shape() {
        let value = serde_json::to_value(product_schema()).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "number" },
                    "name": { "type": "string" }
                },
                "required": ["name"]
            })
        );
    }

    #[test]
    fn test_reference_wire_shape() {
        let schema = Schema::array(Schema::reference("product"));
        let value = serde_json::to_value(&schema).unwrap();

        assert_eq!(
            value,
            json!({ "type": "array", "items": { "$ref": "#/components/schemas/product" } })
        );
    }

    #[test]
    fn test_parse_flat_schema() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "string",
            "minLength": 2,
            "enum": ["a", "bb"]
        }))
        .unwrap();

        match schema {
            Schema::Scalar(scalar) => {
                assert_eq!(scalar.scalar_type, ScalarType::String);
                assert_eq!(scalar.rules.min_length, Some(2));
                assert_eq!(scalar.rules.enum_values.as_ref().map(Vec::len), Some(2));
            }
            other => panic!("expected scalar schema, got {:?}", other),
        }
    }

    #[test]
    fn test_untyped_schema_is_any() {
        let schema: Schema = serde_json::from_value(json!({})).unwrap();
        assert_eq!(schema, Schema::Any);

        let inferred: Schema = serde_json::from_value(json!({ "properties": { "a": {} } })).unwrap();
        assert_eq!(inferred.type_name(), "object");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = serde_json::from_value::<Schema>(json!({ "type": "file" }));
        assert!(result.is_err());
    }
}
