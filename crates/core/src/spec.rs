//! OpenAPI document structs for serde deserialization.
//!
//! Only the subset of OpenAPI 3.x that affects generated types is modeled.
//! Every map is an [`IndexMap`] so that document order survives parsing; the
//! generator's output order is derived from it.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// HTTP verbs an OpenAPI path item may declare, lowercase as in the document.
pub const OPERATION_KEYS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Root OpenAPI document.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenApiSpec {
    #[serde(default)]
    pub openapi: Option<String>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    pub components: Option<Components>,
    /// The whole document, for `$ref`s that point outside `#/components`.
    #[serde(skip)]
    pub raw: Value,
}

/// Reusable objects addressed by internal `$ref`s.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,
    #[serde(default)]
    pub request_bodies: IndexMap<String, RequestBody>,
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// Either an inline object or a `$ref` to one under `#/components`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Item(T),
}

/// A path item. Operations are kept in declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "IndexMap<String, Value>")]
pub struct PathItem {
    /// `(method, operation)` pairs, method lowercase.
    pub operations: Vec<(String, Operation)>,
    /// Path-level parameters shared by all operations.
    pub parameters: Vec<RefOr<Parameter>>,
}

impl TryFrom<IndexMap<String, Value>> for PathItem {
    type Error = serde_json::Error;

    fn try_from(raw: IndexMap<String, Value>) -> Result<Self, Self::Error> {
        let mut item = PathItem::default();
        for (key, value) in raw {
            if key == "parameters" {
                item.parameters = serde_json::from_value(value)?;
            } else if OPERATION_KEYS.contains(&key.as_str()) {
                item.operations.push((key, serde_json::from_value(value)?));
            }
        }
        Ok(item)
    }
}

/// An API operation (endpoint).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,
    pub request_body: Option<RefOr<RequestBody>>,
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
}

/// A parameter (path, query, header or cookie).
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<Schema>,
    pub content: Option<IndexMap<String, MediaType>>,
}

/// A request body definition.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A response definition.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Clone, Deserialize)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

/// JSON Schema definition used in OpenAPI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// The type of the schema (string, number, integer, boolean, object, array, null).
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Reference to another schema.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Properties for object types, in declaration order.
    pub properties: Option<IndexMap<String, Schema>>,

    /// Required property names for object types.
    pub required: Option<Vec<String>>,

    /// Item schema for array types.
    pub items: Option<Box<Schema>>,

    /// Enum values. Kept raw; only scalar values become literals.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(rename = "anyOf")]
    pub any_of: Option<Vec<Schema>>,

    #[serde(rename = "oneOf")]
    pub one_of: Option<Vec<Schema>>,

    #[serde(rename = "allOf")]
    pub all_of: Option<Vec<Schema>>,

    /// Additional properties for object types (index signatures).
    pub additional_properties: Option<AdditionalProperties>,

    /// Format hint (e.g., date-time, uuid).
    pub format: Option<String>,

    /// Constant value - schema matches only this exact value.
    #[serde(rename = "const")]
    pub const_value: Option<Value>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    pub nullable: Option<bool>,

    /// Negation; not expressible in the generated types.
    pub not: Option<Value>,
}

/// Schema type can be a single type or an array of types (3.1 nullable style).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

impl OpenApiSpec {
    /// Parse an OpenAPI document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(json).map_err(|e| Error::Document(e.to_string()))?;
        Self::from_value(raw)
    }

    /// Parse an OpenAPI document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| Error::Document(e.to_string()))?;
        Self::from_value(yaml_to_json(raw)?)
    }

    fn from_value(raw: Value) -> Result<Self> {
        let mut spec: Self =
            serde_json::from_value(raw.clone()).map_err(|e| Error::Document(e.to_string()))?;
        spec.raw = raw;
        Ok(spec)
    }

    /// Parse either format: JSON when the text starts like a JSON object,
    /// YAML otherwise.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim_start().starts_with('{') {
            Self::from_json(text)
        } else {
            Self::from_yaml(text)
        }
    }

    /// Look up a named component schema.
    pub fn component_schema(&self, name: &str) -> Option<&Schema> {
        self.components.as_ref()?.schemas.get(name)
    }

    /// Deserialize the node a local `$ref` (`#/...`) points at. Returns
    /// `None` for external references, missing nodes and nodes of the wrong
    /// shape.
    pub fn lookup<T: DeserializeOwned>(&self, ref_path: &str) -> Option<T> {
        let pointer = ref_path.strip_prefix('#')?;
        let node = self.raw.pointer(pointer)?;
        serde_json::from_value(node.clone()).ok()
    }
}

/// YAML allows non-string keys (`200:`); JSON Schema keys are always strings.
fn yaml_to_json(value: serde_yaml::Value) -> Result<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut object = serde_json::Map::new();
            for (key, value) in mapping {
                let key = match key {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(Error::Document(format!(
                            "unsupported mapping key: {other:?}"
                        )));
                    }
                };
                object.insert(key, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

/// Decode one JSON pointer segment (`~1` is `/`, `~0` is `~`).
pub fn decode_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Encode a string for use as a JSON pointer segment.
pub fn encode_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Name of a `#/components/<section>/<Name>` reference, if it has that shape.
pub fn component_name<'a>(ref_path: &'a str, section: &str) -> Option<&'a str> {
    ref_path
        .strip_prefix("#/components/")?
        .strip_prefix(section)?
        .strip_prefix('/')
        .filter(|name| !name.is_empty() && !name.contains('/'))
}
