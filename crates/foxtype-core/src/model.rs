//! Document model for Apifox shared docs.
//!
//! The types here mirror the JSON the shared-docs API returns, but property
//! definitions are folded into a closed [`PropertyKind`] sum type on the way in
//! so the rest of the generator never has to probe optional fields.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use serde_value::Value as SerdeValue;

/// A named schema from the `data-schemas` listing
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawSchema")]
pub struct SchemaDef {
    /// Identifier that `$ref` strings point at
    pub id: String,
    /// Display name registered for reference resolution
    pub name: String,
    /// Title used for the emitted interface
    pub title: String,
    pub description: Option<String>,
    /// Properties in source order
    pub properties: Properties,
    /// `None` when the schema has no `required` list at all
    pub required: Option<BTreeSet<String>>,
}

impl SchemaDef {
    /// Whether a property is emitted without the optional marker
    pub fn is_required(&self, key: &str, property: &PropertyDef) -> bool {
        is_required_key(self.required.as_ref(), key, property)
    }
}

/// Whether `key` is required under an optional `required` list.
///
/// Nullable properties are never required. Without a list every other
/// property is required; with one, only the listed keys are.
pub fn is_required_key(
    required: Option<&BTreeSet<String>>,
    key: &str,
    property: &PropertyDef,
) -> bool {
    !property.nullable && required.map_or(true, |keys| keys.contains(key))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "null_default")]
    json_schema: RawJsonSchema,
}

#[derive(Default, Deserialize)]
struct RawJsonSchema {
    title: Option<String>,
    description: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    properties: Properties,
    #[serde(default)]
    required: Option<Vec<String>>,
}

impl From<RawSchema> for SchemaDef {
    fn from(raw: RawSchema) -> Self {
        let title = raw
            .json_schema
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| raw.name.clone());
        Self {
            id: raw.id,
            name: raw.name,
            title,
            description: raw.json_schema.description,
            properties: raw.json_schema.properties,
            required: raw.json_schema.required.map(|keys| keys.into_iter().collect()),
        }
    }
}

/// Ordered property map. JSON object order is kept as written in the document.
#[derive(Debug, Clone, Default)]
pub struct Properties(Vec<(String, PropertyDef)>);

impl Properties {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyDef)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = Properties;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of property definitions")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, PropertyDef>()? {
                    // Later duplicates overwrite, like a JSON object would
                    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
                        *slot = (key, value);
                    } else {
                        entries.push((key, value));
                    }
                }
                Ok(Properties(entries))
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}

/// A single property, parameter or body schema
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawProperty")]
pub struct PropertyDef {
    pub kind: PropertyKind,
    pub description: Option<String>,
    pub nullable: bool,
}

/// The shape of a property, keyed by its JSON schema `type`
#[derive(Debug, Clone)]
pub enum PropertyKind {
    String {
        /// Allowed literals in source order
        enum_values: Option<Vec<String>>,
    },
    Number,
    Integer,
    Boolean,
    Array {
        items: Option<Box<PropertyDef>>,
    },
    Object {
        additional_properties: Option<Box<PropertyDef>>,
        /// Inline properties, only used for inline endpoint bodies
        properties: Properties,
        required: Option<BTreeSet<String>>,
    },
    /// No recognized `type`, but a `$ref` to another schema
    Ref(String),
    Unknown,
}

impl PropertyDef {
    /// Whether the definition carries an explicit `type`
    pub fn has_type(&self) -> bool {
        !matches!(self.kind, PropertyKind::Ref(_) | PropertyKind::Unknown)
    }

    /// The `$ref` target if this definition is a plain reference
    pub fn reference(&self) -> Option<&str> {
        match &self.kind {
            PropertyKind::Ref(target) => Some(target),
            _ => None,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProperty {
    #[serde(rename = "type", default, deserialize_with = "type_names")]
    types: Vec<String>,
    description: Option<String>,
    nullable: Option<bool>,
    #[serde(rename = "enum")]
    enum_values: Option<Vec<JsonValue>>,
    items: Option<Box<PropertyDef>>,
    additional_properties: Option<AdditionalProperties>,
    #[serde(default, deserialize_with = "null_default")]
    properties: Properties,
    #[serde(default)]
    required: Option<Vec<String>>,
    #[serde(rename = "$ref")]
    reference: Option<String>,
}

/// `additionalProperties` is either a schema or a plain boolean
#[derive(Deserialize)]
#[serde(untagged)]
enum AdditionalProperties {
    Schema(Box<PropertyDef>),
    #[allow(dead_code)]
    Flag(bool),
}

impl From<RawProperty> for PropertyDef {
    fn from(raw: RawProperty) -> Self {
        // `type: ["string", "null"]` is how JSON schema spells nullable
        let nullable = raw.nullable.unwrap_or(false) || raw.types.iter().any(|t| t == "null");
        let primary = raw.types.into_iter().find(|t| t != "null");

        let kind = match primary.as_deref() {
            Some("string") => PropertyKind::String {
                enum_values: raw
                    .enum_values
                    .map(|values| values.iter().map(enum_literal).collect::<Vec<_>>())
                    .filter(|values| !values.is_empty()),
            },
            Some("number") => PropertyKind::Number,
            Some("integer") => PropertyKind::Integer,
            Some("boolean") => PropertyKind::Boolean,
            Some("array") => PropertyKind::Array { items: raw.items },
            Some("object") => PropertyKind::Object {
                additional_properties: match raw.additional_properties {
                    Some(AdditionalProperties::Schema(schema)) => Some(schema),
                    _ => None,
                },
                properties: raw.properties,
                required: raw.required.map(|keys| keys.into_iter().collect()),
            },
            _ => match raw.reference {
                Some(target) => PropertyKind::Ref(target),
                None => PropertyKind::Unknown,
            },
        };

        Self {
            kind,
            description: raw.description,
            nullable,
        }
    }
}

fn enum_literal(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A node of the `http-api-tree` listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointNode {
    #[serde(default)]
    pub name: Option<String>,
    /// Present on endpoint leaves
    #[serde(default)]
    pub api: Option<ApiRef>,
    /// Present on modules and folders
    #[serde(default, deserialize_with = "null_default")]
    pub children: Vec<EndpointNode>,
}

/// Reference from a tree leaf to its endpoint detail document
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRef {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
}

/// Full detail of one endpoint from `http-apis/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDetail {
    pub path: String,
    pub method: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default)]
    pub parameters: Option<Parameters>,
    #[serde(default)]
    pub request_body: Option<RequestBody>,
    #[serde(default, deserialize_with = "null_default")]
    pub responses: Vec<ResponseDef>,
}

impl EndpointDetail {
    /// `METHOD /path`, used in logs and error messages
    pub fn label(&self) -> String {
        format!("{} {}", self.method.to_uppercase(), self.path)
    }
}

/// Parameters grouped by location
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameters {
    #[serde(default, deserialize_with = "null_default")]
    pub path: Vec<ParamDef>,
    #[serde(default, deserialize_with = "null_default")]
    pub query: Vec<ParamDef>,
    #[serde(default, deserialize_with = "null_default")]
    pub header: Vec<ParamDef>,
    #[serde(default, deserialize_with = "null_default")]
    pub cookie: Vec<ParamDef>,
}

/// A path, query or form parameter
#[derive(Debug, Clone, Deserialize)]
pub struct ParamDef {
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub required: bool,
    /// Apifox lets authors switch a parameter off without deleting it
    #[serde(default)]
    pub enable: Option<bool>,
    #[serde(flatten)]
    pub schema: PropertyDef,
}

impl ParamDef {
    pub fn is_enabled(&self) -> bool {
        self.enable.unwrap_or(true)
    }
}

/// Request body of an endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    /// Content type such as `application/json`, or `none`
    #[serde(rename = "type", default, deserialize_with = "null_default")]
    pub content_type: String,
    #[serde(default)]
    pub json_schema: Option<PropertyDef>,
    /// Form fields for `multipart/form-data` and urlencoded bodies
    #[serde(default, deserialize_with = "null_default")]
    pub parameters: Vec<ParamDef>,
}

impl RequestBody {
    pub fn is_json(&self) -> bool {
        self.content_type == "application/json"
    }

    pub fn is_form(&self) -> bool {
        matches!(
            self.content_type.as_str(),
            "multipart/form-data" | "application/x-www-form-urlencoded"
        )
    }
}

/// One documented response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDef {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub json_schema: Option<PropertyDef>,
}

/// Deserialize an id that Apifox may send as either a string or a number
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match SerdeValue::deserialize(deserializer)? {
        SerdeValue::String(s) => Ok(s),
        SerdeValue::U8(n) => Ok(n.to_string()),
        SerdeValue::U16(n) => Ok(n.to_string()),
        SerdeValue::U32(n) => Ok(n.to_string()),
        SerdeValue::U64(n) => Ok(n.to_string()),
        SerdeValue::I8(n) => Ok(n.to_string()),
        SerdeValue::I16(n) => Ok(n.to_string()),
        SerdeValue::I32(n) => Ok(n.to_string()),
        SerdeValue::I64(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom("expected a string or integer id")),
    }
}

/// Deserialize `type` given either as a single string or a list of strings
fn type_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match SerdeValue::deserialize(deserializer)? {
        SerdeValue::String(s) => Ok(vec![s]),
        SerdeValue::Seq(seq) => {
            let mut result = Vec::new();
            for item in seq {
                if let SerdeValue::String(s) = item {
                    result.push(s);
                } else {
                    return Err(serde::de::Error::custom(
                        "Expected string or array of strings",
                    ));
                }
            }
            Ok(result)
        }
        SerdeValue::Unit | SerdeValue::Option(None) => Ok(Vec::new()),
        _ => Err(serde::de::Error::custom(
            "Expected string or array of strings",
        )),
    }
}

/// Treat an explicit `null` the same as a missing field
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_keeps_property_order() {
        let schema: SchemaDef = serde_json::from_value(json!({
            "id": 1001,
            "name": "User",
            "jsonSchema": {
                "title": "User",
                "properties": {
                    "zeta": {"type": "string"},
                    "alpha": {"type": "integer"},
                    "mid": {"type": "boolean"}
                },
                "required": ["alpha"]
            }
        }))
        .unwrap();

        assert_eq!(schema.id, "1001");
        assert_eq!(schema.title, "User");
        let keys: Vec<_> = schema.properties.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert!(schema.required.as_ref().unwrap().contains("alpha"));
    }

    #[test]
    fn test_schema_title_falls_back_to_name() {
        let schema: SchemaDef = serde_json::from_value(json!({
            "id": "s1",
            "name": "Order",
            "jsonSchema": {"properties": null}
        }))
        .unwrap();
        assert_eq!(schema.title, "Order");
        assert!(schema.properties.is_empty());
        assert_eq!(schema.required, None);
    }

    #[test]
    fn test_property_kinds() {
        let prop: PropertyDef =
            serde_json::from_value(json!({"type": "string", "enum": ["A", "B"]})).unwrap();
        match prop.kind {
            PropertyKind::String { enum_values } => {
                assert_eq!(enum_values, Some(vec!["A".to_string(), "B".to_string()]))
            }
            other => panic!("unexpected kind {other:?}"),
        }

        let prop: PropertyDef = serde_json::from_value(json!({"$ref": "#/definitions/12"})).unwrap();
        assert_eq!(prop.reference(), Some("#/definitions/12"));
        assert!(!prop.has_type());

        let prop: PropertyDef = serde_json::from_value(json!({"description": "?"})).unwrap();
        assert!(matches!(prop.kind, PropertyKind::Unknown));
    }

    #[test]
    fn test_type_list_marks_nullable() {
        let prop: PropertyDef =
            serde_json::from_value(json!({"type": ["integer", "null"]})).unwrap();
        assert!(prop.nullable);
        assert!(matches!(prop.kind, PropertyKind::Integer));
    }

    #[test]
    fn test_boolean_additional_properties() {
        let prop: PropertyDef =
            serde_json::from_value(json!({"type": "object", "additionalProperties": true}))
                .unwrap();
        match prop.kind {
            PropertyKind::Object {
                additional_properties,
                ..
            } => assert!(additional_properties.is_none()),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_detail_params() {
        let detail: EndpointDetail = serde_json::from_value(json!({
            "path": "/users/{id}",
            "method": "get",
            "name": "Get user",
            "description": null,
            "parameters": {
                "path": [{"name": "id", "required": true, "type": "string", "description": "user id"}],
                "query": [{"name": "verbose", "type": "boolean", "enable": false}]
            },
            "responses": [{"name": "OK", "jsonSchema": {"$ref": "#/definitions/s1"}}]
        }))
        .unwrap();

        assert_eq!(detail.label(), "GET /users/{id}");
        assert_eq!(detail.description, "");
        let params = detail.parameters.unwrap();
        assert!(params.path[0].required);
        assert_eq!(params.path[0].schema.description.as_deref(), Some("user id"));
        assert!(matches!(params.path[0].schema.kind, PropertyKind::String { .. }));
        assert!(!params.query[0].is_enabled());
        assert!(params.header.is_empty());
    }

    #[test]
    fn test_missing_required_list_keeps_properties_required() {
        let schema: SchemaDef = serde_json::from_value(json!({
            "id": "s1",
            "name": "User",
            "jsonSchema": {"properties": {
                "id": {"type": "integer"},
                "nick": {"type": "string", "nullable": true}
            }}
        }))
        .unwrap();
        let props: Vec<_> = schema.properties.iter().collect();
        assert!(schema.is_required(props[0].0, props[0].1));
        assert!(!schema.is_required(props[1].0, props[1].1));

        let listed: BTreeSet<String> = ["nick".to_string()].into_iter().collect();
        assert!(!is_required_key(Some(&listed), "id", props[0].1));
        assert!(!is_required_key(Some(&listed), "nick", props[1].1));
    }

    #[test]
    fn test_tree_nodes() {
        let nodes: Vec<EndpointNode> = serde_json::from_value(json!([
            {"name": "Users", "children": [
                {"api": {"id": 7}},
                {"name": "Admin", "children": null}
            ]}
        ]))
        .unwrap();
        assert!(nodes[0].api.is_none());
        assert_eq!(nodes[0].children[0].api.as_ref().unwrap().id, "7");
        assert!(nodes[0].children[1].children.is_empty());
    }
}
