use schemars::schema::{RootSchema, SchemaObject};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::{
    any::TypeId,
    sync::Arc,
};

use crate::error::{GenerationError, Result};

/// Keywords the Gemini `responseSchema` dialect understands and that carry over verbatim.
const GEMINI_PASSTHROUGH_KEYS: &[&str] = &[
    "description",
    "required",
    "enum",
    "minimum",
    "maximum",
    "minItems",
    "maxItems",
];

const MAX_REF_DEPTH: usize = 16;

/// Cached JSON schema handle associated with a response type.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    schema_name: &'static str,
    type_name: &'static str,
    type_id: TypeId,
    schema_json: Arc<Value>,
}

impl SchemaHandle {
    pub fn from_root_schema<T: 'static>(
        schema_name: &'static str,
        type_name: &'static str,
        root: RootSchema,
    ) -> Self {
        let schema_json = serde_json::to_value(root)
            .unwrap_or_else(|err| panic!("failed to serialize schema for {}: {}", type_name, err));

        Self {
            schema_name,
            type_name,
            type_id: TypeId::of::<T>(),
            schema_json: Arc::new(schema_json),
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Draft-07 JSON Schema, used for local validation.
    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }

    /// The schema rewritten into the OpenAPI subset accepted as Gemini's `responseSchema`.
    ///
    /// `$ref`s are inlined, type names upper-cased, nullable unions collapsed and
    /// `propertyOrdering` added so the model emits fields in declaration order.
    pub fn gemini_schema(&self) -> Result<Value> {
        let definitions = self
            .schema_json
            .get("definitions")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        to_gemini_node(&self.schema_json, &definitions, 0).map_err(|reason| {
            GenerationError::Config(format!(
                "cannot express `{}` as a response schema: {}",
                self.schema_name, reason
            ))
        })
    }
}

pub trait ResponseSchema: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}

/// Fill in the root title and description unless `schemars` already set them.
pub fn apply_schema_metadata(
    root: &mut RootSchema,
    title: &'static str,
    description: Option<&'static str>,
) {
    let schema_object: &mut SchemaObject = &mut root.schema;
    let metadata = schema_object.metadata();

    if metadata.title.is_none() {
        metadata.title = Some(title.to_string());
    }

    if let Some(description) = description {
        if metadata.description.is_none() {
            metadata.description = Some(description.to_string());
        }
    }
}

fn to_gemini_node(
    node: &Value,
    definitions: &Map<String, Value>,
    depth: usize,
) -> std::result::Result<Value, String> {
    if depth > MAX_REF_DEPTH {
        return Err("schema nests too deeply (recursive type?)".to_string());
    }

    let Some(object) = node.as_object() else {
        return Err(format!("expected a schema object, found {node}"));
    };

    if let Some(reference) = object.get("$ref").and_then(Value::as_str) {
        let name = reference
            .strip_prefix("#/definitions/")
            .ok_or_else(|| format!("unsupported reference `{reference}`"))?;
        let target = definitions
            .get(name)
            .ok_or_else(|| format!("unresolved reference `{reference}`"))?;
        let mut resolved = to_gemini_node(target, definitions, depth + 1)?;
        copy_description(object, &mut resolved);
        return Ok(resolved);
    }

    // `schemars` wraps a described `$ref` in a single-element `allOf`.
    if let Some(Value::Array(parts)) = object.get("allOf") {
        if let [single] = parts.as_slice() {
            let mut resolved = to_gemini_node(single, definitions, depth + 1)?;
            copy_description(object, &mut resolved);
            return Ok(resolved);
        }
        return Err("`allOf` with several members is not supported".to_string());
    }

    // `Option<Struct>` arrives as `anyOf: [{$ref}, {type: null}]`.
    if let Some(Value::Array(variants)) = object.get("anyOf") {
        let concrete: Vec<&Value> = variants
            .iter()
            .filter(|variant| variant.get("type").and_then(Value::as_str) != Some("null"))
            .collect();
        if let [single] = concrete.as_slice() {
            let mut resolved = to_gemini_node(single, definitions, depth + 1)?;
            if concrete.len() < variants.len() {
                resolved["nullable"] = Value::Bool(true);
            }
            copy_description(object, &mut resolved);
            return Ok(resolved);
        }
        return Err("`anyOf` unions are not supported".to_string());
    }

    let mut out = Map::new();

    match object.get("type") {
        Some(Value::String(ty)) => {
            out.insert("type".to_string(), Value::String(ty.to_uppercase()));
        }
        Some(Value::Array(types)) => {
            let concrete: Vec<&str> = types
                .iter()
                .filter_map(Value::as_str)
                .filter(|ty| *ty != "null")
                .collect();
            let [single] = concrete.as_slice() else {
                return Err(format!("multi-type union {types:?} is not supported"));
            };
            out.insert("type".to_string(), Value::String(single.to_uppercase()));
            if concrete.len() < types.len() {
                out.insert("nullable".to_string(), Value::Bool(true));
            }
        }
        Some(other) => return Err(format!("unexpected `type` value {other}")),
        None => {}
    }

    for key in GEMINI_PASSTHROUGH_KEYS {
        if let Some(value) = object.get(*key) {
            out.insert((*key).to_string(), value.clone());
        }
    }

    if let Some(Value::Object(properties)) = object.get("properties") {
        let mut converted = Map::new();
        for (name, property) in properties {
            let property = to_gemini_node(property, definitions, depth + 1)
                .map_err(|reason| format!("{name}: {reason}"))?;
            converted.insert(name.clone(), property);
        }
        let ordering: Vec<Value> = properties
            .keys()
            .map(|name| Value::String(name.clone()))
            .collect();
        out.insert("properties".to_string(), Value::Object(converted));
        out.insert("propertyOrdering".to_string(), Value::Array(ordering));
    }

    if let Some(items) = object.get("items") {
        let items = to_gemini_node(items, definitions, depth + 1)
            .map_err(|reason| format!("items: {reason}"))?;
        out.insert("items".to_string(), items);
    }

    Ok(Value::Object(out))
}

fn copy_description(source: &Map<String, Value>, target: &mut Value) {
    if let (Some(description), Some(target)) = (source.get("description"), target.as_object_mut())
    {
        target.insert("description".to_string(), description.clone());
    }
}
