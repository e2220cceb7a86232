use std::any::{type_name, TypeId};

use serde_json::Value;

use crate::{
    error::{GenerationError, Result},
    schemas::{validate_structured_payload, ResponseSchema, SchemaHandle},
};

/// Parse raw model output into `T`: reject empty text, then check the JSON against `T`'s
/// schema, then deserialize. Nothing partially populated ever escapes.
pub fn parse_structured_text<T>(text: &str) -> Result<T>
where
    T: ResponseSchema,
{
    let trimmed = strip_code_fence(text.trim());
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let schema = T::schema();
    let payload: Value = serde_json::from_str(trimmed).map_err(|err| {
        GenerationError::Validation(format!(
            "`{}` response is not valid JSON: {}",
            schema.schema_name(),
            err
        ))
    })?;

    validate_structured_payload(schema, &payload)?;
    deserialize_structured_response::<T>(&payload, schema)
}

pub fn deserialize_structured_response<T>(payload: &Value, schema: &SchemaHandle) -> Result<T>
where
    T: ResponseSchema,
{
    ensure_schema_matches::<T>(schema)?;

    let raw = payload.to_string();
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        GenerationError::Validation(format!(
            "failed to deserialize `{}` at {}: {}",
            schema.schema_name(),
            location,
            err.inner()
        ))
    })?;

    Ok(value)
}

fn ensure_schema_matches<T: 'static>(schema: &SchemaHandle) -> Result<()> {
    let expected = TypeId::of::<T>();
    if schema.type_id() != expected {
        return Err(GenerationError::Validation(format!(
            "schema `{}` does not match target type `{}`",
            schema.schema_name(),
            type_name::<T>(),
        )));
    }
    Ok(())
}

/// Models occasionally wrap JSON mode output in a Markdown fence.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TripItinerary;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("{}"), "{}");
    }

    #[test]
    fn test_empty_text_is_empty_response() {
        let err = parse_structured_text::<TripItinerary>("  \n").unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[test]
    fn test_non_json_is_validation_error() {
        let err = parse_structured_text::<TripItinerary>("Here is your trip!").unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
