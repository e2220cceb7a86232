use crate::{error::GenerationError, schemas::SchemaHandle};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use tracing::debug;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Validate a structured payload against a schema.
///
/// Every nested array element is checked, so a payload whose `days[2].activities[0]`
/// lacks a `location` is rejected as a whole.
pub fn validate_structured_payload(
    schema: &SchemaHandle,
    payload: &Value,
) -> std::result::Result<(), GenerationError> {
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
        .map_err(|err| {
            GenerationError::Validation(format!(
                "Failed to prepare `{}` schema for validation: {}",
                schema.schema_name(),
                err
            ))
        })?;

    if let Err(errors) = validator.validate(payload) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx < MAX_SCHEMA_ERRORS {
                let mut path = error.instance_path.to_string();
                if path.is_empty() {
                    path = "<root>".to_string();
                }
                details.push(format!("{}: {}", path, error));
            } else {
                truncated = true;
                break;
            }
        }

        let mut detail_str = if details.is_empty() {
            "structured payload failed schema validation".to_string()
        } else {
            details.join("; ")
        };

        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        debug!(
            target: "wander::schema",
            schema = schema.schema_name(),
            error = %detail_str,
        );

        return Err(GenerationError::Validation(format!(
            "Structured payload does not match `{}` schema: {}",
            schema.schema_name(),
            detail_str
        )));
    }

    Ok(())
}
