pub mod schema;
pub mod validation;

pub use schema::{apply_schema_metadata, ResponseSchema, SchemaHandle};
pub use validation::validate_structured_payload;
