//! JSON Schema for the configuration file.

use super::CasementConfig;

/// Identifier embedded in the generated schema.
pub const SCHEMA_ID: &str = "https://raw.githubusercontent.com/casement-rs/casement/main/casement.schema.json";

/// Generates a JSON Schema describing the configuration file.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(CasementConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!(SCHEMA_ID));
    }

    schema
}

/// Pretty-printed JSON Schema of the configuration file.
#[must_use]
pub fn generate_schema_json() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}
