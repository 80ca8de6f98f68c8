pub mod components;
pub mod document;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod security;
pub mod server;

use serde_json::Value;

use crate::error::ParseError;
use document::ApiDocument;

/// Parse a raw document from YAML source text.
pub fn from_yaml(input: &str) -> Result<ApiDocument, ParseError> {
    let document: ApiDocument = serde_yaml_ng::from_str(input)?;
    validate_version(&document)?;
    Ok(document)
}

/// Parse a raw document from JSON source text.
pub fn from_json(input: &str) -> Result<ApiDocument, ParseError> {
    let document: ApiDocument = serde_json::from_str(input)?;
    validate_version(&document)?;
    Ok(document)
}

/// Project an already deserialized JSON tree into the typed document.
pub fn from_value(value: &Value) -> Result<ApiDocument, ParseError> {
    let document: ApiDocument = serde_json::from_value(value.clone())?;
    validate_version(&document)?;
    Ok(document)
}

fn validate_version(document: &ApiDocument) -> Result<(), ParseError> {
    if !document.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(document.openapi.clone()));
    }
    Ok(())
}
