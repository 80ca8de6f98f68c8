use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::schema::SchemaOrRef;

/// One content-type variant of a request or response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    pub schema: Option<SchemaOrRef>,

    /// A single literal example payload.
    pub example: Option<Value>,

    /// Named example payloads; shown as selectable variants.
    #[serde(default)]
    pub examples: IndexMap<String, ExampleOrRef>,
}

/// A named example payload with optional display metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub value: Option<Value>,
    /// URL of an externally hosted example; carried as-is, never fetched.
    pub external_value: Option<String>,
}

/// A reference or inline example.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExampleOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Example(Example),
}
