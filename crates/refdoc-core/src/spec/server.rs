use indexmap::IndexMap;
use serde::Deserialize;

/// A server variable for URL templates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerVariable {
    pub default: String,

    pub description: Option<String>,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<String>,
}

/// A server URL definition. URLs may be relative to the document's own
/// retrieval location; the model layer normalizes them.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub url: String,

    pub description: Option<String>,

    #[serde(default)]
    pub variables: IndexMap<String, ServerVariable>,
}
