use indexmap::IndexMap;
use serde::Deserialize;

use super::media_type::MediaType;

/// One response definition under a status-code key.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    /// Response headers, keyed by header name.
    #[serde(default)]
    pub headers: IndexMap<String, HeaderOrRef>,
}

/// A response header definition (a parameter without name/location).
#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub deprecated: bool,

    pub schema: Option<super::schema::SchemaOrRef>,

    pub example: Option<serde_json::Value>,
}

/// A reference or inline header.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HeaderOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Header(Box<Header>),
}

/// A reference or inline response.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}
