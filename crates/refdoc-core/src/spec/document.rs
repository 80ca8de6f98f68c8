use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::components::Components;
use super::operation::PathItem;
use super::security::SecurityRequirement;
use super::server::Server;

/// Top-level OpenAPI 3.x document, as authored. Never mutated after load.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDocument {
    pub openapi: String,

    pub info: Info,

    #[serde(default)]
    pub servers: Vec<Server>,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    pub components: Option<Components>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    /// Global security requirements inherited by top-level operations
    /// that declare none of their own.
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(rename = "externalDocs")]
    pub external_docs: Option<ExternalDocs>,

    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// API metadata shown in the document header.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub terms_of_service: Option<String>,
    pub contact: Option<Contact>,
    pub license: Option<License>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct License {
    pub name: String,
    pub url: Option<String>,
}

/// A tag definition. Tags become navigation groups, in declaration order.
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "externalDocs")]
    pub external_docs: Option<ExternalDocs>,
    /// Display name override (`x-displayName` vendor extension).
    #[serde(rename = "x-displayName")]
    pub display_name: Option<String>,
}

/// Link to documentation hosted outside the spec.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalDocs {
    pub url: String,
    pub description: Option<String>,
}
