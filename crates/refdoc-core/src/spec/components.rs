use indexmap::IndexMap;
use serde::Deserialize;

use super::media_type::ExampleOrRef;
use super::operation::CallbackOrRef;
use super::parameter::ParameterOrRef;
use super::request_body::RequestBodyOrRef;
use super::response::{HeaderOrRef, ResponseOrRef};
use super::schema::SchemaOrRef;
use super::security::SecurityScheme;

/// Reusable definitions referenced by `#/components/...` pointers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaOrRef>,

    #[serde(default)]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(default)]
    pub parameters: IndexMap<String, ParameterOrRef>,

    #[serde(default)]
    pub examples: IndexMap<String, ExampleOrRef>,

    #[serde(default)]
    pub request_bodies: IndexMap<String, RequestBodyOrRef>,

    #[serde(default)]
    pub headers: IndexMap<String, HeaderOrRef>,

    #[serde(default)]
    pub security_schemes: IndexMap<String, SecurityScheme>,

    #[serde(default)]
    pub callbacks: IndexMap<String, CallbackOrRef>,
}
