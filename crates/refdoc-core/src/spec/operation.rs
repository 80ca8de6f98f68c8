use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::document::ExternalDocs;
use super::parameter::ParameterOrRef;
use super::request_body::RequestBodyOrRef;
use super::response::ResponseOrRef;
use super::security::SecurityRequirement;
use super::server::Server;

/// HTTP verbs a path item may declare, in spec order.
pub const HTTP_VERBS: [&str; 8] = [
    "get", "post", "put", "delete", "patch", "options", "head", "trace",
];

/// One documented API action as authored in the spec.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,

    pub summary: Option<String>,

    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,

    pub request_body: Option<RequestBodyOrRef>,

    #[serde(default)]
    pub responses: IndexMap<String, ResponseOrRef>,

    /// Named asynchronous events: event name → expression → path item.
    #[serde(default)]
    pub callbacks: IndexMap<String, CallbackOrRef>,

    #[serde(default)]
    pub deprecated: bool,

    /// `None` means "inherit" for top-level operations and "none" for
    /// callback operations; the distinction lives in the operation model.
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(default)]
    pub servers: Vec<Server>,

    pub external_docs: Option<ExternalDocs>,

    /// Unrecognized members, including vendor extensions and code samples.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Operation {
    /// Author-supplied code samples from `x-codeSamples`, with the legacy
    /// `x-code-samples` key accepted as an alias.
    pub fn code_samples(&self) -> Vec<RawCodeSample> {
        let raw = self
            .extensions
            .get("x-codeSamples")
            .or_else(|| self.extensions.get("x-code-samples"));
        raw.and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// A vendor-extension code sample as authored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawCodeSample {
    pub lang: String,
    pub label: Option<String>,
    pub source: String,
}

/// One path entry: up to eight verb operations plus shared metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    pub summary: Option<String>,

    pub description: Option<String>,

    /// Parameters shared by every operation under this path. Operation
    /// parameters override these on a name+location match.
    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(default)]
    pub servers: Vec<Server>,

    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub delete: Option<Operation>,
    pub patch: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub trace: Option<Operation>,
}

impl PathItem {
    pub fn operation(&self, verb: &str) -> Option<&Operation> {
        match verb {
            "get" => self.get.as_ref(),
            "post" => self.post.as_ref(),
            "put" => self.put.as_ref(),
            "delete" => self.delete.as_ref(),
            "patch" => self.patch.as_ref(),
            "options" => self.options.as_ref(),
            "head" => self.head.as_ref(),
            "trace" => self.trace.as_ref(),
            _ => None,
        }
    }

    /// Declared (verb, operation) pairs in spec verb order.
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        HTTP_VERBS
            .iter()
            .filter_map(|verb| self.operation(verb).map(|op| (*verb, op)))
    }
}

/// One callback definition: runtime expression → path item.
pub type Callback = IndexMap<String, PathItem>;

/// A reference or inline callback definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CallbackOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Callback(Callback),
}
