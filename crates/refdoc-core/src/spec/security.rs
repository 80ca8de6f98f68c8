use indexmap::IndexMap;
use serde::Deserialize;

/// A security requirement: scheme name → required scopes. An operation's
/// requirement list is a disjunction; the scheme map is a conjunction.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// A security scheme kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecuritySchemeType {
    ApiKey,
    Http,
    OAuth2,
    OpenIdConnect,
    MutualTLS,
}

/// Location of an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Query,
    Header,
    Cookie,
}

/// A security scheme definition from `components.securitySchemes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: SecuritySchemeType,

    pub description: Option<String>,

    /// API key parameter name.
    pub name: Option<String>,

    #[serde(rename = "in")]
    pub location: Option<ApiKeyLocation>,

    /// HTTP auth scheme (`basic`, `bearer`, ...).
    pub scheme: Option<String>,

    pub bearer_format: Option<String>,

    pub open_id_connect_url: Option<String>,
}
