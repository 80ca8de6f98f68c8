use thiserror::Error;

/// Errors produced while deserializing a raw document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

/// Errors produced while resolving pointer references.
///
/// `Clone` so memoized computations can cache a failure and replay it on
/// every subsequent access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unresolved reference: {0}")]
    UnresolvedRef(String),

    #[error("unknown external document: {0}")]
    UnknownDocument(String),

    #[error("invalid reference format: {0}")]
    InvalidPointer(String),
}

/// Errors produced while materializing presentation models.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A resolved node did not have the JSON shape the model expected.
    #[error("unexpected shape at {pointer}: {detail}")]
    Shape { pointer: String, detail: String },
}

impl ModelError {
    pub fn shape(pointer: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        ModelError::Shape {
            pointer: pointer.into(),
            detail: detail.to_string(),
        }
    }
}

/// Errors surfaced by the top-level document load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// Strict-mode wrapper naming the operation that failed to materialize.
    #[error("failed to build operation at {pointer}: {source}")]
    Operation {
        pointer: String,
        #[source]
        source: ModelError,
    },
}
