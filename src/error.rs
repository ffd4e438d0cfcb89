use thiserror::Error;

/// Errors produced while turning a request into an analysis result.
///
/// Every variant is reported the same way at the process boundary, but the
/// variants stay distinct so callers and logs can tell causes apart.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("{0}")]
    Validation(String),

    #[error("failed to fetch image: {0}")]
    UpstreamFetch(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("malformed request JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load detector fixture {path}: {reason}")]
    Config { path: String, reason: String },
}

impl AdapterError {
    /// Stable tag reported in the `kind` field of an error result.
    pub fn kind(&self) -> &'static str {
        match self {
            AdapterError::Validation(_) => "validation",
            AdapterError::UpstreamFetch(_) => "upstream_fetch",
            AdapterError::Inference(_) => "inference",
            AdapterError::MalformedJson(_) => "malformed_json",
            AdapterError::Io(_) => "io",
            AdapterError::Config { .. } => "config",
        }
    }

    pub fn missing_field(field: &str) -> Self {
        AdapterError::Validation(format!("missing required parameter: {field}"))
    }
}
