use thiserror::Error;

/// `path-not-applicable` (C3) is intentionally absent: it is a local signal
/// consumed by C4 and never surfaces across the public API.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid presentation definition: {0}")]
    InvalidDefinition(String),

    #[error("no input descriptors found for group `{0}`")]
    NoDescriptorsForGroup(String),

    #[error("no credentials satisfy this requirement")]
    NoCredentials,

    #[error("filter error at field index {index}: {source}")]
    FilterError { index: usize, source: String },

    #[error("failed to marshal credential: {0}")]
    MarshalError(String),

    #[error("failed to unmarshal credential: {0}")]
    UnmarshalError(String),

    #[error("BBS+ derivation failed: {0}")]
    BbsDeriveFailed(String),

    #[error("failed to load JSON-LD context `{uri}`: {source}")]
    ContextLoadFailed { uri: String, source: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
