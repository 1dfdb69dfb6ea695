use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors surfaced by the generation pipeline.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("cannot read input file {path:?}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("prompt template error: {0}")]
    Format(String),

    #[error("remote service error: {0}")]
    Remote(#[from] RemoteServiceError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Failures of a call to the hosted generation or embedding service.
#[derive(Error, Debug)]
pub enum RemoteServiceError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
