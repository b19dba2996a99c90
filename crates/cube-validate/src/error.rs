use thiserror::Error;

use cube_client::ClientError;

/// Errors that stop a validation run before or while it starts.
///
/// Failures of individual cubes never surface here; they are recorded as
/// outcomes in the run result.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("API URL must not be empty")]
    MissingApiUrl,
    #[error("API credential must not be empty")]
    MissingCredential,
    #[error("concurrency limit must be at least 1")]
    InvalidConcurrency,
    #[error("failed to fetch cube catalog: {0}")]
    Catalog(#[source] ClientError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
