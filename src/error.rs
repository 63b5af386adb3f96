use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Archive error: {0}")]
    ArchiveError(String),

    #[error("Request error: {0}")]
    RequestError(String),

    #[error("Response error: {0}")]
    ResponseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
