use thiserror::Error;

#[derive(Error, Debug)]
pub enum LanyardError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Asset load failed: {0}")]
    AssetLoad(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LanyardError>;
