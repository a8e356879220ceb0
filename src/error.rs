use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
