use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Transcript not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    // precondition: the file never had a %mor tier
    #[error("{operation} requires a %mor tier, but the transcript has none")]
    MissingMorTier { operation: &'static str },
    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),
    #[error("Query error: {message} (found: '{found}')")]
    Query { message: String, found: String },
    #[error("Config error: {0}")]
    Config(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ChatResult<T> = Result<T, Error>;

impl Error {
    pub fn missing_mor(operation: &'static str) -> Self {
        Error::MissingMorTier { operation }
    }

    pub fn criteria<S: Into<String>>(message: S) -> Self {
        Error::InvalidCriteria(message.into())
    }
}
