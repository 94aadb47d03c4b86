use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No files were submitted")]
    EmptyBatch,

    #[error("Unknown document category: {0}")]
    UnknownCategory(String),

    #[error("Upload tracker shut down")]
    TrackerShutdown,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl UploadError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Error alias
pub type Result<T, E = UploadError> = std::result::Result<T, E>;
