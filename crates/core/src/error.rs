#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Log source unavailable: {path}: {reason}")]
    SourceUnavailable { path: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build a [`CoreError::SourceUnavailable`] from an I/O failure on `path`.
    pub fn source_unavailable(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}
