use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Failed to load media '{path}': {message}")]
    MediaLoad { path: PathBuf, message: String },

    #[error("Unsupported media format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Archive folder not found: {path}")]
    ArchiveNotFound { path: PathBuf },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Could not move '{path}' to trash: {message}")]
    TrashError { path: PathBuf, message: String },

    #[error("Score store error: {message}")]
    ScoreStoreError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ViewerError>;

impl ViewerError {
    /// Returns true if this error is recoverable (user can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ViewerError::FileNotFound { .. }
                | ViewerError::ArchiveNotFound { .. }
                | ViewerError::TrashError { .. }
                | ViewerError::IoError { .. }
        )
    }

    /// Returns a user-friendly error message with recovery suggestions
    pub fn user_message(&self) -> String {
        let base_message = self.to_string();
        let suggestion = match self {
            ViewerError::FileNotFound { .. } => {
                "Check if the file exists and you have permission to access it."
            }
            ViewerError::ArchiveNotFound { .. } => {
                "Pick the archive folder again from the File menu."
            }
            ViewerError::UnsupportedFormat { .. } => {
                "This media format is not supported. Try converting it to a common format like JPEG or PNG."
            }
            ViewerError::MediaLoad { .. } => {
                "The file may be corrupted. Try opening it in another viewer."
            }
            ViewerError::TrashError { .. } => {
                "The file could not be moved to the trash. Check permissions on the archive folder."
            }
            ViewerError::IoError { .. } => {
                "File system error occurred. Check disk space and permissions."
            }
            _ => "An unexpected error occurred.",
        };

        format!("{}\n\n{}", base_message, suggestion)
    }
}
