use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document encoding failed: {0}")]
    Encode(String),

    #[error("Saving the document failed: {0}")]
    Save(String),

    #[error("Export directory not found: {}", .0.display())]
    MountMissing(PathBuf),
}

/// Classification of errors for logging and user display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Failure while producing or saving a document.
    ExportError,
    /// Invalid or missing configuration, or a broken host environment.
    ConfigError,
}

impl BudgetError {
    /// Returns the broad error category for routing and display purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) | Self::MountMissing(_) => ErrorCategory::ConfigError,
            Self::Encode(_) | Self::Save(_) => ErrorCategory::ExportError,
        }
    }

    /// Returns a user-friendly message (hides internal details).
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(msg) => format!("Configuration issue: {msg}"),
            Self::Encode(_) => "Error generating the document.".into(),
            Self::Save(_) => "The document could not be saved. Check disk space and permissions.".into(),
            Self::MountMissing(path) => format!(
                "The export directory {} does not exist. Create it or fix export_dir in the config.",
                path.display()
            ),
        }
    }
}
