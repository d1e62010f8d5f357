//! Error types shared across RallyCut crates.

use std::path::PathBuf;

/// Top-level error type for RallyCut operations.
#[derive(Debug, thiserror::Error)]
pub enum RallycutError {
    #[error("Analysis error: {message}")]
    Analysis { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Probe error: {message}")]
    Probe { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using RallycutError.
pub type RallycutResult<T> = Result<T, RallycutError>;

impl RallycutError {
    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
