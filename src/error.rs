use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormulaError {
    #[error("Staged source is missing {0}")]
    SourceMissing(String),

    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to execute {0}: {1}")]
    ExecutionFailed(String, #[source] std::io::Error),

    #[error("Verification assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Check `{0}` cancelled after exceeding its deadline")]
    Cancelled(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FormulaError>;
