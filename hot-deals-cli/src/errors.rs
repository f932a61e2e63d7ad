use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the `hot-deals` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error from the Claude Code adapter.
    #[error("Claude adapter error: {0}")]
    Claude(#[from] claudecode_adapter::ClaudeError),

    /// Upload, inference or normalization failed.
    #[error("Extraction failed: {0}")]
    Extraction(#[from] hot_deals::error::ExtractionError),

    /// A model response file could not be parsed.
    #[error("{0}")]
    Normalization(#[from] hot_deals::error::NormalizationError),

    /// An edit was rejected.
    #[error("Invalid edit: {0}")]
    Field(#[from] hot_deals::error::FieldError),

    /// A `--set` argument could not be understood.
    #[error("Invalid --set argument {0:?}: expected DEAL.PATH=VALUE, e.g. 0.hotel.rating=4.5")]
    EditSyntax(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    File {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Export serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub(crate) fn file(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::File { path, source }
    }
}
