use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Capture of section '{section}' failed: {reason}")]
    Capture { section: String, reason: String },

    #[error("Invalid bitmap for section '{section}': {reason}")]
    InvalidBitmap { section: String, reason: String },

    #[error("Nothing to export: the report has no sections")]
    EmptyContent,

    #[error("Document serialization failed: {0}")]
    Serialization(String),

    #[error("An export is already in progress")]
    ExportInProgress,

    #[error("Document write failed: {0}")]
    Render(String),

    #[error("Saving report failed: {0}")]
    Save(#[from] std::io::Error),

    #[error("Invalid report configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Failure reported by a [`crate::Rasterizer`]. Turned into [`Error::Capture`]
/// by the assembler, which knows which section was being captured.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct CaptureError(pub String);

impl CaptureError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
