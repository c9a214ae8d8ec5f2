use thiserror::Error;

/// Errors surfaced by the spectrogram pipeline.
///
/// Every variant is raised before any frame is transformed, except
/// `Cancelled`, which is checked once per frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpectrogramError {
    /// Unknown window, malformed color map, non-positive step and similar.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Input that can never be analysed as given (bad frame length, short buffers).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// No sample data yet. The caller may retry once data has been loaded.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),
    #[error("analysis cancelled")]
    Cancelled,
}

impl SpectrogramError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SpectrogramError::Configuration(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SpectrogramError::InvalidInput(msg.into())
    }

    pub(crate) fn unavailable(msg: impl Into<String>) -> Self {
        SpectrogramError::ResourceUnavailable(msg.into())
    }

    /// Only a missing resource is worth retrying; everything else is
    /// deterministic given the same input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SpectrogramError::ResourceUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, SpectrogramError>;
