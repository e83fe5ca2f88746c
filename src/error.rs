//! Error types for Recap.

use thiserror::Error;

/// Library-level error type for Recap operations.
#[derive(Error, Debug)]
pub enum RecapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Summary generation failed: {0}")]
    Summary(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("No transcript available for this video. The video may not have captions enabled.")]
    NoTranscript,
}

/// Result type alias for Recap operations.
pub type Result<T> = std::result::Result<T, RecapError>;

/// Why a single transcript source came back empty-handed.
///
/// These never cross the orchestrator boundary as errors; they are logged and
/// reported, and the orchestrator moves on to the next source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionErrorKind {
    /// No caption track, control, container or response path was located.
    NotFound,
    /// A payload failed to parse under its decoder.
    Malformed,
    /// Decoded text was too short to count as a transcript.
    BelowThreshold,
    /// The request was rejected or returned a non-success status.
    NetworkFailure,
}

impl std::fmt::Display for ExtractionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionErrorKind::NotFound => write!(f, "not found"),
            ExtractionErrorKind::Malformed => write!(f, "malformed"),
            ExtractionErrorKind::BelowThreshold => write!(f, "below threshold"),
            ExtractionErrorKind::NetworkFailure => write!(f, "network failure"),
        }
    }
}

/// A failed extraction step with its kind and a human-readable detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ExtractionError {
    pub kind: ExtractionErrorKind,
    pub message: String,
}

impl ExtractionError {
    pub fn new(kind: ExtractionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ExtractionErrorKind::NotFound, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ExtractionErrorKind::Malformed, message)
    }

    pub fn below_threshold(length: usize) -> Self {
        Self::new(
            ExtractionErrorKind::BelowThreshold,
            format!("{} characters after normalization", length),
        )
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ExtractionErrorKind::NetworkFailure, message)
    }
}

impl From<reqwest::Error> for ExtractionError {
    fn from(e: reqwest::Error) -> Self {
        ExtractionError::network(e.to_string())
    }
}

/// Result type for a single extraction step.
pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;
