//! Error types for chronogrid-core
//!
//! Most anomalies (bad pattern text, out-of-range numbers) are absorbed by
//! clamping and defaulting. Only the conditions below reach the caller.

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, ChronoError>;

#[derive(Error, Debug)]
pub enum ChronoError {
    /// Export was requested on a layer set with no layers
    #[error("Nothing to export: the layer set is empty")]
    EmptyInput,

    /// A serialized layer-set document could not be turned into a LayerSet
    #[error("Malformed layer-set document: {reason}")]
    MalformedDocument { reason: String },

    /// Target duration must be a finite, positive number of beats
    #[error("Invalid export duration: {beats} beats")]
    InvalidDuration { beats: f64 },

    /// The layers' step counts have no common multiple within `limit`
    #[error("Composite would exceed {limit} steps")]
    CompositeTooLarge { limit: usize },

    /// Two consecutive MIDI events are further apart than a delta can encode
    #[error("Gap of {ticks} ticks does not fit in a MIDI delta")]
    DeltaOutOfRange { ticks: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChronoError {
    /// Short machine-readable code, appended to REPL error messages
    pub fn error_code(&self) -> &'static str {
        match self {
            ChronoError::EmptyInput => "EMPTY_INPUT",
            ChronoError::MalformedDocument { .. } => "MALFORMED_DOCUMENT",
            ChronoError::InvalidDuration { .. } => "INVALID_DURATION",
            ChronoError::CompositeTooLarge { .. } => "COMPOSITE_TOO_LARGE",
            ChronoError::DeltaOutOfRange { .. } => "DELTA_OUT_OF_RANGE",
            ChronoError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<serde_json::Error> for ChronoError {
    fn from(err: serde_json::Error) -> Self {
        ChronoError::MalformedDocument {
            reason: err.to_string(),
        }
    }
}
