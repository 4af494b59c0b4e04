//! Error types for the qmaze crate

use thiserror::Error;

use crate::types::Position;

/// Main error type for the qmaze crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("maze has {got} lines, expected {expected}")]
    InvalidLineCount { expected: usize, got: usize },

    #[error("maze line {line} has {got} cells, expected {expected}")]
    InvalidLineLength {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid character '{character}' at line {line}, column {column}")]
    InvalidCellCharacter {
        character: char,
        line: usize,
        column: usize,
    },

    #[error("maze must contain exactly one '{cell}' cell, found {count}")]
    InvalidMarkerCount { cell: char, count: usize },

    #[error("position {position} is outside the {size}x{size} grid")]
    OutOfRange { position: Position, size: usize },

    #[error("cannot place {requested} walls: only {available} free cells")]
    TooManyWalls { requested: usize, available: usize },

    #[error("Q-value for {position} became non-finite ({value})")]
    NonFiniteValue { position: Position, value: f64 },

    #[error("grid size mismatch: agent trained on {expected}x{expected}, maze is {got}x{got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an I/O error with the operation that produced it
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Whether this error comes from malformed maze input
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidLineCount { .. }
                | Error::InvalidLineLength { .. }
                | Error::InvalidCellCharacter { .. }
                | Error::InvalidMarkerCount { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
