//! Error types for the fallible surfaces of the crate.
//!
//! Grammar expansion and parameter parsing never fail: malformed rules are
//! dropped and numeric fields fall back to defaults. Only file I/O and file
//! format violations are reported through these types.

use thiserror::Error;

/// Result type for OBJ/MTL import and export.
pub type ObjResult<T> = Result<T, ObjError>;

/// Result type for preset save/load.
pub type PresetResult<T> = Result<T, PresetError>;

/// Errors raised while reading or writing Wavefront OBJ/MTL files.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be parsed (non-numeric field, missing component).
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A face references a vertex that does not exist.
    #[error("Invalid vertex index {index} on line {line} ({count} vertices defined)")]
    InvalidIndex {
        line: usize,
        index: i64,
        count: usize,
    },

    /// A face references a texture coordinate that does not exist.
    #[error("Invalid texture coordinate index {index} on line {line} ({count} defined)")]
    InvalidTexCoordIndex {
        line: usize,
        index: i64,
        count: usize,
    },
}

impl ObjError {
    /// Creates a parse error for the given 1-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Errors raised while saving or loading a parameter preset.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file is well-formed but contains fields this crate does not know.
    #[error("Invalid preset file: {0}")]
    Invalid(String),
}
