//! Error types shared across multicam crates.

use std::path::PathBuf;

/// Top-level error type for timeline generation.
///
/// Lower crates keep their own error enums; the assembler maps them into
/// these kinds and attaches the camera/record/field context.
#[derive(Debug, thiserror::Error)]
pub enum MulticamError {
    #[error("Clip source contains no records")]
    EmptySource,

    #[error("Timecode error in {field} of record {record} (camera {camera}): {message}")]
    Timecode {
        camera: String,
        record: String,
        field: String,
        message: String,
    },

    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Clip source error: {message}")]
    Source { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using MulticamError.
pub type MulticamResult<T> = Result<T, MulticamError>;

impl MulticamError {
    pub fn timecode(
        camera: impl ToString,
        record: impl ToString,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Timecode {
            camera: camera.to_string(),
            record: record.to_string(),
            field: field.into(),
            message: msg.into(),
        }
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template {
            message: msg.into(),
        }
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
