//! Errors raised by clip sources.

use std::path::PathBuf;

use multicam_clip_model::RecordError;

/// Result alias for clip source queries.
pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database not found: {path}")]
    DatabaseNotFound { path: PathBuf },

    #[error("Table {table:?} is not a plain SQL identifier")]
    InvalidTableName { table: String },

    #[error("Table {table:?} does not exist")]
    MissingTable { table: String },

    #[error("Table {table:?} is missing columns: {}", columns.join(", "))]
    MissingColumns { table: String, columns: Vec<String> },

    #[error("Column {column} holds a value that cannot be used as a key ({kind})")]
    UnsupportedKey { column: String, kind: String },

    #[error(transparent)]
    Record(#[from] RecordError),
}
