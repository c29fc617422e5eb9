//! SQLite-backed clip source.

use std::path::Path;

use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, Connection, OpenFlags, Row};

use multicam_clip_model::{ClipRecord, FrameNumber, RecordKey};
use multicam_common::is_sql_identifier;

use crate::error::{SourceError, SourceResult};
use crate::ClipSource;

/// Columns every clip table must provide, in select order.
pub const CLIP_COLUMNS: [&str; 7] = [
    "id", "cam_id", "tc", "duration", "fir_f", "last_f", "fullpath",
];

/// Clip records stored one per row in a SQLite table.
///
/// The connection lives as long as this value and is closed when it is
/// dropped, on success and error paths alike.
pub struct SqliteClipSource {
    conn: Connection,
    table: String,
}

impl SqliteClipSource {
    /// Open `path` read-only and check that `table` has the clip columns.
    pub fn open(path: &Path, table: &str) -> SourceResult<Self> {
        if !path.exists() {
            return Err(SourceError::DatabaseNotFound {
                path: path.to_path_buf(),
            });
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::debug!(database = %path.display(), table, "Opened clip database");
        Self::from_connection(conn, table)
    }

    /// Wrap an existing connection, checking the table schema.
    pub fn from_connection(conn: Connection, table: &str) -> SourceResult<Self> {
        if !is_sql_identifier(table) {
            return Err(SourceError::InvalidTableName {
                table: table.to_string(),
            });
        }
        let source = Self {
            conn,
            table: table.to_string(),
        };
        source.check_columns()?;
        Ok(source)
    }

    /// Table the records are read from.
    pub fn table(&self) -> &str {
        &self.table
    }

    fn check_columns(&self) -> SourceResult<()> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", self.table))?;
        let present = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;

        if present.is_empty() {
            return Err(SourceError::MissingTable {
                table: self.table.clone(),
            });
        }

        let missing: Vec<String> = CLIP_COLUMNS
            .iter()
            .filter(|col| !present.iter().any(|p| p.eq_ignore_ascii_case(col)))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SourceError::MissingColumns {
                table: self.table.clone(),
                columns: missing,
            });
        }
        Ok(())
    }

    fn select_clause(&self) -> String {
        format!("SELECT {} FROM {}", CLIP_COLUMNS.join(", "), self.table)
    }
}

impl ClipSource for SqliteClipSource {
    fn camera_ids(&self) -> SourceResult<Vec<RecordKey>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT DISTINCT cam_id FROM {}", self.table))?;
        let mut rows = stmt.query([])?;
        let mut cameras = Vec::new();
        while let Some(row) = rows.next()? {
            cameras.push(key_at(row, 0, "cam_id")?);
        }
        Ok(cameras)
    }

    fn clips_for_camera(&self, camera: &RecordKey) -> SourceResult<Vec<ClipRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE cam_id = ?1 ORDER BY fir_f, id",
            self.select_clause()
        ))?;
        let mut rows = stmt.query(params![key_value(camera)])?;
        let mut clips = Vec::new();
        while let Some(row) = rows.next()? {
            clips.push(record_from_row(row)?);
        }
        Ok(clips)
    }

    fn earliest_clip(&self) -> SourceResult<Option<ClipRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} ORDER BY fir_f, id LIMIT 1",
            self.select_clause()
        ))?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(record_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn max_last_frame(&self) -> SourceResult<Option<FrameNumber>> {
        let max = self.conn.query_row(
            &format!("SELECT MAX(last_f) FROM {}", self.table),
            [],
            |row| row.get::<_, Option<i64>>(0),
        )?;
        Ok(max)
    }

    fn record_count(&self) -> SourceResult<usize> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table),
            [],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(count.max(0) as usize)
    }
}

fn record_from_row(row: &Row<'_>) -> SourceResult<ClipRecord> {
    let record = ClipRecord::new(
        key_at(row, 0, "id")?,
        key_at(row, 1, "cam_id")?,
        row.get::<_, String>(2)?,
        row.get::<_, i64>(3)?,
        row.get::<_, i64>(4)?,
        row.get::<_, i64>(5)?,
        row.get::<_, String>(6)?,
    )?;
    Ok(record)
}

fn key_at(row: &Row<'_>, idx: usize, column: &str) -> SourceResult<RecordKey> {
    match row.get_ref(idx)? {
        ValueRef::Integer(v) => Ok(RecordKey::Integer(v)),
        ValueRef::Text(bytes) => Ok(RecordKey::Text(String::from_utf8_lossy(bytes).into_owned())),
        other => Err(SourceError::UnsupportedKey {
            column: column.to_string(),
            kind: other.data_type().to_string(),
        }),
    }
}

fn key_value(key: &RecordKey) -> Value {
    match key {
        RecordKey::Integer(v) => Value::Integer(*v),
        RecordKey::Text(v) => Value::Text(v.clone()),
    }
}
