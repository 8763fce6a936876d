//! Status Sink: append-only persistent store of compliance records.
//!
//! The write path is hot — one append per visible face per frame,
//! unthrottled — so each append is one short, independently-committed
//! insert. Concurrent readers (the query API) open their own connections
//! and observe only committed records; WAL journaling serializes the rest.

use anyhow::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::error::FusionError;

/// One persisted compliance record, in insertion order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub timestamp: String,
    pub status_text: String,
}

/// Append-only log of compliance verdicts.
pub trait StatusSink: Send {
    /// Append one record. `timestamp` is `YYYY-MM-DD HH:MM:SS`.
    fn append(&mut self, timestamp: &str, status_text: &str) -> Result<()>;

    /// All records in insertion order.
    fn query_all(&self) -> Result<Vec<StatusRecord>>;

    /// Reset prior session data. Called once at process start, never
    /// mid-stream.
    fn clear(&mut self) -> Result<()>;
}

pub struct SqliteStatusSink {
    conn: Connection,
}

impl SqliteStatusSink {
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let mut sink = Self { conn };
        sink.ensure_schema()?;
        Ok(sink)
    }

    fn ensure_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;

            CREATE TABLE IF NOT EXISTS helmet_status (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              timestamp TEXT NOT NULL,
              status_text TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

impl StatusSink for SqliteStatusSink {
    fn append(&mut self, timestamp: &str, status_text: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO helmet_status(timestamp, status_text) VALUES (?1, ?2)",
                params![timestamp, status_text],
            )
            .map_err(|e| FusionError::SinkWriteFailure(e.to_string()))?;
        Ok(())
    }

    fn query_all(&self) -> Result<Vec<StatusRecord>> {
        let run = || -> rusqlite::Result<Vec<StatusRecord>> {
            let mut stmt = self
                .conn
                .prepare("SELECT timestamp, status_text FROM helmet_status ORDER BY id ASC")?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(StatusRecord {
                    timestamp: row.get(0)?,
                    status_text: row.get(1)?,
                });
            }
            Ok(out)
        };
        Ok(run().map_err(|e| FusionError::SinkReadFailure(e.to_string()))?)
    }

    fn clear(&mut self) -> Result<()> {
        self.conn
            .execute("DELETE FROM helmet_status", [])
            .map_err(|e| FusionError::SinkWriteFailure(e.to_string()))?;
        Ok(())
    }
}

/// In-memory sink for tests and dry runs.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStatusSink {
    records: Vec<StatusRecord>,
}

impl InMemoryStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl StatusSink for InMemoryStatusSink {
    fn append(&mut self, timestamp: &str, status_text: &str) -> Result<()> {
        self.records.push(StatusRecord {
            timestamp: timestamp.to_string(),
            status_text: status_text.to_string(),
        });
        Ok(())
    }

    fn query_all(&self) -> Result<Vec<StatusRecord>> {
        Ok(self.records.clone())
    }

    fn clear(&mut self) -> Result<()> {
        self.records.clear();
        Ok(())
    }
}
