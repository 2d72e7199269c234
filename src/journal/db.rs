use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::errors::{CredVaultError, Result};

use super::{Change, JournalQuery, JournalRecord};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS vault_changes (
    seq           INTEGER PRIMARY KEY AUTOINCREMENT,
    at            TEXT    NOT NULL,
    kind          TEXT    NOT NULL,
    entry_index   INTEGER,
    entries_after INTEGER NOT NULL,
    label         TEXT,
    cause         TEXT
);
CREATE INDEX IF NOT EXISTS vault_changes_at ON vault_changes (at);
";

/// SQLite-backed change journal.
pub struct Journal {
    conn: Connection,
}

impl Journal {
    /// Open the journal at `path`, creating the file and schema on first
    /// use. The file is made owner-only on unix.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(db_error("open"))?;
        conn.execute_batch(SCHEMA).map_err(db_error("schema"))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(Self { conn })
    }

    /// Append one row for `change`; `entries_after` is the vault size once
    /// the change was saved.
    pub fn record(&self, change: &Change<'_>, entries_after: usize) -> Result<()> {
        let index = change.index().map(to_sql_int);
        self.conn
            .execute(
                "INSERT INTO vault_changes (at, kind, entry_index, entries_after, label, cause)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    timestamp(Utc::now()),
                    change.kind().as_str(),
                    index,
                    to_sql_int(entries_after),
                    change.label(),
                    change.cause(),
                ],
            )
            .map_err(db_error("insert"))?;
        Ok(())
    }

    /// Rows matching `query`, newest first.
    pub fn query(&self, query: &JournalQuery) -> Result<Vec<JournalRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT seq, at, kind, entry_index, entries_after, label, cause
                 FROM vault_changes
                 WHERE (?1 IS NULL OR at >= ?1)
                   AND (?2 IS NULL OR kind = ?2)
                 ORDER BY seq DESC
                 LIMIT ?3",
            )
            .map_err(db_error("prepare"))?;

        let rows = stmt
            .query_map(
                params![
                    query.since.map(timestamp),
                    query.kind.map(|k| k.as_str()),
                    to_sql_int(query.limit),
                ],
                read_row,
            )
            .map_err(db_error("query"))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_error("read"))
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<JournalRecord> {
    let at: String = row.get(1)?;
    let kind: String = row.get(2)?;
    let index: Option<i64> = row.get(3)?;
    let entries_after: i64 = row.get(4)?;

    Ok(JournalRecord {
        seq: row.get(0)?,
        at: DateTime::parse_from_rfc3339(&at)
            .map_err(|e| conversion(1, e))?
            .with_timezone(&Utc),
        kind: kind.parse().map_err(|e| conversion(2, e))?,
        index: index
            .map(usize::try_from)
            .transpose()
            .map_err(|e| conversion(3, e))?,
        entries_after: usize::try_from(entries_after).map_err(|e| conversion(4, e))?,
        label: row.get(5)?,
        cause: row.get(6)?,
    })
}

/// Fixed-width UTC timestamps so `at >= ?` compares correctly as text.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn to_sql_int(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn conversion<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn db_error(context: &'static str) -> impl Fn(rusqlite::Error) -> CredVaultError {
    move |e| CredVaultError::JournalError(format!("{context}: {e}"))
}
