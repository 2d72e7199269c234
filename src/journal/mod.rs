//! Change journal: one row per vault mutation.
//!
//! Every successful save is followed by a journal row describing what
//! changed: which entry index was touched, how many entries the vault held
//! afterwards, and, for a reset, why the old vault was discarded. Rows
//! name an entry by its `username@resource` label; secrets never reach the
//! journal, not even in obfuscated form.
//!
//! The SQLite backend lives behind the `journal` feature. Without it the
//! types here still exist so callers compile, and nothing is recorded.

#[cfg(feature = "journal")]
mod db;

#[cfg(feature = "journal")]
pub use db::Journal;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::errors::{CredVaultError, Result};
use crate::vault::Entry;

/// Kind of change stored in a journal row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EventKind {
    Created,
    Added,
    Overwritten,
    Deleted,
    Reset,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Added => "added",
            EventKind::Overwritten => "overwritten",
            EventKind::Deleted => "deleted",
            EventKind::Reset => "reset",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = CredVaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "created" => Ok(EventKind::Created),
            "added" => Ok(EventKind::Added),
            "overwritten" => Ok(EventKind::Overwritten),
            "deleted" => Ok(EventKind::Deleted),
            "reset" => Ok(EventKind::Reset),
            other => Err(CredVaultError::JournalError(format!(
                "unknown event kind '{other}'"
            ))),
        }
    }
}

/// A vault mutation about to be journaled.
#[derive(Debug, Clone, Copy)]
pub enum Change<'a> {
    /// A fresh vault file was bootstrapped.
    Created,
    Added { index: usize, entry: &'a Entry },
    Overwritten { index: usize, entry: &'a Entry },
    Deleted { index: usize, entry: &'a Entry },
    /// A corrupt vault was discarded and replaced by an empty one.
    Reset { cause: &'a CredVaultError },
}

impl Change<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            Change::Created => EventKind::Created,
            Change::Added { .. } => EventKind::Added,
            Change::Overwritten { .. } => EventKind::Overwritten,
            Change::Deleted { .. } => EventKind::Deleted,
            Change::Reset { .. } => EventKind::Reset,
        }
    }

    /// Entry index the change applied to, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            Change::Added { index, .. }
            | Change::Overwritten { index, .. }
            | Change::Deleted { index, .. } => Some(*index),
            Change::Created | Change::Reset { .. } => None,
        }
    }

    /// `username@resource` of the touched entry.
    pub fn label(&self) -> Option<String> {
        match self {
            Change::Added { entry, .. }
            | Change::Overwritten { entry, .. }
            | Change::Deleted { entry, .. } => {
                Some(format!("{}@{}", entry.username, entry.resource))
            }
            Change::Created | Change::Reset { .. } => None,
        }
    }

    pub fn cause(&self) -> Option<String> {
        match self {
            Change::Reset { cause } => Some(cause.to_string()),
            _ => None,
        }
    }
}

/// One row read back from the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalRecord {
    pub seq: i64,
    pub at: DateTime<Utc>,
    pub kind: EventKind,
    pub index: Option<usize>,
    pub entries_after: usize,
    pub label: Option<String>,
    pub cause: Option<String>,
}

/// Filter for `Journal::query`. Results come newest first.
#[derive(Debug, Clone, Copy)]
pub struct JournalQuery {
    pub limit: usize,
    pub since: Option<DateTime<Utc>>,
    pub kind: Option<EventKind>,
}

impl Default for JournalQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            since: None,
            kind: None,
        }
    }
}
