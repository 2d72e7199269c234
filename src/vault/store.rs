//! In-memory credential store.
//!
//! `VaultStore` is an ordered list of entries. Insertion order is kept and
//! entries are addressed by their 0-based position, which is what the menu
//! shows next to each row.
//!
//! The store does not enforce uniqueness on its own: callers check
//! `find_duplicate` first and then choose between `add_entry` and
//! `overwrite_entry`.

use chrono::{DateTime, Utc};

use crate::errors::{CredVaultError, Result};

use super::entry::Entry;

/// The authoritative set of credentials for one user.
#[derive(Debug, Clone)]
pub struct VaultStore {
    /// Entries in insertion order.
    entries: Vec<Entry>,

    /// When this vault was first created.
    created_at: DateTime<Utc>,
}

impl Default for VaultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create an empty store stamped with the current time.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Rebuild a store from decoded parts (used by the file loader).
    pub fn from_parts(entries: Vec<Entry>, created_at: DateTime<Utc>) -> Self {
        Self {
            entries,
            created_at,
        }
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Index of the first entry with the same username and resource as
    /// `candidate` (case-insensitive), if any.
    pub fn find_duplicate(&self, candidate: &Entry) -> Option<usize> {
        self.entries.iter().position(|e| e.same_key(candidate))
    }

    /// Append an entry. No duplicate check is performed here.
    pub fn add_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Replace the first entry matching `replacement`'s username and
    /// resource, keeping its position.
    ///
    /// Returns the replaced index, or `None` (and changes nothing) when
    /// there is no match.
    pub fn overwrite_entry(&mut self, replacement: Entry) -> Option<usize> {
        let index = self.find_duplicate(&replacement)?;
        self.entries[index] = replacement;
        Some(index)
    }

    /// Remove and return the entry at `index`.
    ///
    /// Negative indexes and anything `>= count()` fail with `OutOfRange`
    /// and leave the store untouched.
    pub fn delete_entry(&mut self, index: i64) -> Result<Entry> {
        let count = self.entries.len();
        let position = usize::try_from(index)
            .ok()
            .filter(|&i| i < count)
            .ok_or(CredVaultError::OutOfRange { index, count })?;

        Ok(self.entries.remove(position))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the number of entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only view of all entries in insertion order.
    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the entry at `index`, if there is one.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Returns the vault creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
