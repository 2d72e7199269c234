//! Binary vault file format and checksum verification.
//!
//! A `.vlt` file has this layout:
//!
//! ```text
//! [CVLT: 4 bytes][version: 1 byte][header_len: 4 bytes LE][header JSON][entries JSON][SHA-256: 32 bytes]
//! ```
//!
//! - **Magic** (`CVLT`): identifies the file as a credvault vault.
//! - **Version**: format version (currently `1`).
//! - **Header length**: little-endian u32 telling us where the header
//!   JSON ends and the entries JSON begins.
//! - **Header JSON**: serialized `VaultHeader`.
//! - **Entries JSON**: serialized `Vec<EntryRecord>`.
//! - **SHA-256**: 32-byte digest over header + entries bytes.
//!
//! The checksum is there to catch truncation and bit rot, not tampering:
//! anyone can recompute it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::entry::Entry;
use super::store::VaultStore;
use crate::errors::{CredVaultError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every vault file.
const MAGIC: &[u8; 4] = b"CVLT";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Size of the checksum appended to the file (SHA-256 = 32 bytes).
const CHECKSUM_LEN: usize = 32;

/// Fixed-size prefix: 4 (magic) + 1 (version) + 4 (header_len).
const PREFIX_LEN: usize = 9;

// ---------------------------------------------------------------------------
// Schema types
// ---------------------------------------------------------------------------

/// Metadata stored at the beginning of a vault file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultHeader {
    /// Format version, repeated from the binary prefix.
    pub version: u8,

    /// When this vault was first created.
    pub created_at: DateTime<Utc>,

    /// When this file was written.
    pub saved_at: DateTime<Utc>,

    /// Number of records in the entries section.
    pub entry_count: usize,
}

/// On-disk shape of one entry. Kept separate from `Entry` so the
/// in-memory type can change without silently changing the file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryRecord {
    username: String,
    secret: String,
    resource: String,
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            username: entry.username.clone(),
            secret: entry.secret.clone(),
            resource: entry.resource.clone(),
        }
    }
}

impl From<EntryRecord> for Entry {
    fn from(record: EntryRecord) -> Self {
        Entry::new(record.username, record.secret, record.resource)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Serialize a whole store into the binary envelope.
pub fn encode(store: &VaultStore) -> Result<Vec<u8>> {
    let records: Vec<EntryRecord> = store.list().iter().map(EntryRecord::from).collect();
    let header = VaultHeader {
        version: CURRENT_VERSION,
        created_at: store.created_at(),
        saved_at: Utc::now(),
        entry_count: records.len(),
    };

    let header_bytes = serde_json::to_vec(&header)
        .map_err(|e| CredVaultError::SerializationError(format!("header: {e}")))?;
    let entries_bytes = serde_json::to_vec(&records)
        .map_err(|e| CredVaultError::SerializationError(format!("entries: {e}")))?;

    let header_len = u32::try_from(header_bytes.len()).map_err(|_| {
        CredVaultError::SerializationError(format!(
            "header length {} exceeds u32::MAX",
            header_bytes.len()
        ))
    })?;

    let checksum = compute_checksum(&header_bytes, &entries_bytes);

    let total = PREFIX_LEN + header_bytes.len() + entries_bytes.len() + CHECKSUM_LEN;
    let mut buf = Vec::with_capacity(total);

    buf.extend_from_slice(MAGIC); // 4 bytes
    buf.push(CURRENT_VERSION); // 1 byte
    buf.extend_from_slice(&header_len.to_le_bytes()); // 4 bytes LE
    buf.extend_from_slice(&header_bytes); // header JSON
    buf.extend_from_slice(&entries_bytes); // entries JSON
    buf.extend_from_slice(&checksum); // 32 bytes

    Ok(buf)
}

/// Parse a binary envelope back into a store.
///
/// Any structural problem is reported as `CorruptStore`. A well-formed
/// file with an unknown version is `UnsupportedVersion` instead, so the
/// loader never wipes a vault written by a newer release.
pub fn decode(data: &[u8]) -> Result<VaultStore> {
    if data.len() < PREFIX_LEN + CHECKSUM_LEN {
        return Err(corrupt("file too small to be a valid vault"));
    }

    // --- Parse the fixed-size prefix ---

    if &data[0..4] != MAGIC {
        return Err(corrupt("missing CVLT magic bytes"));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(CredVaultError::UnsupportedVersion(version));
    }

    let header_len_u32 = u32::from_le_bytes([data[5], data[6], data[7], data[8]]);
    let header_len = usize::try_from(header_len_u32)
        .map_err(|_| corrupt("header length exceeds platform address space"))?;

    let header_end = PREFIX_LEN
        .checked_add(header_len)
        .filter(|&end| end <= data.len() - CHECKSUM_LEN)
        .ok_or_else(|| corrupt("header length exceeds file size"))?;

    // --- Split the variable-length sections ---

    let entries_end = data.len() - CHECKSUM_LEN;
    let header_bytes = &data[PREFIX_LEN..header_end];
    let entries_bytes = &data[header_end..entries_end];
    let stored_checksum = &data[entries_end..];

    if compute_checksum(header_bytes, entries_bytes).as_slice() != stored_checksum {
        return Err(corrupt("checksum mismatch"));
    }

    // --- Deserialize ---

    let header: VaultHeader = serde_json::from_slice(header_bytes)
        .map_err(|e| corrupt(&format!("header JSON: {e}")))?;

    let records: Vec<EntryRecord> = serde_json::from_slice(entries_bytes)
        .map_err(|e| corrupt(&format!("entries JSON: {e}")))?;

    if header.version != version {
        return Err(corrupt(&format!(
            "header version {} disagrees with prefix version {version}",
            header.version
        )));
    }

    if header.entry_count != records.len() {
        return Err(corrupt(&format!(
            "header promises {} entries, found {}",
            header.entry_count,
            records.len()
        )));
    }

    let entries = records.into_iter().map(Entry::from).collect();
    Ok(VaultStore::from_parts(entries, header.created_at))
}

/// SHA-256 over header + entries bytes.
fn compute_checksum(header_bytes: &[u8], entries_bytes: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(header_bytes);
    hasher.update(entries_bytes);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hasher.finalize());
    out
}

fn corrupt(reason: &str) -> CredVaultError {
    CredVaultError::CorruptStore(reason.to_string())
}
