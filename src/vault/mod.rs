//! Vault module: credential storage.
//!
//! This module provides:
//! - The `Entry` record type (`entry`)
//! - The in-memory `VaultStore` and its mutation rules (`store`)
//! - Binary vault file format with a SHA-256 checksum (`format`)
//! - Load-or-create, atomic save, and corrupt-file recovery (`persist`)

pub mod entry;
pub mod format;
pub mod persist;
pub mod store;

// Re-export the most commonly used items.
pub use entry::Entry;
pub use format::{VaultHeader, CURRENT_VERSION};
pub use persist::{load_or_create, load_or_create_with, save, LoadedVault, VaultOrigin};
pub use store::VaultStore;
