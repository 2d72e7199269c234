use thiserror::Error;

/// All errors that can occur in credvault.
#[derive(Debug, Error)]
pub enum CredVaultError {
    // --- Cipher errors ---
    #[error("Character {ch:?} at position {position} is not in the cipher alphabet")]
    InvalidCharacter { ch: char, position: usize },

    // --- Vault errors ---
    #[error("Entry index {index} is out of range (vault holds {count} entries)")]
    OutOfRange { index: i64, count: usize },

    #[error("Vault file is corrupt: {0}")]
    CorruptStore(String),

    #[error("Unsupported vault format version {0}")]
    UnsupportedVersion(u8),

    #[error("Credentials for '{username}' on '{resource}' already exist (use --force to overwrite)")]
    DuplicateEntry { username: String, resource: String },

    #[error("Invalid field: {0}")]
    InvalidField(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Journal error: {0}")]
    JournalError(String),
}

impl CredVaultError {
    /// Returns `true` for decode failures that the loader recovers from
    /// by resetting the vault.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::CorruptStore(_))
    }
}

/// Convenience type alias for credvault results.
pub type Result<T> = std::result::Result<T, CredVaultError>;
