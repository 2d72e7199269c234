use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CredVaultError, Result};

/// Project-level configuration, loaded from `credvault.toml`.
///
/// Every field has a sensible default so credvault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// How many places the cipher rotates each character (default: 3).
    #[serde(default = "default_cipher_shift")]
    pub cipher_shift: i64,

    /// Directory (relative to project root) holding the vault file.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// File name of the vault inside `vault_dir`.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Where failures are appended as plain text lines.
    #[serde(default = "default_log_path")]
    pub log_path: String,

    /// SQLite journal of vault changes.
    #[serde(default = "default_journal_path")]
    pub journal_path: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_cipher_shift() -> i64 {
    3
}

fn default_vault_dir() -> String {
    "vault".to_string()
}

fn default_vault_file() -> String {
    "vault.vlt".to_string()
}

fn default_log_path() -> String {
    "log.txt".to_string()
}

fn default_journal_path() -> String {
    "journal.db".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            cipher_shift: default_cipher_shift(),
            vault_dir: default_vault_dir(),
            vault_file: default_vault_file(),
            log_path: default_log_path(),
            journal_path: default_journal_path(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = "credvault.toml";

    /// Load settings from `<project_dir>/credvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load settings from an explicit file. The file must exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            CredVaultError::ConfigError(format!("Failed to read {}: {e}", config_path.display()))
        })?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            CredVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Build the full path to the vault file.
    ///
    /// Example: `project_dir/vault/vault.vlt`
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir).join(&self.vault_file)
    }

    /// Full path to the error log.
    pub fn log_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.log_path)
    }

    /// Full path to the change journal.
    pub fn journal_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.journal_path)
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("vault_file", &self.vault_file),
            ("log_path", &self.log_path),
            ("journal_path", &self.journal_path),
        ] {
            if value.trim().is_empty() {
                return Err(CredVaultError::ConfigError(format!("{key} cannot be empty")));
            }
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
