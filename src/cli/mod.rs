//! CLI module: Clap argument parser, session handling, prompts, output
//! helpers, command implementations, and the interactive menu.

pub mod commands;
pub mod menu;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{CredVaultError, Result};
use crate::journal::{Change, EventKind};
use crate::logging::LogFile;
use crate::vault::{self, VaultOrigin, VaultStore};

/// credvault CLI: local credential vault.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Local credential vault (secrets are obfuscated, not encrypted)",
    version
)]
pub struct Cli {
    /// Subcommand to run (default: interactive menu)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: ./credvault.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Vault directory, overriding the config file
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Open the interactive menu
    Menu,

    /// Add a credential (asks before overwriting an existing one)
    Add {
        /// Username (omit for interactive prompt)
        #[arg(short, long)]
        username: Option<String>,

        /// Resource the credential is for, e.g. a site or host
        #[arg(short, long)]
        resource: Option<String>,

        /// Secret value (omit for piped stdin or hidden prompt)
        #[arg(short, long)]
        secret: Option<String>,

        /// Overwrite an existing entry without asking
        #[arg(short, long)]
        force: bool,
    },

    /// List all credentials
    List {
        /// Show secrets in clear text
        #[arg(long)]
        reveal: bool,
    },

    /// Delete a credential by its list number
    Delete {
        /// Entry number as shown by `list`
        #[arg(allow_negative_numbers = true)]
        index: i64,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show the journal of vault changes
    History {
        /// Number of changes to show
        #[arg(long, default_value = "50")]
        last: usize,

        /// Only changes newer than this (e.g. 30m, 12h, 7d, 2w)
        #[arg(long)]
        since: Option<String>,

        /// Only changes of this kind
        #[arg(long, value_enum)]
        event: Option<EventKind>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum, ignore_case = true)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Everything a command needs once the vault is loaded.
///
/// The session owns the only `VaultStore` of the process; handlers get it
/// through `&mut Session`.
pub struct Session {
    pub settings: Settings,
    pub project_dir: PathBuf,
    pub vault_path: PathBuf,
    pub store: VaultStore,
}

impl Session {
    /// Resolve settings for the current directory and open the vault.
    pub fn open(cli: &Cli) -> Result<Self> {
        let project_dir = std::env::current_dir()?;
        let settings = load_settings(cli, &project_dir)?;
        Self::open_in(project_dir, settings)
    }

    /// Load (or create, or reset) the vault described by `settings`.
    ///
    /// A corrupt vault is announced on stderr and in the error log before
    /// it is deleted.
    pub fn open_in(project_dir: PathBuf, settings: Settings) -> Result<Self> {
        let vault_path = settings.vault_path(&project_dir);

        let loaded = vault::load_or_create_with(&vault_path, |cause| {
            let msg = format!("{cause}; the vault will be reset and all stored credentials lost");
            output::warning(&msg);
            tracing::warn!(vault = %vault_path.display(), "{msg}");
        })?;

        let session = Self {
            settings,
            project_dir,
            vault_path,
            store: loaded.store,
        };

        match loaded.origin {
            VaultOrigin::Opened => {}
            VaultOrigin::Created => {
                output::info(&format!("Created vault at {}", session.vault_path.display()));
                session.record(Change::Created);
            }
            VaultOrigin::Reset { cause } => {
                output::warning(&format!(
                    "Started a fresh vault at {}",
                    session.vault_path.display()
                ));
                session.record(Change::Reset { cause: &cause });
            }
        }

        Ok(session)
    }

    /// The cipher shift from the settings.
    pub fn shift(&self) -> i64 {
        self.settings.cipher_shift
    }

    /// Write the whole store back to disk.
    pub fn save(&self) -> Result<()> {
        vault::save(&self.store, &self.vault_path)
    }

    /// Save a mutated store. If the save fails, `before` (the store as it
    /// was prior to the mutation) is put back so memory matches disk again.
    pub fn commit(&mut self, before: VaultStore) -> Result<()> {
        if let Err(e) = self.save() {
            self.store = before;
            return Err(e);
        }
        Ok(())
    }

    /// Where errors of this session are logged.
    pub fn log_path(&self) -> PathBuf {
        self.settings.log_path(&self.project_dir)
    }

    /// Append a saved change to the journal. A journal that cannot be
    /// written is logged and otherwise ignored.
    pub fn record(&self, change: Change<'_>) {
        #[cfg(feature = "journal")]
        {
            let path = self.settings.journal_path(&self.project_dir);
            let recorded = crate::journal::Journal::open(&path)
                .and_then(|journal| journal.record(&change, self.store.count()));
            if let Err(e) = recorded {
                tracing::warn!(change = %change.kind(), "change not journaled: {e}");
            }
        }

        #[cfg(not(feature = "journal"))]
        let _ = change;
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from `--config` or `<project_dir>/credvault.toml`, then
/// apply the `--vault-dir` override.
pub fn load_settings(cli: &Cli, project_dir: &Path) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(&project_dir.join(path))?,
        None => Settings::load(project_dir)?,
    };

    if let Some(dir) = &cli.vault_dir {
        settings.vault_dir = dir.clone();
    }

    Ok(settings)
}

/// The error log for this invocation. Falls back to the default location
/// when the settings themselves cannot be loaded.
pub fn log_file(cli: &Cli) -> LogFile {
    let project_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let settings = load_settings(cli, &project_dir).unwrap_or_default();
    LogFile::new(settings.log_path(&project_dir))
}

/// Prompt for a line of visible text.
pub fn prompt_text(label: &str) -> Result<String> {
    dialoguer::Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .map_err(|e| CredVaultError::CommandFailed(format!("{label} prompt: {e}")))
}

/// Prompt for a secret without echoing it.
///
/// Returns `Zeroizing<String>` so the plaintext is wiped from memory on drop.
pub fn prompt_secret(label: &str) -> Result<Zeroizing<String>> {
    let secret = dialoguer::Password::new()
        .with_prompt(label)
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("{label} prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Ask a yes/no question.
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("confirm prompt: {e}")))
}

/// Trim a username or resource and make sure something is left.
pub fn validate_field(name: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CredVaultError::InvalidField(format!("{name} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
