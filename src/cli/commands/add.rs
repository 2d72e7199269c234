//! `credvault add`: store a credential, asking before an overwrite.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{confirm, prompt_secret, prompt_text, validate_field, Cli, Session};
use crate::errors::{CredVaultError, Result};
use crate::journal::Change;
use crate::vault::{Entry, VaultStore};

/// What happened to a credential handed to `store_credential`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended as a new entry at this index.
    Added(usize),
    /// Replaced the existing entry at this index.
    Overwritten(usize),
    /// A matching entry existed and the caller declined to overwrite it.
    Kept,
}

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    username: Option<&str>,
    resource: Option<&str>,
    secret: Option<&str>,
    force: bool,
) -> Result<()> {
    let mut session = Session::open(cli)?;

    let username = match username {
        Some(u) => u.to_string(),
        None => prompt_text("Username")?,
    };
    let resource = match resource {
        Some(r) => r.to_string(),
        None => prompt_text("Resource")?,
    };

    // Determine the secret from one of three sources.
    let plaintext = if let Some(s) = secret {
        // Source 1: Inline value on the command line.
        output::warning("Secret provided on command line; it may appear in shell history.");
        Zeroizing::new(s.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
    } else {
        // Source 3: Interactive hidden prompt (default).
        prompt_secret("Secret")?
    };

    let interactive = io::stdin().is_terminal();
    add_credential(&mut session, &username, &plaintext, &resource, |existing| {
        if force {
            Ok(true)
        } else if interactive {
            ask_overwrite(existing)
        } else {
            Err(CredVaultError::DuplicateEntry {
                username: existing.username.clone(),
                resource: existing.resource.clone(),
            })
        }
    })
}

/// Prompt for all three fields and store the credential. Used by the menu.
pub fn interactive(session: &mut Session) -> Result<()> {
    let username = prompt_text("Username")?;
    let plaintext = prompt_secret("Secret")?;
    let resource = prompt_text("Resource")?;

    add_credential(session, &username, &plaintext, &resource, ask_overwrite)
}

/// Validate, obfuscate, store, save, and report one credential.
fn add_credential<F>(
    session: &mut Session,
    username: &str,
    plaintext: &str,
    resource: &str,
    confirm_overwrite: F,
) -> Result<()>
where
    F: FnOnce(&Entry) -> Result<bool>,
{
    let username = validate_field("username", username)?;
    let resource = validate_field("resource", resource)?;
    let entry = Entry::seal(&username, plaintext, &resource, session.shift())?;

    let before = session.store.clone();
    let outcome = store_credential(&mut session.store, entry.clone(), confirm_overwrite)?;

    let (change, index) = match outcome {
        AddOutcome::Kept => {
            output::info("Kept the existing credentials; nothing was changed.");
            return Ok(());
        }
        AddOutcome::Added(index) => (Change::Added { index, entry: &entry }, index),
        AddOutcome::Overwritten(index) => (Change::Overwritten { index, entry: &entry }, index),
    };

    session.commit(before)?;
    session.record(change);

    output::success(&format!(
        "Credentials stored as entry {index} ({} total), secret obfuscated as '{}'",
        session.store.count(),
        entry.secret
    ));

    Ok(())
}

/// Insert `entry`, or overwrite its duplicate if `confirm_overwrite`
/// agrees. The closure receives the entry that would be replaced.
pub fn store_credential<F>(
    store: &mut VaultStore,
    entry: Entry,
    confirm_overwrite: F,
) -> Result<AddOutcome>
where
    F: FnOnce(&Entry) -> Result<bool>,
{
    let Some(index) = store.find_duplicate(&entry) else {
        store.add_entry(entry);
        return Ok(AddOutcome::Added(store.count() - 1));
    };

    if !confirm_overwrite(&store.list()[index])? {
        return Ok(AddOutcome::Kept);
    }

    Ok(store
        .overwrite_entry(entry)
        .map_or(AddOutcome::Kept, AddOutcome::Overwritten))
}

fn ask_overwrite(existing: &Entry) -> Result<bool> {
    output::warning(&format!(
        "Credentials for '{}' on '{}' are already in the vault.",
        existing.username, existing.resource
    ));
    confirm("Overwrite them?")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher;

    use crate::config::Settings;
    use crate::vault::load_or_create;

    fn session_with_bob(dir: &std::path::Path) -> Session {
        let mut session = Session::open_in(dir.to_path_buf(), Settings::default()).unwrap();
        add_credential(&mut session, "bob", "secret1", "mail", |_| Ok(true)).unwrap();
        session
    }

    fn block_saves(session: &Session) {
        let tmp_file = session.vault_path.with_file_name(".vault.vlt.tmp");
        std::fs::create_dir_all(tmp_file.join("blocker")).unwrap();
    }

    #[test]
    fn failed_save_drops_the_new_entry() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut session = session_with_bob(dir.path());
        block_saves(&session);

        let result = add_credential(&mut session, "eve", "pw", "forum", |_| Ok(true));

        assert!(result.is_err());
        assert_eq!(session.store.count(), 1);
        let on_disk = load_or_create(&session.vault_path).unwrap().store;
        assert_eq!(on_disk.list(), session.store.list());
    }

    #[test]
    fn failed_save_restores_the_overwritten_entry() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut session = session_with_bob(dir.path());
        block_saves(&session);

        let result = add_credential(&mut session, "BOB", "secret2", "MAIL", |_| Ok(true));

        assert!(result.is_err());
        assert_eq!(session.store.list()[0].reveal(3).unwrap(), "secret1");
        assert_eq!(session.store.list()[0].username, "bob");
    }

    #[test]
    fn new_credential_is_appended() {
        let mut store = VaultStore::new();
        let outcome =
            store_credential(&mut store, Entry::new("bob", "x", "mail"), |_| Ok(true)).unwrap();

        assert_eq!(outcome, AddOutcome::Added(0));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn confirm_is_not_called_without_duplicate() {
        let mut store = VaultStore::new();
        store_credential(&mut store, Entry::new("bob", "x", "mail"), |_| {
            panic!("no duplicate, no prompt")
        })
        .unwrap();
    }

    #[test]
    fn duplicate_is_overwritten_when_confirmed() {
        let mut store = VaultStore::new();
        let first = Entry::seal("bob", "secret1", "mail", 3).unwrap();
        let second = Entry::seal("BOB", "secret2", "MAIL", 3).unwrap();

        store_credential(&mut store, first, |_| Ok(true)).unwrap();
        let outcome = store_credential(&mut store, second, |existing| {
            assert_eq!(existing.username, "bob");
            Ok(true)
        })
        .unwrap();

        assert_eq!(outcome, AddOutcome::Overwritten(0));
        assert_eq!(store.count(), 1);
        assert_eq!(store.list()[0].secret, cipher::encrypt("secret2", 3).unwrap());
    }

    #[test]
    fn duplicate_is_kept_when_declined() {
        let mut store = VaultStore::new();
        store_credential(&mut store, Entry::new("bob", "old", "mail"), |_| Ok(true)).unwrap();

        let outcome =
            store_credential(&mut store, Entry::new("bob", "new", "mail"), |_| Ok(false)).unwrap();

        assert_eq!(outcome, AddOutcome::Kept);
        assert_eq!(store.list()[0].secret, "old");
    }

    #[test]
    fn confirm_errors_propagate_and_leave_store_untouched() {
        let mut store = VaultStore::new();
        store_credential(&mut store, Entry::new("bob", "old", "mail"), |_| Ok(true)).unwrap();

        let result = store_credential(&mut store, Entry::new("bob", "new", "mail"), |e| {
            Err(CredVaultError::DuplicateEntry {
                username: e.username.clone(),
                resource: e.resource.clone(),
            })
        });

        assert!(matches!(result, Err(CredVaultError::DuplicateEntry { .. })));
        assert_eq!(store.list()[0].secret, "old");
    }
}
