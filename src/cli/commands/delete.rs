//! `credvault delete`: remove a credential by its list number.

use crate::cli::output;
use crate::cli::{confirm, Cli, Session};
use crate::errors::{CredVaultError, Result};
use crate::journal::Change;
use crate::vault::{Entry, VaultStore};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, index: i64, force: bool) -> Result<()> {
    let mut session = Session::open(cli)?;

    // Fail on a bad index before asking anything.
    let target = &session.store.list()[checked_index(&session.store, index)?];

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let prompt = format!(
            "Delete entry {index} ('{}' on '{}')?",
            target.username, target.resource
        );
        if !confirm(&prompt)? {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let removed = remove_entry(&mut session, index)?;
    output::success(&format!(
        "Deleted entry {index} ('{}' on '{}')",
        removed.username, removed.resource
    ));

    Ok(())
}

/// Delete the entry at `index`, save the vault, and journal the change.
/// If the save fails the entry stays in the store.
///
/// Shared with the menu's view screen.
pub fn remove_entry(session: &mut Session, index: i64) -> Result<Entry> {
    let position = checked_index(&session.store, index)?;

    let before = session.store.clone();
    let removed = session.store.delete_entry(index)?;
    session.commit(before)?;
    session.record(Change::Deleted {
        index: position,
        entry: &removed,
    });
    Ok(removed)
}

fn checked_index(store: &VaultStore, index: i64) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < store.count())
        .ok_or(CredVaultError::OutOfRange {
            index,
            count: store.count(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::vault::load_or_create;
    use tempfile::TempDir;

    fn session_with(dir: &std::path::Path, users: &[&str]) -> Session {
        let mut session = Session::open_in(dir.to_path_buf(), Settings::default()).unwrap();
        for user in users {
            session.store.add_entry(Entry::new(*user, "x", "mail"));
        }
        session.save().unwrap();
        session
    }

    #[test]
    fn removed_entry_is_gone_from_memory_and_disk() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with(dir.path(), &["alice", "bob"]);

        let removed = remove_entry(&mut session, 0).unwrap();

        assert_eq!(removed.username, "alice");
        let on_disk = load_or_create(&session.vault_path).unwrap().store;
        assert_eq!(on_disk.list(), session.store.list());
        assert_eq!(on_disk.count(), 1);
    }

    #[test]
    fn failed_save_keeps_the_entry() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with(dir.path(), &["alice", "bob"]);
        let tmp_file = session.vault_path.with_file_name(".vault.vlt.tmp");
        std::fs::create_dir_all(tmp_file.join("blocker")).unwrap();

        assert!(remove_entry(&mut session, 0).is_err());

        let on_disk = load_or_create(&session.vault_path).unwrap().store;
        assert_eq!(session.store.count(), 2);
        assert_eq!(on_disk.list(), session.store.list());
    }

    #[test]
    fn bad_indexes_are_out_of_range() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with(dir.path(), &["alice"]);

        for index in [1, -1, i64::MAX] {
            assert!(matches!(
                remove_entry(&mut session, index),
                Err(CredVaultError::OutOfRange { count: 1, .. })
            ));
        }
        assert_eq!(session.store.count(), 1);
    }
}
