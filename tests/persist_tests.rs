//! Integration tests for loading and saving vault files.

use std::fs;

use credvault::errors::CredVaultError;
use credvault::vault::{load_or_create, save, Entry, VaultOrigin, VaultStore};
use tempfile::TempDir;

/// Helper: a vault path inside a not-yet-existing `vault/` directory.
fn vault_path() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("vault").join("vault.vlt");
    (dir, path)
}

fn sample_store() -> VaultStore {
    let mut store = VaultStore::new();
    store.add_entry(Entry::seal("alice", "wonderland", "mail", 3).unwrap());
    store.add_entry(Entry::seal("Bob", "b0b!", "Bank", 3).unwrap());
    store.add_entry(Entry::seal("carol", "c a r o l", "forum", 3).unwrap());
    store
}

// ---------------------------------------------------------------------------
// First run
// ---------------------------------------------------------------------------

#[test]
fn absent_vault_is_created_empty() {
    let (_dir, path) = vault_path();

    let loaded = load_or_create(&path).expect("create vault");
    assert!(matches!(loaded.origin, VaultOrigin::Created));
    assert_eq!(loaded.store.count(), 0);
    assert!(path.exists(), "vault file should be written immediately");

    let reloaded = load_or_create(&path).expect("reopen vault");
    assert!(matches!(reloaded.origin, VaultOrigin::Opened));
    assert_eq!(reloaded.store.count(), 0);
    assert_eq!(reloaded.store.created_at(), loaded.store.created_at());
}

// ---------------------------------------------------------------------------
// Save and reload round-trip
// ---------------------------------------------------------------------------

#[test]
fn save_and_reload_preserves_entries_and_order() {
    let (_dir, path) = vault_path();
    let store = sample_store();

    save(&store, &path).unwrap();
    let loaded = load_or_create(&path).unwrap();

    assert!(matches!(loaded.origin, VaultOrigin::Opened));
    assert_eq!(loaded.store.list(), store.list());
}

#[test]
fn second_save_replaces_first() {
    let (_dir, path) = vault_path();
    let mut store = sample_store();
    save(&store, &path).unwrap();

    store.delete_entry(0).unwrap();
    save(&store, &path).unwrap();

    let loaded = load_or_create(&path).unwrap();
    assert_eq!(loaded.store.count(), 2);
    assert_eq!(loaded.store.list()[0].username, "Bob");
}

// ---------------------------------------------------------------------------
// Corruption recovery
// ---------------------------------------------------------------------------

#[test]
fn garbage_file_is_reset_to_empty_vault() {
    let (_dir, path) = vault_path();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"this is not a vault at all, just some bytes").unwrap();

    let loaded = load_or_create(&path).expect("reset must not fail");

    match loaded.origin {
        VaultOrigin::Reset { cause } => assert!(cause.is_corruption()),
        other => panic!("expected reset, got {other:?}"),
    }
    assert_eq!(loaded.store.count(), 0);

    // The fresh vault is valid on disk.
    let reopened = load_or_create(&path).unwrap();
    assert!(matches!(reopened.origin, VaultOrigin::Opened));
}

#[test]
fn truncated_file_is_reset() {
    let (_dir, path) = vault_path();
    save(&sample_store(), &path).unwrap();

    let data = fs::read(&path).unwrap();
    fs::write(&path, &data[..data.len() / 2]).unwrap();

    let loaded = load_or_create(&path).unwrap();
    assert!(matches!(loaded.origin, VaultOrigin::Reset { .. }));
    assert!(loaded.store.is_empty());
}

#[test]
fn empty_file_is_reset() {
    let (_dir, path) = vault_path();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"").unwrap();

    let loaded = load_or_create(&path).unwrap();
    assert!(matches!(loaded.origin, VaultOrigin::Reset { .. }));
}

#[test]
fn newer_format_version_is_not_wiped() {
    let (_dir, path) = vault_path();
    save(&sample_store(), &path).unwrap();

    let mut data = fs::read(&path).unwrap();
    data[4] = 200;
    fs::write(&path, &data).unwrap();

    let err = load_or_create(&path).unwrap_err();
    assert!(matches!(err, CredVaultError::UnsupportedVersion(200)));
    assert_eq!(fs::read(&path).unwrap(), data, "file must be left alone");
}

// ---------------------------------------------------------------------------
// Failed saves
// ---------------------------------------------------------------------------

#[test]
fn failed_save_keeps_previous_file() {
    let (_dir, path) = vault_path();
    save(&sample_store(), &path).unwrap();
    let before = fs::read(&path).unwrap();

    // A directory where the temp file should go makes the write fail.
    let blocker = path.parent().unwrap().join(".vault.vlt.tmp");
    fs::create_dir_all(blocker.join("inner")).unwrap();

    let result = save(&VaultStore::new(), &path);
    assert!(matches!(result, Err(CredVaultError::Io(_))));
    assert_eq!(fs::read(&path).unwrap(), before);
    assert!(blocker.is_dir(), "a non-empty directory is not removed");
}

#[test]
fn directory_in_place_of_vault_is_an_io_error() {
    let (_dir, path) = vault_path();
    fs::create_dir_all(&path).unwrap();

    let err = load_or_create(&path).unwrap_err();
    assert!(matches!(err, CredVaultError::Io(_)));
    assert!(path.is_dir());
}

#[test]
fn failed_rename_removes_temp_file() {
    let (_dir, path) = vault_path();
    // The temp file can be written, but a non-empty directory at the
    // target makes the rename fail.
    fs::create_dir_all(path.join("occupied")).unwrap();

    let result = save(&sample_store(), &path);
    assert!(matches!(result, Err(CredVaultError::Io(_))));

    let tmp = path.parent().unwrap().join(".vault.vlt.tmp");
    assert!(!tmp.exists(), "temp file must be cleaned up");
    assert!(path.join("occupied").is_dir());
}

#[cfg(unix)]
#[test]
fn stale_temp_file_does_not_leak_its_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = vault_path();
    let tmp = path.parent().unwrap().join(".vault.vlt.tmp");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&tmp, b"left over from an interrupted save").unwrap();
    fs::set_permissions(&tmp, fs::Permissions::from_mode(0o644)).unwrap();

    save(&sample_store(), &path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    assert!(!tmp.exists());
    assert_eq!(load_or_create(&path).unwrap().store.count(), 3);
}
