//! Whole-store load and save.
//!
//! - `save` writes the full store to a temp file in the same directory,
//!   syncs it, and renames it over the target, so readers never see a
//!   half-written vault.
//! - `load_or_create` opens an existing vault or bootstraps an empty one.
//!   A corrupt file is deleted and replaced by a fresh vault, once.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::errors::{CredVaultError, Result};

use super::format;
use super::store::VaultStore;

/// How `load_or_create` obtained the store it returned.
#[derive(Debug)]
pub enum VaultOrigin {
    /// An existing vault file was read.
    Opened,
    /// No vault existed; an empty one was written.
    Created,
    /// The vault file was corrupt, got deleted, and an empty one was
    /// written in its place. All previous entries are gone.
    Reset { cause: CredVaultError },
}

/// A store together with where it came from.
#[derive(Debug)]
pub struct LoadedVault {
    pub store: VaultStore,
    pub origin: VaultOrigin,
}

/// Open the vault at `path`, creating or resetting it as needed.
///
/// Same as `load_or_create_with` without a reset observer; inspect
/// `LoadedVault::origin` to find out whether data was lost.
pub fn load_or_create(path: &Path) -> Result<LoadedVault> {
    load_or_create_with(path, |_| {})
}

/// Open the vault at `path`, creating or resetting it as needed.
///
/// `on_reset` is called with the decode error *before* the corrupt vault
/// is deleted. After deletion the bootstrap is retried exactly once; if
/// that fails too, its error is returned.
///
/// I/O errors while reading (permissions, a directory in the way) and
/// unknown format versions are returned as-is and never trigger a reset.
pub fn load_or_create_with<F>(path: &Path, on_reset: F) -> Result<LoadedVault>
where
    F: FnOnce(&CredVaultError),
{
    match bootstrap(path) {
        Err(cause) if cause.is_corruption() => {
            on_reset(&cause);
            reset_storage(path)?;

            let loaded = bootstrap(path)?;
            Ok(LoadedVault {
                store: loaded.store,
                origin: VaultOrigin::Reset { cause },
            })
        }
        other => other,
    }
}

/// Write the whole store to `path` atomically.
///
/// Parent directories are created when missing. On failure the temp
/// file is removed and any previous vault at `path` is left untouched.
pub fn save(store: &VaultStore, path: &Path) -> Result<()> {
    let bytes = format::encode(store)?;

    if let Some(parent) = non_empty_parent(path) {
        fs::create_dir_all(parent)?;
    }

    // A stale temp file from an interrupted save keeps its old mode
    // through a truncate, so start from a fresh one.
    let tmp_path = temp_path(path);
    remove_if_present(&tmp_path)?;

    if let Err(e) = write_synced(&tmp_path, &bytes).and_then(|()| fs::rename(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    sync_parent(path);
    Ok(())
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn bootstrap(path: &Path) -> Result<LoadedVault> {
    if path.exists() {
        let store = read_store(path)?;
        return Ok(LoadedVault {
            store,
            origin: VaultOrigin::Opened,
        });
    }

    let store = VaultStore::new();
    save(&store, path)?;
    Ok(LoadedVault {
        store,
        origin: VaultOrigin::Created,
    })
}

fn read_store(path: &Path) -> Result<VaultStore> {
    let mut data = Vec::new();
    {
        let mut file = File::open(path)?;
        file.read_to_end(&mut data)?;
    }
    format::decode(&data)
}

/// Create `path` (which must not exist), write `bytes`, and fsync before
/// the handle is dropped.
fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Flush the directory entry of a finished rename. The new vault is
/// already in place at this point, so a failure is only logged.
fn sync_parent(path: &Path) {
    #[cfg(unix)]
    {
        let dir = non_empty_parent(path).unwrap_or(Path::new("."));
        if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
            tracing::debug!(dir = %dir.display(), error = %e, "could not sync vault directory");
        }
    }

    #[cfg(not(unix))]
    let _ = path;
}

/// Delete the vault file, any leftover temp file, and the containing
/// directory if nothing else lives there.
fn reset_storage(path: &Path) -> Result<()> {
    remove_if_present(path)?;
    remove_if_present(&temp_path(path))?;

    if let Some(dir) = non_empty_parent(path) {
        // Fails when the directory still holds unrelated files; keep them.
        let _ = fs::remove_dir(dir);
    }

    Ok(())
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// Temp file next to the target so the rename stays on one filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::Entry;
    use tempfile::TempDir;

    #[test]
    fn temp_path_is_hidden_sibling() {
        let tmp = temp_path(Path::new("/data/vault/vault.vlt"));
        assert_eq!(tmp, PathBuf::from("/data/vault/.vault.vlt.tmp"));
    }

    #[test]
    fn temp_path_for_bare_file_name() {
        assert_eq!(temp_path(Path::new("vault.vlt")), PathBuf::from(".vault.vlt.tmp"));
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.vlt");

        save(&VaultStore::new(), &path).unwrap();

        assert!(path.exists());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn reset_keeps_directory_with_other_files() {
        let dir = TempDir::new().unwrap();
        let vault_dir = dir.path().join("vault");
        fs::create_dir_all(&vault_dir).unwrap();
        let path = vault_dir.join("vault.vlt");
        fs::write(&path, b"junk").unwrap();
        fs::write(vault_dir.join("notes.txt"), b"keep me").unwrap();

        reset_storage(&path).unwrap();

        assert!(!path.exists());
        assert!(vault_dir.join("notes.txt").exists());
    }

    #[test]
    fn reset_removes_emptied_directory() {
        let dir = TempDir::new().unwrap();
        let vault_dir = dir.path().join("vault");
        fs::create_dir_all(&vault_dir).unwrap();
        let path = vault_dir.join("vault.vlt");
        fs::write(&path, b"junk").unwrap();
        fs::write(temp_path(&path), b"stale").unwrap();

        reset_storage(&path).unwrap();

        assert!(!vault_dir.exists());
    }

    #[test]
    fn reset_observer_runs_before_files_are_deleted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault").join("vault.vlt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"garbage").unwrap();

        let mut existed_during_warning = false;
        let loaded = load_or_create_with(&path, |cause| {
            assert!(cause.is_corruption());
            existed_during_warning = path.exists();
        })
        .unwrap();

        assert!(existed_during_warning);
        assert!(matches!(loaded.origin, VaultOrigin::Reset { .. }));
        assert!(loaded.store.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn vault_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.vlt");
        let mut store = VaultStore::new();
        store.add_entry(Entry::new("a", "b", "c"));
        save(&store, &path).unwrap();

        let perms = fs::metadata(&path).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600, "vault should be owner-only");
    }
}
