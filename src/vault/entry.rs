//! A single credential record.
//!
//! The secret is always held in its obfuscated form. Use `Entry::seal` to
//! build an entry from a plaintext secret and `Entry::reveal` to get the
//! plaintext back.

use crate::cipher;
use crate::errors::Result;

/// One stored credential: who, what secret, and for which resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Login name, displayed as typed.
    pub username: String,

    /// The secret in obfuscated form (cipher output).
    pub secret: String,

    /// What the credential is for (site, host, system name).
    pub resource: String,
}

impl Entry {
    /// Build an entry from an already-obfuscated secret.
    pub fn new(
        username: impl Into<String>,
        secret: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
            resource: resource.into(),
        }
    }

    /// Build an entry from a plaintext secret, obfuscating it with `shift`.
    pub fn seal(username: &str, plaintext: &str, resource: &str, shift: i64) -> Result<Self> {
        let secret = cipher::encrypt(plaintext, shift)?;
        Ok(Self::new(username, secret, resource))
    }

    /// Return the plaintext secret.
    pub fn reveal(&self, shift: i64) -> Result<String> {
        cipher::decrypt(&self.secret, shift)
    }

    /// Returns `true` if `other` has the same dedup key: username and
    /// resource, both compared case-insensitively.
    pub fn same_key(&self, other: &Entry) -> bool {
        fold_eq(&self.username, &other.username) && fold_eq(&self.resource, &other.resource)
    }
}

fn fold_eq(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
