//! Reversible substitution cipher used to obfuscate stored secrets.
//!
//! **This is obfuscation, not encryption.** Anyone who knows the alphabet
//! and the shift (or simply tries all 95 shifts) can recover the secret.
//! It keeps secrets from being readable at a glance in the vault file and
//! nothing more.
//!
//! This module provides:
//! - The fixed 95-character alphabet (`rotation::ALPHABET`)
//! - `encrypt` / `decrypt` over that alphabet (`rotation`)

pub mod rotation;

pub use rotation::{decrypt, encrypt, ALPHABET};
