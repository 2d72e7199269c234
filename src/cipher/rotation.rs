//! Alphabet rotation ("Caesar") over a fixed set of printable characters.
//!
//! Each character is looked up in `ALPHABET`, its position is moved by
//! `shift` places with floored modulo arithmetic, and the character at the
//! new position is emitted. The alphabet ordering is part of the vault
//! file contract: changing it makes existing vaults unreadable.

use crate::errors::{CredVaultError, Result};

/// The ordered alphabet. Every stored secret is made of these characters.
pub const ALPHABET: &[u8; 95] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz`~!@#$%^&*()_-+=|\\}]{[\"':;?/>.<, ";

/// Rotate every character of `text` forward by `shift` places.
///
/// Fails with `InvalidCharacter` if any character is outside `ALPHABET`;
/// no partial output is returned in that case.
pub fn encrypt(text: &str, shift: i64) -> Result<String> {
    rotate(text, shift)
}

/// Rotate every character of `text` backward by `shift` places.
pub fn decrypt(text: &str, shift: i64) -> Result<String> {
    // Reduce first so negating never overflows (i64::MIN has no positive twin).
    rotate(text, -shift.rem_euclid(alphabet_len()))
}

fn rotate(text: &str, shift: i64) -> Result<String> {
    let len = alphabet_len();
    let offset = shift.rem_euclid(len);

    text.chars()
        .enumerate()
        .map(|(position, ch)| -> Result<char> {
            let index = position_of(ch).ok_or(CredVaultError::InvalidCharacter { ch, position })?;
            // Both operands are in [0, len), so the sum cannot overflow.
            let rotated = (index as i64 + offset).rem_euclid(len) as usize;
            Ok(char::from(ALPHABET[rotated]))
        })
        .collect()
}

fn position_of(ch: char) -> Option<usize> {
    if !ch.is_ascii() {
        return None;
    }
    ALPHABET.iter().position(|&b| b == ch as u8)
}

fn alphabet_len() -> i64 {
    ALPHABET.len() as i64
}
