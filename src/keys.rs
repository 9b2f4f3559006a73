//! Length-prefixed key encoding for LMDB storage.
//!
//! Keys are encoded as: [len1][bytes1][len2][bytes2]...
//! - No delimiters, no escaping: role names and ids may contain any byte
//! - A prefix of parts is a byte prefix of the key, so per-role scans are
//!   plain prefix iterations

use crate::error::{Result, TierError};

/// Longest part a single length byte can describe
pub const MAX_PART_LEN: usize = u8::MAX as usize;

/// Build a length-prefixed key from parts
#[inline]
pub fn build_key(parts: &[&str]) -> Result<Vec<u8>> {
    let total_len: usize = parts.iter().map(|p| 1 + p.len()).sum();
    let mut key = Vec::with_capacity(total_len);
    for part in parts {
        if part.len() > MAX_PART_LEN {
            return Err(TierError::Storage(format!("key part longer than {MAX_PART_LEN} bytes: {part:.32}...")));
        }
        key.push(part.len() as u8);
        key.extend_from_slice(part.as_bytes());
    }
    Ok(key)
}

/// Parse a length-prefixed key into parts. Stops at the first truncated
/// or non-UTF-8 part.
pub fn parse_key(bytes: &[u8]) -> Vec<&str> {
    let mut parts = Vec::with_capacity(2);
    let mut i = 0;
    while i < bytes.len() {
        let len = bytes[i] as usize;
        if i + 1 + len > bytes.len() {
            break;
        }
        match std::str::from_utf8(&bytes[i + 1..i + 1 + len]) {
            Ok(part) => parts.push(part),
            Err(_) => break,
        }
        i += 1 + len;
    }
    parts
}

/// Get the Nth part from a key
#[inline]
pub fn get_part(bytes: &[u8], n: usize) -> Option<&str> {
    parse_key(bytes).into_iter().nth(n)
}

/// Grant key: [role][permission id]
#[inline]
pub fn grant_key(role: &str, id: &str) -> Result<Vec<u8>> {
    build_key(&[role, id])
}

/// Prefix covering every grant of a role
#[inline]
pub fn role_prefix(role: &str) -> Result<Vec<u8>> {
    build_key(&[role])
}
