//! Stable test identities.
//!
//! A fingerprint is the SHA-1 hex digest of the stripped test name, or of its
//! name parts joined with [`NAME_PARTS_SEPARATOR`].

use sha1::{Digest, Sha1};

/// Separator placed between name parts before hashing.
pub const NAME_PARTS_SEPARATOR: &str = "|||";

/// Lowercase hex SHA-1 of `s`.
pub fn sha1_hex(s: &str) -> String {
    let mut h = Sha1::new();
    h.update(s.as_bytes());
    hex::encode(h.finalize())
}

/// Computes the cross-run identity of a test case.
///
/// With `name_parts` (e.g. suite names followed by the test name) the parts are
/// hashed instead of the display name, so the identity survives changes in how
/// the name is rendered. Nothing run-specific goes into the hash.
pub fn compute(name: &str, name_parts: Option<&[String]>) -> String {
    match name_parts {
        Some(parts) => sha1_hex(&parts.join(NAME_PARTS_SEPARATOR)),
        None => sha1_hex(name),
    }
}
