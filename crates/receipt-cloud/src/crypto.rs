//! Password hash verification.
//!
//! User rows store a hex-encoded SHA-256 digest of the password; login
//! hashes the supplied password with the same digest and compares in
//! constant time. The digest choice matches what the deployment's
//! password-provisioning tooling produces.

use sha2::{Digest, Sha256};

/// Compute the hex-encoded SHA-256 digest of `input` (64 characters).
#[must_use]
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time string comparison to prevent timing attacks.
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
