//! # Ledger Hashing
//!
//! blake2b-256 with the ledger personalization. Every digest the lock
//! produces or compares goes through here.

use crate::constants::{BLAKE2B_PERSONALIZATION, HASH_SIZE};
use blake2b_ref::{Blake2b, Blake2bBuilder};

/// 32-byte digest.
pub type Hash = [u8; HASH_SIZE];

/// Incremental ledger hasher.
pub struct LedgerHasher {
    inner: Blake2b,
}

impl LedgerHasher {
    /// Create a hasher with the ledger personalization.
    pub fn new() -> Self {
        Self {
            inner: Blake2bBuilder::new(HASH_SIZE)
                .personal(BLAKE2B_PERSONALIZATION)
                .build(),
        }
    }

    /// Feed bytes.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Feed a length as little-endian u64.
    pub fn update_len(&mut self, len: usize) -> &mut Self {
        self.inner.update(&(len as u64).to_le_bytes());
        self
    }

    /// Finish and return the digest.
    pub fn finalize(self) -> Hash {
        let mut hash = [0u8; HASH_SIZE];
        self.inner.finalize(&mut hash);
        hash
    }
}

impl Default for LedgerHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot ledger hash.
pub fn ledger_hash(data: &[u8]) -> Hash {
    let mut hasher = LedgerHasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// First 20 bytes of the ledger hash, the usual identity of a public key.
pub fn blake160(data: &[u8]) -> [u8; 20] {
    let hash = ledger_hash(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&hash[..20]);
    out
}
