//! # Signing Message
//!
//! The digest every authority signature covers. blake2b-256 over, in order:
//!
//! 1. the transaction hash;
//! 2. the first group witness up to the signature (the `WitnessArgs` header
//!    and the lock length), then every byte after the signature;
//! 3. each further witness of the script group, as length (u64 LE) + bytes;
//! 4. each witness at or beyond the input count, as length (u64 LE) + bytes.
//!
//! The signature itself is skipped, not zero-filled. Witness bytes beyond the
//! loaded prefix are streamed in fixed-size chunks.

use crate::constants::{WITNESS_CHUNK_SIZE, WITNESS_LOCK_OFFSET};
use crate::domain::errors::EncodingError;
use crate::domain::witness::WitnessLock;
use crate::hashing::{Hash, LedgerHasher};
use crate::ports::outbound::{Source, SysError, TransactionSource};
use tracing::trace;

/// Incremental signing message over a transaction source.
pub struct SigningMessageBuilder<'t, T: ?Sized> {
    tx: &'t T,
    hasher: LedgerHasher,
}

impl<'t, T: TransactionSource + ?Sized> SigningMessageBuilder<'t, T> {
    pub fn new(tx: &'t T, tx_hash: &Hash) -> Self {
        let mut hasher = LedgerHasher::new();
        hasher.update(tx_hash);
        Self { tx, hasher }
    }

    /// Absorb the first group witness, given its `loaded` prefix.
    pub fn first_witness(mut self, loaded: &[u8], lock: &WitnessLock) -> Result<Self, SysError> {
        self.hasher.update(&loaded[..WITNESS_LOCK_OFFSET]);

        let mut offset = lock.remainder_offset();
        if offset < loaded.len() {
            self.hasher.update(&loaded[offset..]);
            offset = loaded.len();
        }
        if offset < lock.total_len() {
            self.stream(offset, 0, Source::GroupInput)?;
        }
        Ok(self)
    }

    /// Absorb group witnesses from index 1 until the group is exhausted.
    pub fn group_witnesses(mut self) -> Result<Self, SysError> {
        let absorbed = self.witnesses_from(1, Source::GroupInput)?;
        trace!(absorbed, "group witnesses hashed");
        Ok(self)
    }

    /// Absorb witnesses not covered by any input.
    pub fn extra_witnesses(mut self) -> Result<Self, SysError> {
        let start = self.tx.inputs_len()?;
        let absorbed = self.witnesses_from(start, Source::Input)?;
        trace!(start, absorbed, "extra witnesses hashed");
        Ok(self)
    }

    pub fn finalize(self) -> Hash {
        self.hasher.finalize()
    }

    fn witnesses_from(&mut self, start: usize, source: Source) -> Result<usize, SysError> {
        let mut index = start;
        loop {
            match self.witness(index, source) {
                Ok(()) => index += 1,
                Err(SysError::IndexOutOfBound) => return Ok(index - start),
                Err(e) => return Err(e),
            }
        }
    }

    fn witness(&mut self, index: usize, source: Source) -> Result<(), SysError> {
        let mut chunk = [0u8; WITNESS_CHUNK_SIZE];
        let len = self.tx.load_witness(&mut chunk, 0, index, source)?;
        self.hasher.update_len(len);
        let read = len.min(chunk.len());
        self.hasher.update(&chunk[..read]);
        if read < len {
            self.stream(read, index, source)?;
        }
        Ok(())
    }

    /// Hash witness bytes from `offset` to the end, one chunk per load.
    fn stream(&mut self, mut offset: usize, index: usize, source: Source) -> Result<(), SysError> {
        let mut chunk = [0u8; WITNESS_CHUNK_SIZE];
        loop {
            let remaining = self.tx.load_witness(&mut chunk, offset, index, source)?;
            let read = remaining.min(chunk.len());
            if read == 0 {
                return Ok(());
            }
            self.hasher.update(&chunk[..read]);
            offset += read;
        }
    }
}

/// Build the signing message for the first group witness.
pub fn build_signing_message<T: TransactionSource + ?Sized>(
    tx: &T,
    tx_hash: &Hash,
    loaded: &[u8],
    lock: &WitnessLock,
) -> Result<Hash, SysError> {
    Ok(SigningMessageBuilder::new(tx, tx_hash)
        .first_witness(loaded, lock)?
        .group_witnesses()?
        .extra_witnesses()?
        .finalize())
}

/// Signer-side digest over fully materialized witnesses.
///
/// `first_witness` must already carry a lock field of the final signature
/// length; its content is ignored.
pub fn compute_signing_message(
    tx_hash: &Hash,
    first_witness: &[u8],
    group_witnesses: &[&[u8]],
    extra_witnesses: &[&[u8]],
) -> Result<Hash, EncodingError> {
    let lock = WitnessLock::parse(first_witness, first_witness.len())?;

    let mut hasher = LedgerHasher::new();
    hasher
        .update(tx_hash)
        .update(&first_witness[..WITNESS_LOCK_OFFSET])
        .update(&first_witness[lock.remainder_offset()..]);
    for witness in group_witnesses.iter().chain(extra_witnesses) {
        hasher.update_len(witness.len()).update(witness);
    }
    Ok(hasher.finalize())
}
