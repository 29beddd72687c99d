//! # Witness Lock
//!
//! The first group witness is a molecule `WitnessArgs` table:
//!
//! ```text
//! total_size[4] | offset_lock[4] | offset_input_type[4] | offset_output_type[4] |
//! lock_len[4] | lock[lock_len] | input_type? | output_type?
//! ```
//!
//! Only the header and the lock field are decoded, so the witness may be far
//! larger than the buffer it is read into.

use super::config::read_u32;
use super::errors::EncodingError;
use crate::constants::{WITNESS_ARGS_HEADER_SIZE, WITNESS_LOCK_OFFSET};
use tracing::debug;

/// Position of the signature inside the first group witness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WitnessLock {
    lock_len: usize,
    total_len: usize,
}

impl WitnessLock {
    /// Decode the lock position from the `loaded` prefix of a witness whose
    /// full length is `total_len`. The signature must lie entirely in `loaded`.
    pub fn parse(loaded: &[u8], total_len: usize) -> Result<Self, EncodingError> {
        if loaded.len() < WITNESS_LOCK_OFFSET || total_len < WITNESS_LOCK_OFFSET {
            debug!(len = total_len, "invalid witness length");
            return Err(EncodingError::WitnessTooShort(total_len));
        }

        let total_size = read_u32(&loaded[0..4]) as usize;
        let lock_offset = read_u32(&loaded[4..8]) as usize;
        let lock_end = read_u32(&loaded[8..12]) as usize;
        let lock_len = read_u32(&loaded[16..20]) as usize;

        if total_size != total_len
            || lock_offset != WITNESS_ARGS_HEADER_SIZE
            || lock_end != WITNESS_LOCK_OFFSET + lock_len
        {
            debug!("witness is not a WitnessArgs with a lock");
            return Err(EncodingError::MalformedWitness);
        }
        if WITNESS_LOCK_OFFSET + lock_len > loaded.len() {
            debug!(lock_len, "witness lock exceeds loaded bytes");
            return Err(EncodingError::WitnessLockTooLong {
                lock_len,
                loaded: loaded.len(),
            });
        }

        Ok(Self {
            lock_len,
            total_len,
        })
    }

    /// Signature bytes.
    pub fn signature<'w>(&self, loaded: &'w [u8]) -> &'w [u8] {
        &loaded[WITNESS_LOCK_OFFSET..self.remainder_offset()]
    }

    /// Offset of the first byte after the signature.
    pub fn remainder_offset(&self) -> usize {
        WITNESS_LOCK_OFFSET + self.lock_len
    }

    pub fn lock_len(&self) -> usize {
        self.lock_len
    }

    /// Full witness length, including bytes beyond the loaded prefix.
    pub fn total_len(&self) -> usize {
        self.total_len
    }
}

/// Encode a `WitnessArgs` table. Absent fields take no bytes.
pub fn encode_witness_args(
    lock: Option<&[u8]>,
    input_type: Option<&[u8]>,
    output_type: Option<&[u8]>,
) -> Vec<u8> {
    let fields = [lock, input_type, output_type];
    let body_len: usize = fields
        .iter()
        .map(|field| field.map_or(0, |bytes| 4 + bytes.len()))
        .sum();
    let total = WITNESS_ARGS_HEADER_SIZE + body_len;

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&(total as u32).to_le_bytes());
    let mut offset = WITNESS_ARGS_HEADER_SIZE;
    for field in &fields {
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += field.map_or(0, |bytes| 4 + bytes.len());
    }
    for bytes in fields.iter().flatten() {
        out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(bytes);
    }
    out
}
