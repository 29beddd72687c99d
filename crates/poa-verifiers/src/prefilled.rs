//! # Prefilled Context
//!
//! The blob a module hands to the loader and gets back on every
//! verification:
//!
//! ```text
//! magic[4] = "PoAv" | version[1] | identity_len[1] | personalization[16]
//! ```

use crate::errors::ModuleError;
use poa_lock::constants::BLAKE2B_PERSONALIZATION;

const MAGIC: &[u8; 4] = b"PoAv";
const VERSION: u8 = 1;

/// Encoded size of the context blob.
pub const PREFILLED_CONTEXT_SIZE: usize = 22;

/// Encode the context for a module producing `identity_len`-byte identities.
pub fn encode(identity_len: u8) -> [u8; PREFILLED_CONTEXT_SIZE] {
    let mut blob = [0u8; PREFILLED_CONTEXT_SIZE];
    blob[..4].copy_from_slice(MAGIC);
    blob[4] = VERSION;
    blob[5] = identity_len;
    blob[6..].copy_from_slice(BLAKE2B_PERSONALIZATION);
    blob
}

/// `load_prefilled_data` body: copy the context if it fits, report its size.
pub fn fill(output: &mut [u8], identity_len: u8) -> usize {
    let blob = encode(identity_len);
    if output.len() >= blob.len() {
        output[..blob.len()].copy_from_slice(&blob);
    }
    blob.len()
}

/// Check the context handed back by the loader.
pub fn check(prefilled: &[u8], identity_len: u8) -> Result<(), ModuleError> {
    if prefilled != encode(identity_len) {
        return Err(ModuleError::InvalidPrefilledData);
    }
    Ok(())
}
