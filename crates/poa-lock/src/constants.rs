//! # Protocol Constants
//!
//! Fixed resource caps and binary layout sizes. The caps are protocol-level
//! bounds: inputs that do not fit are rejected, buffers are never grown.

/// Capacity of the buffer holding the first group witness.
pub const WITNESS_BUFFER_SIZE: usize = 32 * 1024;

/// Chunk size used when streaming witness bytes into the message hasher.
pub const WITNESS_CHUNK_SIZE: usize = 32 * 1024;

/// Capacity of one authority configuration buffer.
pub const CONFIG_BUFFER_SIZE: usize = 16 * 1024;

/// Code budget shared by every module loaded during one validation.
pub const CODE_BUFFER_SIZE: usize = 256 * 1024;

/// Capacity of the prefilled data blob handed to the verification module.
pub const PREFILLED_DATA_SIZE: usize = 1024 * 1024;

/// Capacity of the scratch buffer receiving a recovered identity.
pub const IDENTITY_BUFFER_SIZE: usize = 1024;

/// Fixed header of the authority configuration cell data.
pub const CONFIG_HEADER_SIZE: usize = 44;

/// Authority state cell data size.
pub const ROUND_STATE_SIZE: usize = 22;

/// Lock script args: configuration reference followed by state reference.
pub const SCRIPT_ARGS_SIZE: usize = 64;

/// Size of every reference / transaction hash.
pub const HASH_SIZE: usize = 32;

/// `WitnessArgs` header: total size plus three field offsets.
pub const WITNESS_ARGS_HEADER_SIZE: usize = 16;

/// Offset of the signature payload inside the first witness.
pub const WITNESS_LOCK_OFFSET: usize = WITNESS_ARGS_HEADER_SIZE + 4;

/// Since flag for an absolute timestamp metric.
pub const SINCE_FLAG_TIMESTAMP: u8 = 0x40;

/// Since flag for an absolute block number metric.
pub const SINCE_FLAG_BLOCK_NUMBER: u8 = 0x00;

/// Mask selecting the 56-bit since value.
pub const SINCE_VALUE_MASK: u64 = 0x00FF_FFFF_FFFF_FFFF;

/// Personalization of the blake2b hash used across the ledger.
pub const BLAKE2B_PERSONALIZATION: &[u8; 16] = b"ckb-default-hash";

/// Exit code reported on acceptance.
pub const EXIT_SUCCESS: i8 = 0;

/// Exit code for transaction structure violations.
pub const ERROR_TRANSACTION: i8 = -1;

/// Exit code for encoding and consistency violations.
pub const ERROR_ENCODING: i8 = -2;

/// Exit code for verification module loading failures.
pub const ERROR_DYNAMIC_LOADING: i8 = -3;
