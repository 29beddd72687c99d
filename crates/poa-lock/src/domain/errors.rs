//! # Lock Errors
//!
//! Every failure is terminal for the validation. Each error maps to one
//! non-zero exit code; there is no recoverable class.

use crate::constants::{ERROR_DYNAMIC_LOADING, ERROR_ENCODING, ERROR_TRANSACTION};
use thiserror::Error;

/// Which transaction section a cell was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// All transaction inputs.
    Input,
    /// All transaction outputs.
    Output,
    /// All cell dependencies.
    CellDep,
    /// Inputs locked by the executing script.
    GroupInput,
    /// Outputs locked by the executing script.
    GroupOutput,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Source::Input => "input",
            Source::Output => "output",
            Source::CellDep => "cell dep",
            Source::GroupInput => "group input",
            Source::GroupOutput => "group output",
        };
        f.write_str(name)
    }
}

/// Errors reported by the transaction source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SysError {
    /// Index past the end of the section. Doubles as the end-of-section marker.
    #[error("Index out of bound")]
    IndexOutOfBound,

    /// The requested field is absent on an existing item.
    #[error("Item missing")]
    ItemMissing,

    /// Destination buffer shorter than a fixed-size field.
    #[error("Length not enough: {0} bytes available")]
    LengthNotEnough(usize),

    /// The underlying data could not be decoded.
    #[error("Encoding error")]
    Encoding,

    /// Any other source-specific failure code.
    #[error("Unknown syscall error: {0}")]
    Unknown(i8),
}

impl SysError {
    /// Exit code forwarded when a syscall failure aborts the validation.
    pub fn code(&self) -> i8 {
        match self {
            SysError::IndexOutOfBound => 1,
            SysError::ItemMissing => 2,
            SysError::LengthNotEnough(_) => 3,
            SysError::Encoding => 4,
            SysError::Unknown(0) => ERROR_DYNAMIC_LOADING,
            SysError::Unknown(code) => *code,
        }
    }
}

/// Transaction structure violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("More than one input cell uses the authority lock")]
    MultipleGroupInputs,

    #[error("More than one output cell uses the authority lock")]
    MultipleGroupOutputs,

    #[error("Transaction hash has invalid length: {0}")]
    InvalidTxHashLength(usize),
}

/// Malformed buffers and failed consistency checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    // === Configuration ===
    #[error("Authority config too short: {0} bytes")]
    ConfigTooShort(usize),

    #[error("Authority config length mismatch: expected {expected}, got {actual}")]
    ConfigLengthMismatch { expected: usize, actual: usize },

    #[error("Change threshold {threshold} exceeds aggregator count {count}")]
    ThresholdExceedsCount { threshold: u8, count: u8 },

    #[error("Authority config of {len} bytes exceeds the {cap} byte buffer")]
    ConfigTooLarge { len: usize, cap: usize },

    // === Cells and arguments ===
    #[error("Script args must be 64 bytes, got {0}")]
    InvalidArgsLength(usize),

    #[error("Round state must be 22 bytes, got {0}")]
    InvalidStateLength(usize),

    #[error("More than one cell in {0} matches the reference hash")]
    AmbiguousCell(Source),

    #[error("No cell in {0} matches the reference hash")]
    MissingCell(Source),

    // === Witness ===
    #[error("Witness too short: {0} bytes")]
    WitnessTooShort(usize),

    #[error("Witness is not a WitnessArgs with a lock field")]
    MalformedWitness,

    #[error("Witness lock of {lock_len} bytes does not fit in {loaded} loaded bytes")]
    WitnessLockTooLong { lock_len: usize, loaded: usize },

    // === Since ===
    #[error("Since flag {actual:#04x} does not match required {expected:#04x}")]
    SinceFlagMismatch { expected: u8, actual: u8 },

    #[error("Since value {since} does not match subtime {subtime}")]
    SubtimeMismatch { since: u64, subtime: u64 },

    // === Round progression ===
    #[error("Aggregator index {index} out of range for {count} aggregators")]
    AggregatorIndexOutOfRange { index: u16, count: u8 },

    #[error("Round start changed within a round: {prior} -> {proposed}")]
    RoundStartChanged { prior: u64, proposed: u64 },

    #[error("Subtime decreased: {prior} -> {proposed}")]
    SubtimeDecreased { prior: u64, proposed: u64 },

    #[error("Aggregator changed within a round: {prior} -> {proposed}")]
    AggregatorChanged { prior: u16, proposed: u16 },

    #[error("Invalid subblock index: expected {expected}, got {actual}")]
    InvalidSubblockIndex { expected: u32, actual: u32 },

    #[error("Subblock index {index} reaches the per-round cap {cap}")]
    SubblockCapReached { index: u32, cap: u32 },

    #[error("New round must start at its first subtime: start {round_start}, subtime {subtime}")]
    RoundStartNotSubtime { round_start: u64, subtime: u64 },

    #[error("Aggregator {aggregator} not entitled before {eligible_at}, since is {since}")]
    LeaderNotEntitled {
        aggregator: u16,
        eligible_at: u64,
        since: u64,
    },

    #[error("Round time arithmetic overflowed")]
    TimeOverflow,

    // === Signatures ===
    #[error("Recovered identity has {actual} bytes, expected {expected}")]
    IdentitySizeMismatch { expected: usize, actual: usize },

    #[error("Recovered identity does not match aggregator {0}")]
    IdentityMismatch(u16),

    #[error("Change threshold must not be zero")]
    ZeroThreshold,

    #[error("{len} signature bytes do not split into {threshold} equal signatures")]
    UnevenSignatures { len: usize, threshold: u8 },

    #[error("Signature slot {0} resolves to an identity outside the aggregator set")]
    UnknownIdentity(usize),

    #[error("Aggregator {index} signed more than one slot (slot {slot})")]
    DuplicateIdentity { index: usize, slot: usize },
}

/// Verification module loading failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    #[error("A verification module is already loaded")]
    AlreadyLoaded,

    #[error("No verification module is loaded")]
    NotLoaded,

    #[error("Verification module not found")]
    ModuleNotFound,

    #[error("Module of {required} bytes exceeds the remaining code budget of {available}")]
    CodeBudgetExceeded { required: usize, available: usize },

    #[error("Module does not export `{0}`")]
    MissingEntryPoint(&'static str),

    #[error("Prefilled data of {len} bytes exceeds the {cap} byte buffer")]
    PrefilledDataTooLarge { len: usize, cap: usize },

    #[error("Recovered identity of {len} bytes exceeds the {cap} byte buffer")]
    IdentityTooLarge { len: usize, cap: usize },
}

/// Top-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Dynamic loading error: {0}")]
    Loader(#[from] LoaderError),

    #[error("Syscall error: {0}")]
    Syscall(#[from] SysError),

    /// Non-zero return code from a verification module entry point.
    #[error("Verification module returned {0}")]
    Module(i8),
}

impl LockError {
    /// Exit code reported to the host.
    pub fn code(&self) -> i8 {
        match self {
            LockError::Transaction(_) => ERROR_TRANSACTION,
            LockError::Encoding(_) => ERROR_ENCODING,
            LockError::Loader(_) => ERROR_DYNAMIC_LOADING,
            LockError::Syscall(e) => e.code(),
            // A module failing with 0 must not read as success.
            LockError::Module(0) => ERROR_DYNAMIC_LOADING,
            LockError::Module(code) => *code,
        }
    }
}

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;
