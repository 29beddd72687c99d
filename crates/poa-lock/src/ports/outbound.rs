//! # Outbound Ports (Driven Ports / SPI)
//!
//! What the lock needs from its host: read access to the transaction being
//! validated, and a way to resolve verification modules by content hash.

use crate::domain::config::ReferenceKind;
use crate::hashing::{ledger_hash, Hash};

pub use crate::domain::errors::{Source, SysError};

/// Read access to the transaction under validation.
///
/// Variable-length loaders follow partial-loading semantics: they copy
/// `min(buf.len(), available)` bytes starting at `offset` into `buf` and
/// return `available`, the full length remaining from `offset`. Callers use
/// the return value to detect truncation and fetch the rest in later calls.
///
/// Every loader reports [`SysError::IndexOutOfBound`] for an index past the
/// end of the section; scans use it as their termination signal.
pub trait TransactionSource {
    /// Hash of the transaction.
    fn load_tx_hash(&self, buf: &mut [u8]) -> Result<usize, SysError>;

    /// Arguments of the executing lock script.
    fn load_script_args(&self, buf: &mut [u8]) -> Result<usize, SysError>;

    /// Witness bytes.
    fn load_witness(
        &self,
        buf: &mut [u8],
        offset: usize,
        index: usize,
        source: Source,
    ) -> Result<usize, SysError>;

    /// Cell data bytes.
    fn load_cell_data(
        &self,
        buf: &mut [u8],
        offset: usize,
        index: usize,
        source: Source,
    ) -> Result<usize, SysError>;

    /// Hash of the cell's type script; `None` when the cell has none.
    fn load_cell_type_hash(&self, index: usize, source: Source) -> Result<Option<Hash>, SysError>;

    /// Capacity of the cell. Doubles as an existence probe.
    fn load_cell_capacity(&self, index: usize, source: Source) -> Result<u64, SysError>;

    /// Since value of an input.
    fn load_input_since(&self, index: usize, source: Source) -> Result<u64, SysError>;

    /// Number of transaction inputs, probed one index at a time.
    fn inputs_len(&self) -> Result<usize, SysError> {
        let mut index = 0;
        loop {
            match self.load_input_since(index, Source::Input) {
                Ok(_) => index += 1,
                Err(SysError::IndexOutOfBound) => return Ok(index),
                Err(e) => return Err(e),
            }
        }
    }

    /// Whether a cell exists at `index` in `source`.
    fn has_cell(&self, index: usize, source: Source) -> Result<bool, SysError> {
        match self.load_cell_capacity(index, source) {
            Ok(_) => Ok(true),
            Err(SysError::IndexOutOfBound) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Fills the prefilled data buffer and returns the number of bytes the
/// module needs. A return larger than the buffer means it did not fit.
pub type LoadPrefilledDataFn = fn(output: &mut [u8]) -> Result<usize, i8>;

/// Verifies `signature` over the 32-byte `message`, writes the signer's
/// identity into `identity` and returns its length.
pub type ValidateSignatureFn = fn(
    prefilled_data: &[u8],
    signature: &[u8],
    message: &[u8],
    identity: &mut [u8],
) -> Result<usize, i8>;

/// A signature verification module as the loader sees it: a code image
/// addressed by its hash, plus the two exported entry points.
#[derive(Clone, Copy)]
pub struct VerificationModule {
    pub name: &'static str,
    /// Module image. Counts against the code budget and defines the data hash.
    pub code: &'static [u8],
    pub load_prefilled_data: Option<LoadPrefilledDataFn>,
    pub validate_signature: Option<ValidateSignatureFn>,
}

impl VerificationModule {
    /// Reference hash under [`ReferenceKind::Data`].
    pub fn data_hash(&self) -> Hash {
        ledger_hash(self.code)
    }
}

impl std::fmt::Debug for VerificationModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationModule")
            .field("name", &self.name)
            .field("code_len", &self.code.len())
            .field("load_prefilled_data", &self.load_prefilled_data.is_some())
            .field("validate_signature", &self.validate_signature.is_some())
            .finish()
    }
}

/// Resolves a configured code reference to a verification module.
pub trait ModuleResolver {
    fn resolve(&self, code_reference: &Hash, kind: ReferenceKind) -> Option<&VerificationModule>;
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for &R {
    fn resolve(&self, code_reference: &Hash, kind: ReferenceKind) -> Option<&VerificationModule> {
        (**self).resolve(code_reference, kind)
    }
}
