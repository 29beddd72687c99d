//! # Module Errors
//!
//! Failures inside a verification module. They cross the module boundary as
//! the `i8` code returned by the entry points, which the lock forwards as its
//! own exit code.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModuleError {
    #[error("Public key recovery failed")]
    RecoverPubkey,

    #[error("Signature verification failed")]
    Verification,

    #[error("Invalid public key")]
    ParsePubkey,

    #[error("Invalid signature encoding")]
    ParseSignature,

    #[error("Signature is not in canonical low-S form")]
    NonCanonicalSignature,

    #[error("Signature has {actual} bytes, expected {expected}")]
    InvalidSignatureLength { expected: usize, actual: usize },

    #[error("Message must be 32 bytes, got {0}")]
    InvalidMessageLength(usize),

    #[error("Prefilled data does not belong to this module")]
    InvalidPrefilledData,

    #[error("Identity buffer of {0} bytes is too small")]
    IdentityBufferTooSmall(usize),

    #[error("Secret key is not a valid scalar")]
    InvalidSecretKey,
}

impl ModuleError {
    /// Code returned across the module boundary.
    pub fn code(&self) -> i8 {
        match self {
            ModuleError::RecoverPubkey => -11,
            ModuleError::Verification => -12,
            ModuleError::ParsePubkey => -13,
            ModuleError::ParseSignature => -14,
            ModuleError::NonCanonicalSignature => -15,
            ModuleError::InvalidSignatureLength { .. } => -21,
            ModuleError::InvalidMessageLength(_) => -22,
            ModuleError::InvalidPrefilledData => -23,
            ModuleError::IdentityBufferTooSmall(_) => -24,
            ModuleError::InvalidSecretKey => -25,
        }
    }
}

impl From<ModuleError> for i8 {
    fn from(error: ModuleError) -> Self {
        error.code()
    }
}
