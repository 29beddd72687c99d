//! # PoA Verification Modules
//!
//! Signature verification modules pluggable into the authority lock through
//! its [`ModuleResolver`](poa_lock::ModuleResolver) seam, plus the matching
//! signers used by aggregators and tests.
//!
//! | Module | Signature | Identity |
//! |--------|-----------|----------|
//! | [`secp256k1_blake160`] | `r \| s \| recid` (65 B) | blake160(compressed pubkey) |
//! | [`ed25519`] | `pubkey \| sig` (96 B) | blake160(pubkey) |
//!
//! Every module exposes the two entry points the lock's loader expects:
//! `load_prefilled_data` writes a small [`prefilled`] context and
//! `validate_signature` checks it before writing the recovered identity.

pub mod ed25519;
pub mod errors;
pub mod prefilled;
pub mod secp256k1_blake160;

pub use errors::ModuleError;

use poa_lock::{Hash, LedgerHasher, ModuleRegistry, RegistryError, VerificationModule};

/// Produces signatures a verification module maps back to an identity.
pub trait IdentitySigner {
    /// Identity as stored in the authority configuration.
    fn identity(&self) -> Vec<u8>;

    /// Size of every signature produced by [`sign`](Self::sign).
    fn signature_size(&self) -> usize;

    fn sign(&self, message: &Hash) -> Result<Vec<u8>, ModuleError>;
}

/// All modules shipped with this crate.
pub const BUILTIN_MODULES: [VerificationModule; 2] = [secp256k1_blake160::MODULE, ed25519::MODULE];

/// Stable type hash of a builtin module, independent of its code revision.
pub fn module_type_hash(name: &str) -> Hash {
    let mut hasher = LedgerHasher::new();
    hasher.update(b"poa-verifiers/type-id").update(name.as_bytes());
    hasher.finalize()
}

/// Registry with every builtin module, addressable by data and type hash.
pub fn builtin_registry() -> Result<ModuleRegistry, RegistryError> {
    let mut registry = ModuleRegistry::new();
    for module in BUILTIN_MODULES {
        registry.register_with_type_hash(module, module_type_hash(module.name))?;
    }
    Ok(registry)
}

/// Look up a builtin module by name.
pub fn builtin_module(name: &str) -> Option<VerificationModule> {
    BUILTIN_MODULES.into_iter().find(|module| module.name == name)
}
