//! # ed25519 Module
//!
//! Signature layout: `public_key[32] | signature[64]`. The signer identity is
//! the blake160 of the public key; verification uses the strict rules so
//! small-order keys and non-canonical encodings are refused.

use crate::errors::ModuleError;
use crate::{prefilled, IdentitySigner};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use poa_lock::{blake160, Hash, VerificationModule};
use k256::elliptic_curve::rand_core::CryptoRngCore;
use tracing::debug;
use zeroize::Zeroize;

pub const NAME: &str = "ed25519-blake160";
pub const PUBLIC_KEY_SIZE: usize = 32;
pub const SIGNATURE_SIZE: usize = PUBLIC_KEY_SIZE + 64;
pub const IDENTITY_SIZE: usize = 20;

pub const CODE: &[u8] = b"poa-verifiers\0ed25519-blake160\0v1\0pubkey|sig\0blake160(pubkey)";

pub const MODULE: VerificationModule = VerificationModule {
    name: NAME,
    code: CODE,
    load_prefilled_data: Some(load_prefilled_data),
    validate_signature: Some(validate_signature),
};

pub fn load_prefilled_data(output: &mut [u8]) -> Result<usize, i8> {
    Ok(prefilled::fill(output, IDENTITY_SIZE as u8))
}

pub fn validate_signature(
    prefilled: &[u8],
    signature: &[u8],
    message: &[u8],
    identity: &mut [u8],
) -> Result<usize, i8> {
    prefilled::check(prefilled, IDENTITY_SIZE as u8)?;
    if identity.len() < IDENTITY_SIZE {
        return Err(ModuleError::IdentityBufferTooSmall(identity.len()).into());
    }
    let verified = verify_identity(signature, message)?;
    identity[..IDENTITY_SIZE].copy_from_slice(&verified);
    Ok(IDENTITY_SIZE)
}

/// Verify `signature` over `message` and return the signer identity.
pub fn verify_identity(signature: &[u8], message: &[u8]) -> Result<[u8; IDENTITY_SIZE], ModuleError> {
    if signature.len() != SIGNATURE_SIZE {
        return Err(ModuleError::InvalidSignatureLength {
            expected: SIGNATURE_SIZE,
            actual: signature.len(),
        });
    }
    let (public_key, sig_bytes) = signature.split_at(PUBLIC_KEY_SIZE);

    let mut key_bytes = [0u8; PUBLIC_KEY_SIZE];
    key_bytes.copy_from_slice(public_key);
    let key = VerifyingKey::from_bytes(&key_bytes).map_err(|_| ModuleError::ParsePubkey)?;

    let mut raw = [0u8; 64];
    raw.copy_from_slice(sig_bytes);
    let sig = Signature::from_bytes(&raw);

    key.verify_strict(message, &sig).map_err(|_| {
        debug!("ed25519 verification failed");
        ModuleError::Verification
    })?;
    Ok(blake160(&key_bytes))
}

/// Authority key producing `public_key | signature` blobs.
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    pub fn generate(rng: &mut impl CryptoRngCore) -> Self {
        Self {
            signing_key: SigningKey::generate(rng),
        }
    }

    /// Import a 32-byte seed. The caller's copy is wiped.
    pub fn from_seed(seed: &mut [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        seed.zeroize();
        Self { signing_key }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl IdentitySigner for Ed25519Signer {
    fn identity(&self) -> Vec<u8> {
        blake160(self.verifying_key().as_bytes()).to_vec()
    }

    fn signature_size(&self) -> usize {
        SIGNATURE_SIZE
    }

    fn sign(&self, message: &Hash) -> Result<Vec<u8>, ModuleError> {
        let sig = self.signing_key.sign(message);
        let mut out = Vec::with_capacity(SIGNATURE_SIZE);
        out.extend_from_slice(self.verifying_key().as_bytes());
        out.extend_from_slice(&sig.to_bytes());
        Ok(out)
    }
}

impl std::fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Signer")
            .field("identity", &hex::encode(self.identity()))
            .finish_non_exhaustive()
    }
}
