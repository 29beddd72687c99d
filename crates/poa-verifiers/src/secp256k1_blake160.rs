//! # secp256k1 / blake160 Module
//!
//! Signature layout: `r[32] | s[32] | recovery_id[1]`. The signer identity is
//! the blake160 of the recovered compressed public key. High-S signatures
//! are rejected so a valid signature has exactly one encoding.

use crate::errors::ModuleError;
use crate::{prefilled, IdentitySigner};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::rand_core::CryptoRngCore;
use k256::elliptic_curve::scalar::IsHigh;
use poa_lock::{blake160, Hash, VerificationModule};
use tracing::debug;
use zeroize::Zeroize;

pub const NAME: &str = "secp256k1-blake160";
pub const SIGNATURE_SIZE: usize = 65;
pub const IDENTITY_SIZE: usize = 20;

/// Code image identifying this module revision. Its data hash is the
/// module's on-chain reference.
pub const CODE: &[u8] = b"poa-verifiers\0secp256k1-blake160\0v1\0r|s|recid\0blake160(compressed)";

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
    let recovered = recover_identity(signature, message)?;
    identity[..IDENTITY_SIZE].copy_from_slice(&recovered);
    Ok(IDENTITY_SIZE)
}

/// Recover the blake160 identity of the key that produced `signature`.
pub fn recover_identity(signature: &[u8], message: &[u8]) -> Result<[u8; IDENTITY_SIZE], ModuleError> {
    if signature.len() != SIGNATURE_SIZE {
        return Err(ModuleError::InvalidSignatureLength {
            expected: SIGNATURE_SIZE,
            actual: signature.len(),
        });
    }
    if message.len() != 32 {
        return Err(ModuleError::InvalidMessageLength(message.len()));
    }

    let mut sig_bytes = [0u8; 64];
    sig_bytes.copy_from_slice(&signature[..64]);
    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let sig = parsed.map_err(|_| ModuleError::ParseSignature)?;

    if bool::from(sig.s().is_high()) {
        debug!("rejecting high-S signature");
        return Err(ModuleError::NonCanonicalSignature);
    }
    let recovery_id = RecoveryId::from_byte(signature[64]).ok_or(ModuleError::ParseSignature)?;

    let key = VerifyingKey::recover_from_prehash(message, &sig, recovery_id).map_err(|_| {
        debug!("secp256k1 public key recovery failed");
        ModuleError::RecoverPubkey
    })?;
    Ok(identity_of(&key))
}

/// blake160 of the compressed SEC1 encoding.
pub fn identity_of(key: &VerifyingKey) -> [u8; IDENTITY_SIZE] {
    blake160(key.to_encoded_point(true).as_bytes())
}

/// Authority key producing recoverable secp256k1 signatures.
pub struct Secp256k1Signer {
    signing_key: SigningKey,
}

impl Secp256k1Signer {
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        Self {
            signing_key: SigningKey::random(rng),
        }
    }

    /// Import a 32-byte secret scalar. The caller's copy is wiped.
    pub fn from_secret(secret: &mut [u8; 32]) -> Result<Self, ModuleError> {
        let key = SigningKey::from_slice(secret.as_slice());
        secret.zeroize();
        Ok(Self {
            signing_key: key.map_err(|_| ModuleError::InvalidSecretKey)?,
        })
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl IdentitySigner for Secp256k1Signer {
    fn identity(&self) -> Vec<u8> {
        identity_of(self.verifying_key()).to_vec()
    }

    fn signature_size(&self) -> usize {
        SIGNATURE_SIZE
    }

    fn sign(&self, message: &Hash) -> Result<Vec<u8>, ModuleError> {
        let (sig, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(message)
            .map_err(|_| ModuleError::ParseSignature)?;
        let mut out = Vec::with_capacity(SIGNATURE_SIZE);
        out.extend_from_slice(&sig.to_bytes());
        out.push(recovery_id.to_byte());
        Ok(out)
    }
}

impl std::fmt::Debug for Secp256k1Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1Signer")
            .field("identity", &hex::encode(self.identity()))
            .finish_non_exhaustive()
    }
}
