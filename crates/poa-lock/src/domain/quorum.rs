//! # Signer Checks
//!
//! Identity matching for the two flows:
//!
//! - block production: the identity recovered from the single signature must
//!   be the proposed leader's identity;
//! - configuration change: `change_threshold` equal-size signature slots, each
//!   resolving to a distinct member of the prior aggregator set.

use super::config::AuthorityConfig;
use super::errors::EncodingError;
use subtle::ConstantTimeEq;
use tracing::debug;

/// Aggregator indices are single bytes, so 256 bits cover every set.
const MASK_WORDS: usize = 4;

/// Set of aggregator indices that already signed a slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityMask {
    words: [u64; MASK_WORDS],
}

impl IdentityMask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `index`. Returns `false` when it was already marked.
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, bit) = Self::locate(index);
        let already = self.words[word] & bit != 0;
        self.words[word] |= bit;
        !already
    }

    pub fn contains(&self, index: usize) -> bool {
        let (word, bit) = Self::locate(index);
        self.words[word] & bit != 0
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn locate(index: usize) -> (usize, u64) {
        let index = index % (MASK_WORDS * 64);
        (index / 64, 1u64 << (index % 64))
    }
}

/// Check the identity recovered from a block production signature.
pub fn verify_leader(
    config: &AuthorityConfig<'_>,
    aggregator_index: u16,
    recovered: &[u8],
) -> Result<(), EncodingError> {
    let expected = config.identity(aggregator_index as usize).ok_or(
        EncodingError::AggregatorIndexOutOfRange {
            index: aggregator_index,
            count: config.aggregator_count,
        },
    )?;
    if recovered.len() != expected.len() {
        debug!(len = recovered.len(), "invalid identity size");
        return Err(EncodingError::IdentitySizeMismatch {
            expected: expected.len(),
            actual: recovered.len(),
        });
    }
    if !bool::from(recovered.ct_eq(expected)) {
        debug!(aggregator_index, "signature does not come from the leader");
        return Err(EncodingError::IdentityMismatch(aggregator_index));
    }
    Ok(())
}

/// Split the lock payload into `threshold` equal-size signatures.
pub fn split_signatures(
    signatures: &[u8],
    threshold: u8,
) -> Result<std::slice::ChunksExact<'_, u8>, EncodingError> {
    if threshold == 0 {
        debug!("change threshold is zero");
        return Err(EncodingError::ZeroThreshold);
    }
    let threshold_len = threshold as usize;
    if signatures.is_empty() || signatures.len() % threshold_len != 0 {
        debug!(len = signatures.len(), threshold, "invalid signature length");
        return Err(EncodingError::UnevenSignatures {
            len: signatures.len(),
            threshold,
        });
    }
    Ok(signatures.chunks_exact(signatures.len() / threshold_len))
}

/// Running tally of configuration change signers.
#[derive(Debug)]
pub struct QuorumTally<'a, 'c> {
    config: &'a AuthorityConfig<'c>,
    signed: IdentityMask,
}

impl<'a, 'c> QuorumTally<'a, 'c> {
    pub fn new(config: &'a AuthorityConfig<'c>) -> Self {
        Self {
            config,
            signed: IdentityMask::new(),
        }
    }

    /// Record the identity recovered for signature `slot`; returns the
    /// aggregator index it belongs to.
    pub fn record(&mut self, slot: usize, recovered: &[u8]) -> Result<usize, EncodingError> {
        let expected = self.config.identity_size as usize;
        if recovered.len() != expected {
            debug!(slot, len = recovered.len(), "invalid identity size");
            return Err(EncodingError::IdentitySizeMismatch {
                expected,
                actual: recovered.len(),
            });
        }
        let index = self
            .config
            .identities()
            .position(|candidate| bool::from(candidate.ct_eq(recovered)))
            .ok_or_else(|| {
                debug!(slot, "identity outside the aggregator set");
                EncodingError::UnknownIdentity(slot)
            })?;
        if !self.signed.insert(index) {
            debug!(slot, index, "identity signed twice");
            return Err(EncodingError::DuplicateIdentity { index, slot });
        }
        Ok(index)
    }

    /// Number of distinct aggregators recorded.
    pub fn signers(&self) -> usize {
        self.signed.len()
    }

    /// Whether the configured threshold has been reached.
    pub fn is_met(&self) -> bool {
        self.config.change_threshold > 0 && self.signers() >= self.config.change_threshold as usize
    }
}
