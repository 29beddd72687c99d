//! # Configuration Change
//!
//! Without the configuration among the cell deps, the lock treats the
//! transaction as a replacement of the configuration cell, authorized by
//! `change_threshold` distinct members of the prior aggregator set.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use poa_lock::{EncodingError, LockError, ValidationOutcome};

    fn replacement() -> Vec<u8> {
        AggregatorSet::secp256k1(2, RoundParams {
            change_threshold: 1,
            ..RoundParams::default()
        })
        .config_data()
    }

    #[test]
    fn test_quorum_replaces_configuration() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        let tx = config_change_transaction(set.config_data(), replacement());
        assert_eq!(
            validate(sign_lock(tx, &set.signers_at(&[0, 2]))),
            Ok(ValidationOutcome::ConfigurationChanged { signers: 2 })
        );
    }

    #[test]
    fn test_signature_order_is_free() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        let tx = config_change_transaction(set.config_data(), replacement());
        assert!(validate(sign_lock(tx, &set.signers_at(&[2, 1]))).is_ok());
    }

    #[test]
    fn test_same_aggregator_twice() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        let tx = config_change_transaction(set.config_data(), replacement());
        assert_eq!(
            validate(sign_lock(tx, &set.signers_at(&[1, 1]))),
            Err(LockError::Encoding(EncodingError::DuplicateIdentity {
                index: 1,
                slot: 1
            }))
        );
    }

    #[test]
    fn test_outsider_signature() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        let outsiders = AggregatorSet::secp256k1(1, RoundParams {
            change_threshold: 1,
            ..RoundParams::default()
        });
        let tx = config_change_transaction(set.config_data(), replacement());
        let tx = sign_lock(tx, &[set.signer(0), outsiders.signer(0)]);
        assert_eq!(
            validate(tx),
            Err(LockError::Encoding(EncodingError::UnknownIdentity(1)))
        );
    }

    #[test]
    fn test_too_few_signatures() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        let tx = config_change_transaction(set.config_data(), replacement());
        assert_eq!(
            validate(sign_lock(tx, &set.signers_at(&[0]))),
            Err(LockError::Encoding(EncodingError::UnevenSignatures {
                len: 65,
                threshold: 2
            }))
        );
    }

    #[test]
    fn test_prior_module_verifies_the_change() {
        let set = AggregatorSet::ed25519(3, RoundParams::default());
        let tx = config_change_transaction(set.config_data(), replacement());
        assert_eq!(
            validate(sign_lock(tx, &set.signers_at(&[0, 1]))),
            Ok(ValidationOutcome::ConfigurationChanged { signers: 2 })
        );
    }

    #[test]
    fn test_malformed_replacement() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        let tx = config_change_transaction(set.config_data(), vec![1, 2, 3]);
        assert_eq!(
            validate(sign_lock(tx, &set.signers_at(&[0, 1]))),
            Err(LockError::Encoding(EncodingError::ConfigTooShort(3)))
        );
    }

    #[test]
    fn test_replacement_swapped_after_signing() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        let signed = sign_lock(
            config_change_transaction(set.config_data(), replacement()),
            &set.signers_at(&[0, 1]),
        );

        let mut swapped = config_change_transaction(set.config_data(), replacement());
        let position = swapped.group_input_positions()[0];
        swapped.set_witness(position, signed.witnesses()[position].clone());
        assert!(validate(swapped).is_err());
    }
}
