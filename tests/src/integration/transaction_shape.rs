//! # Transaction Shape
//!
//! Structural rejections: group cardinality, cell lookup, witness layout,
//! module resolution, and the exit code each one maps to.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use poa_lock::{
        encode_witness_args, EncodingError, InMemoryTransaction, LoaderError, LockError,
        MemoryCell, SinceValue, Source, SysError, TransactionError,
    };

    fn since() -> SinceValue {
        SinceValue::absolute_timestamp(1050)
    }

    fn set() -> AggregatorSet {
        AggregatorSet::secp256k1(3, RoundParams::default())
    }

    #[test]
    fn test_two_group_inputs() {
        let set = set();
        let tx = InMemoryTransaction::builder(lock_args())
            .cell_dep(config_cell(set.config_data()))
            .group_input(state_cell(&state(1000, 1000, 0, 0)), since().0)
            .group_input(MemoryCell::new(vec![]), 0)
            .group_output(state_cell(&state(1000, 1050, 1, 0)))
            .build();
        let tx = sign_lock(tx, &[set.signer(0)]);
        assert_eq!(
            validate(tx.clone()),
            Err(LockError::Transaction(TransactionError::MultipleGroupInputs))
        );
        assert_eq!(exit_code(tx), -1);
    }

    #[test]
    fn test_two_group_outputs() {
        let set = set();
        let tx = InMemoryTransaction::builder(lock_args())
            .cell_dep(config_cell(set.config_data()))
            .group_input(state_cell(&state(1000, 1000, 0, 0)), since().0)
            .group_output(state_cell(&state(1000, 1050, 1, 0)))
            .group_output(MemoryCell::new(vec![]))
            .build();
        assert_eq!(
            validate(sign_lock(tx, &[set.signer(0)])),
            Err(LockError::Transaction(TransactionError::MultipleGroupOutputs))
        );
    }

    #[test]
    fn test_ambiguous_configuration_dep() {
        let set = set();
        let tx = InMemoryTransaction::builder(lock_args())
            .cell_dep(config_cell(set.config_data()))
            .cell_dep(config_cell(set.config_data()))
            .group_input(state_cell(&state(1000, 1000, 0, 0)), since().0)
            .group_output(state_cell(&state(1000, 1050, 1, 0)))
            .build();
        let tx = sign_lock(tx, &[set.signer(0)]);
        assert_eq!(
            validate(tx.clone()),
            Err(LockError::Encoding(EncodingError::AmbiguousCell(Source::CellDep)))
        );
        assert_eq!(exit_code(tx), -2);
    }

    #[test]
    fn test_missing_state_output() {
        let set = set();
        let tx = InMemoryTransaction::builder(lock_args())
            .cell_dep(config_cell(set.config_data()))
            .group_input(state_cell(&state(1000, 1000, 0, 0)), since().0)
            .build();
        assert_eq!(
            validate(sign_lock(tx, &[set.signer(0)])),
            Err(LockError::Encoding(EncodingError::MissingCell(Source::Output)))
        );
    }

    #[test]
    fn test_truncated_state_cell() {
        let set = set();
        let tx = InMemoryTransaction::builder(lock_args())
            .cell_dep(config_cell(set.config_data()))
            .group_input(state_cell(&state(1000, 1000, 0, 0)), since().0)
            .output(MemoryCell::new(vec![0u8; 21]).with_type_hash(STATE_TYPE_HASH))
            .build();
        assert_eq!(
            validate(sign_lock(tx, &[set.signer(0)])),
            Err(LockError::Encoding(EncodingError::InvalidStateLength(21)))
        );
    }

    #[test]
    fn test_missing_witness() {
        let set = set();
        let tx = block_transaction(
            set.config_data(),
            &state(1000, 1000, 0, 0),
            &state(1000, 1050, 1, 0),
            since(),
        );
        assert_eq!(
            validate(tx.clone()),
            Err(LockError::Syscall(SysError::IndexOutOfBound))
        );
        assert_eq!(exit_code(tx), 1);
    }

    #[test]
    fn test_malformed_witnesses() {
        let set = set();
        let mut tx = block_transaction(
            set.config_data(),
            &state(1000, 1000, 0, 0),
            &state(1000, 1050, 1, 0),
            since(),
        );
        tx.set_witness(0, vec![0u8; 8]);
        assert_eq!(
            validate(tx.clone()),
            Err(LockError::Encoding(EncodingError::WitnessTooShort(8)))
        );

        tx.set_witness(0, vec![0xFF; 64]);
        assert_eq!(
            validate(tx.clone()),
            Err(LockError::Encoding(EncodingError::MalformedWitness))
        );

        tx.set_witness(0, encode_witness_args(Some(&vec![0u8; 40_000]), None, None));
        assert!(matches!(
            validate(tx),
            Err(LockError::Encoding(EncodingError::WitnessLockTooLong { .. }))
        ));
    }

    #[test]
    fn test_unknown_verification_module() {
        let mut set = set();
        set.setup.code_reference = [0xEE; 32];
        let tx = block_transaction(
            set.config_data(),
            &state(1000, 1000, 0, 0),
            &state(1000, 1050, 1, 0),
            since(),
        );
        let tx = sign_lock(tx, &[set.signer(0)]);
        assert_eq!(
            validate(tx.clone()),
            Err(LockError::Loader(LoaderError::ModuleNotFound))
        );
        assert_eq!(exit_code(tx), -3);
    }

    #[test]
    fn test_module_error_code_is_forwarded() {
        let set = set();
        let tx = block_transaction(
            set.config_data(),
            &state(1000, 1000, 0, 0),
            &state(1000, 1050, 1, 0),
            since(),
        );
        let mut tx = sign_lock(tx, &[set.signer(0)]);
        tx.set_witness(0, encode_witness_args(Some(&[0u8; 64]), None, None));
        let code = exit_code(tx);
        assert_eq!(code, poa_verifiers::ModuleError::InvalidSignatureLength {
            expected: 65,
            actual: 64
        }
        .code());
    }

    #[test]
    fn test_extra_witnesses_are_signed() {
        let set = set();
        let tx = InMemoryTransaction::builder(lock_args())
            .cell_dep(config_cell(set.config_data()))
            .group_input(state_cell(&state(1000, 1000, 0, 0)), since().0)
            .group_output(state_cell(&state(1000, 1050, 1, 0)))
            .witness(vec![])
            .witness(vec![0xAB; 100])
            .build();
        let signed = sign_lock(tx, &[set.signer(0)]);
        assert!(validate(signed.clone()).is_ok());

        let mut tampered = signed;
        tampered.set_witness(1, vec![0xAC; 100]);
        assert!(validate(tampered).is_err());
    }

    #[test]
    fn test_wrong_args_length() {
        let set = set();
        let tx = InMemoryTransaction::builder(vec![0u8; 63])
            .cell_dep(config_cell(set.config_data()))
            .group_input(state_cell(&state(1000, 1000, 0, 0)), since().0)
            .group_output(state_cell(&state(1000, 1050, 1, 0)))
            .build();
        assert_eq!(
            validate(sign_lock(tx, &[set.signer(0)])),
            Err(LockError::Encoding(EncodingError::InvalidArgsLength(63)))
        );
    }
}
