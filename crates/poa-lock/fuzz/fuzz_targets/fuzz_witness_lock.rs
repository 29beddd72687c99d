//! Fuzz target for the witness lock decoder and signing message.

#![no_main]

use libfuzzer_sys::fuzz_target;
use poa_lock::compute_signing_message;
use poa_lock::domain::WitnessLock;

#[derive(Debug, arbitrary::Arbitrary)]
struct WitnessInput {
    witness: Vec<u8>,
    claimed_len: u16,
    tx_hash: [u8; 32],
}

fuzz_target!(|input: WitnessInput| {
    let total = input.witness.len().max(input.claimed_len as usize);
    if let Ok(lock) = WitnessLock::parse(&input.witness, total) {
        assert!(lock.remainder_offset() <= input.witness.len());
        assert_eq!(lock.signature(&input.witness).len(), lock.lock_len());
    }

    // Never panics on arbitrary witnesses.
    let _ = compute_signing_message(&input.tx_hash, &input.witness, &[], &[]);
});
