//! Fuzz target for round progression.

#![no_main]

use libfuzzer_sys::fuzz_target;
use poa_lock::domain::round::validate_transition;
use poa_lock::{AuthorityConfig, AuthoritySetup, ReferenceKind, RoundState, SinceValue, Transition};

#[derive(Debug, arbitrary::Arbitrary)]
struct TransitionInput {
    aggregator_count: u8,
    round_duration: u32,
    subblocks_per_round: u32,
    wall_clock: bool,
    prior: [u8; 22],
    proposed: [u8; 22],
    since: u64,
}

fuzz_target!(|input: TransitionInput| {
    let count = input.aggregator_count.max(1);
    let setup = AuthoritySetup {
        code_reference: [0u8; 32],
        reference_kind: ReferenceKind::Data,
        interval_uses_wall_clock: input.wall_clock,
        change_threshold: 1,
        round_duration: input.round_duration,
        subblocks_per_round: input.subblocks_per_round,
        identities: (0..count).map(|i| vec![i]).collect(),
    };
    let Ok(bytes) = setup.to_bytes() else {
        return;
    };
    let Ok(config) = AuthorityConfig::parse(&bytes) else {
        return;
    };
    let (Ok(prior), Ok(proposed)) = (
        RoundState::parse(&input.prior),
        RoundState::parse(&input.proposed),
    ) else {
        return;
    };

    // Must never panic, including on overflowing times.
    let result = validate_transition(&config, &prior, &proposed, SinceValue(input.since));

    match result {
        Ok(Transition::Continuation) => {
            assert_eq!(proposed.aggregator_index, prior.aggregator_index);
            assert_eq!(proposed.subblock_index, prior.subblock_index + 1);
            assert!(proposed.subblock_index < config.subblocks_per_round);
        }
        Ok(Transition::Rollover { steps }) => {
            assert_eq!(proposed.subblock_index, 0);
            assert_eq!(proposed.round_start_time, proposed.subtime);
            assert!(steps < count as u64);
        }
        Err(_) => {}
    }
});
