//! # Block Production
//!
//! A leader moves the authority state cell forward, either continuing its
//! round or taking over a new one, and signs with its own key.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use poa_lock::{
        AggregatorSchedule, AuthorityConfig, EncodingError, IssueDecision, LockError,
        RoundState, SinceValue, Transition, ValidationOutcome,
    };

    fn produce(
        set: &AggregatorSet,
        signer: usize,
        prior: &RoundState,
        proposed: &RoundState,
        since: SinceValue,
    ) -> Result<ValidationOutcome, LockError> {
        let tx = block_transaction(set.config_data(), prior, proposed, since);
        validate(sign_lock(tx, &[set.signer(signer)]))
    }

    #[test]
    fn test_leader_continues_its_round() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        let outcome = produce(
            &set,
            0,
            &state(1000, 1000, 0, 0),
            &state(1000, 1050, 1, 0),
            SinceValue::absolute_timestamp(1050),
        );
        assert_eq!(
            outcome,
            Ok(ValidationOutcome::BlockProduced {
                aggregator_index: 0,
                transition: Transition::Continuation,
            })
        );
    }

    #[test]
    fn test_next_leader_takes_over() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        let outcome = produce(
            &set,
            1,
            &state(1000, 1050, 1, 0),
            &state(1100, 1100, 0, 1),
            SinceValue::absolute_timestamp(1100),
        );
        assert_eq!(
            outcome,
            Ok(ValidationOutcome::BlockProduced {
                aggregator_index: 1,
                transition: Transition::Rollover { steps: 1 },
            })
        );
    }

    #[test]
    fn test_skipping_a_leader_waits_two_rounds() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        let prior = state(1000, 1050, 1, 0);

        assert_eq!(
            produce(
                &set,
                2,
                &prior,
                &state(1199, 1199, 0, 2),
                SinceValue::absolute_timestamp(1199)
            ),
            Err(LockError::Encoding(EncodingError::LeaderNotEntitled {
                aggregator: 2,
                eligible_at: 1200,
                since: 1199,
            }))
        );
        assert_eq!(
            produce(
                &set,
                2,
                &prior,
                &state(1200, 1200, 0, 2),
                SinceValue::absolute_timestamp(1200)
            ),
            Ok(ValidationOutcome::BlockProduced {
                aggregator_index: 2,
                transition: Transition::Rollover { steps: 2 },
            })
        );
    }

    #[test]
    fn test_block_signed_by_another_aggregator() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        assert_eq!(
            produce(
                &set,
                2,
                &state(1000, 1000, 0, 0),
                &state(1000, 1050, 1, 0),
                SinceValue::absolute_timestamp(1050)
            ),
            Err(LockError::Encoding(EncodingError::IdentityMismatch(0)))
        );
    }

    #[test]
    fn test_since_metric_must_match_configuration() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        let outcome = produce(
            &set,
            0,
            &state(1000, 1000, 0, 0),
            &state(1000, 1050, 1, 0),
            SinceValue::absolute_block_number(1050),
        );
        assert!(matches!(
            outcome,
            Err(LockError::Encoding(EncodingError::SinceFlagMismatch { .. }))
        ));
    }

    #[test]
    fn test_block_number_rounds() {
        let params = RoundParams {
            wall_clock: false,
            round_duration: 20,
            ..RoundParams::default()
        };
        let set = AggregatorSet::secp256k1(2, params);
        let outcome = produce(
            &set,
            1,
            &state(500, 505, 1, 0),
            &state(520, 520, 0, 1),
            SinceValue::absolute_block_number(520),
        );
        assert_eq!(
            outcome,
            Ok(ValidationOutcome::BlockProduced {
                aggregator_index: 1,
                transition: Transition::Rollover { steps: 1 },
            })
        );
    }

    #[test]
    fn test_ed25519_aggregators() {
        let set = AggregatorSet::ed25519(4, RoundParams::default());
        let outcome = produce(
            &set,
            3,
            &state(1000, 1000, 0, 0),
            &state(1300, 1300, 0, 3),
            SinceValue::absolute_timestamp(1300),
        );
        assert_eq!(
            outcome,
            Ok(ValidationOutcome::BlockProduced {
                aggregator_index: 3,
                transition: Transition::Rollover { steps: 3 },
            })
        );
    }

    #[test]
    fn test_state_changed_after_signing_is_rejected() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        let prior = state(1000, 1000, 0, 0);
        let signed = sign_lock(
            block_transaction(
                set.config_data(),
                &prior,
                &state(1000, 1050, 1, 0),
                SinceValue::absolute_timestamp(1050),
            ),
            &[set.signer(0)],
        );

        let forged_state = state(1000, 1060, 1, 0);
        let mut forged = block_transaction(
            set.config_data(),
            &prior,
            &forged_state,
            SinceValue::absolute_timestamp(1060),
        );
        let position = forged.group_input_positions()[0];
        forged.set_witness(position, signed.witnesses()[position].clone());

        assert!(validate(forged).is_err());
        assert!(validate(signed).is_ok());
    }

    /// Drive several rounds with the planner and check the lock accepts every
    /// planned subblock.
    #[test]
    fn test_planned_rotation_is_accepted() {
        let set = AggregatorSet::secp256k1(3, RoundParams::default());
        let config_data = set.config_data();
        let config = AuthorityConfig::parse(&config_data).unwrap();

        let mut schedules = vec![
            AggregatorSchedule::resume(0, 1000),
            AggregatorSchedule::new(1),
            AggregatorSchedule::new(2),
        ];
        let mut last = RoundState::genesis(1000);

        let steps = [
            (0, 1010, IssueDecision::YesIfFull),
            (1, 1100, IssueDecision::Yes),
            (1, 1150, IssueDecision::YesIfFull),
            (1, 1160, IssueDecision::YesIfFull),
            (0, 1300, IssueDecision::Yes),
            (2, 1500, IssueDecision::Yes),
        ];
        for (aggregator, now, expected) in steps {
            let schedule = &mut schedules[aggregator];
            assert_eq!(schedule.should_issue(&config, &last, now), expected, "at {now}");

            let planned = schedule.next_subblock(&config, &last, now);
            assert_eq!(planned.new_round, expected == IssueDecision::Yes);
            let tx = block_transaction(config_data.clone(), &last, &planned.state, planned.since);
            let outcome = validate(sign_lock(tx, &[set.signer(aggregator)]));
            assert!(
                matches!(outcome, Ok(ValidationOutcome::BlockProduced { .. })),
                "aggregator {aggregator} at {now}: {outcome:?}"
            );
            last = planned.state;
        }

        assert_eq!(schedules[2].should_issue(&config, &last, 1550), IssueDecision::YesIfFull);
        assert_eq!(schedules[1].should_issue(&config, &last, 1600), IssueDecision::No);
        assert_eq!(last, state(1500, 1500, 0, 2));
    }
}
