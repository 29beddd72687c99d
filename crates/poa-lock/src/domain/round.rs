//! # Round Progression
//!
//! Decides whether a proposed authority state is a legal successor of the
//! prior one. Two transitions exist:
//!
//! - **Continuation**: `since < prior.round_start_time + round_duration`. The
//!   same leader emits the next subblock of its window.
//! - **Rollover**: otherwise. A new window opens at the proposed subtime, led
//!   by an aggregator whose turn has arrived in strict index order.
//!
//! Pure logic, no I/O.

use super::config::AuthorityConfig;
use super::errors::EncodingError;
use super::since::SinceValue;
use super::state::RoundState;
use tracing::debug;

/// Accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Same leader, next subblock of the running window.
    Continuation,
    /// New window; `steps` is the rotation distance from the prior leader.
    Rollover { steps: u64 },
}

/// Validate `prior -> proposed` under `config`, given the input's since.
pub fn validate_transition(
    config: &AuthorityConfig<'_>,
    prior: &RoundState,
    proposed: &RoundState,
    since: SinceValue,
) -> Result<Transition, EncodingError> {
    if proposed.aggregator_index as usize >= config.aggregator_count as usize {
        debug!(index = proposed.aggregator_index, "invalid aggregator index");
        return Err(EncodingError::AggregatorIndexOutOfRange {
            index: proposed.aggregator_index,
            count: config.aggregator_count,
        });
    }

    let since = since.metric_value(config.interval_uses_wall_clock)?;
    if since != proposed.subtime {
        debug!(since, subtime = proposed.subtime, "invalid current time");
        return Err(EncodingError::SubtimeMismatch {
            since,
            subtime: proposed.subtime,
        });
    }

    let round_end = prior
        .round_start_time
        .checked_add(config.round_duration as u64)
        .ok_or(EncodingError::TimeOverflow)?;

    if since < round_end {
        validate_continuation(config, prior, proposed)?;
        Ok(Transition::Continuation)
    } else {
        let steps = validate_rollover(config, prior, proposed, since)?;
        Ok(Transition::Rollover { steps })
    }
}

fn validate_continuation(
    config: &AuthorityConfig<'_>,
    prior: &RoundState,
    proposed: &RoundState,
) -> Result<(), EncodingError> {
    if proposed.round_start_time != prior.round_start_time {
        debug!("invalid current round first timestamp");
        return Err(EncodingError::RoundStartChanged {
            prior: prior.round_start_time,
            proposed: proposed.round_start_time,
        });
    }
    if proposed.subtime < prior.subtime {
        debug!("invalid current timestamp");
        return Err(EncodingError::SubtimeDecreased {
            prior: prior.subtime,
            proposed: proposed.subtime,
        });
    }
    if proposed.aggregator_index != prior.aggregator_index {
        debug!("invalid aggregator");
        return Err(EncodingError::AggregatorChanged {
            prior: prior.aggregator_index,
            proposed: proposed.aggregator_index,
        });
    }

    let expected = prior
        .subblock_index
        .checked_add(1)
        .ok_or(EncodingError::InvalidSubblockIndex {
            expected: u32::MAX,
            actual: proposed.subblock_index,
        })?;
    if proposed.subblock_index != expected {
        debug!("invalid subblock index");
        return Err(EncodingError::InvalidSubblockIndex {
            expected,
            actual: proposed.subblock_index,
        });
    }
    if proposed.subblock_index >= config.subblocks_per_round {
        debug!("subblock cap reached");
        return Err(EncodingError::SubblockCapReached {
            index: proposed.subblock_index,
            cap: config.subblocks_per_round,
        });
    }
    Ok(())
}

fn validate_rollover(
    config: &AuthorityConfig<'_>,
    prior: &RoundState,
    proposed: &RoundState,
    since: u64,
) -> Result<u64, EncodingError> {
    if proposed.round_start_time != proposed.subtime {
        debug!("invalid new round first timestamp");
        return Err(EncodingError::RoundStartNotSubtime {
            round_start: proposed.round_start_time,
            subtime: proposed.subtime,
        });
    }
    if proposed.subblock_index != 0 {
        debug!("invalid subblock index");
        return Err(EncodingError::InvalidSubblockIndex {
            expected: 0,
            actual: proposed.subblock_index,
        });
    }

    let steps = rotation_steps(
        prior.aggregator_index,
        proposed.aggregator_index,
        config.aggregator_count,
    );
    let eligible_at = earliest_start(prior.round_start_time, steps, config.round_duration)
        .ok_or(EncodingError::TimeOverflow)?;
    if since < eligible_at {
        debug!(since, eligible_at, "leader not yet entitled");
        return Err(EncodingError::LeaderNotEntitled {
            aggregator: proposed.aggregator_index,
            eligible_at,
            since,
        });
    }
    Ok(steps)
}

/// Rotation distance from `prior` to `next` among `count` aggregators.
///
/// The prior index is reduced modulo `count` first, so a state written under
/// a larger aggregator set still rotates into the current one.
pub fn rotation_steps(prior: u16, next: u16, count: u8) -> u64 {
    if count == 0 {
        return 0;
    }
    if prior >= count as u16 {
        debug!(prior, count, "prior aggregator index out of range");
    }
    let count = count as u64;
    let prior = prior as u64 % count;
    (next as u64 + count - prior) % count
}

/// Earliest time a leader `steps` positions ahead may open its window.
pub fn earliest_start(round_start_time: u64, steps: u64, round_duration: u32) -> Option<u64> {
    steps
        .checked_mul(round_duration as u64)
        .and_then(|wait| round_start_time.checked_add(wait))
}
