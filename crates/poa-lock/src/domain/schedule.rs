//! # Aggregator Planner
//!
//! Off-chain counterpart of the round validator: tells one aggregator when
//! it may issue and which state and since its next subblock must carry so the
//! lock accepts it.

use super::config::AuthorityConfig;
use super::round::{earliest_start, rotation_steps};
use super::since::SinceValue;
use super::state::RoundState;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Whether an aggregator should produce a subblock now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueDecision {
    /// The aggregator's turn has arrived; a new round starts.
    Yes,
    /// Inside the aggregator's own round: issue only when enough work is pending.
    YesIfFull,
    /// Not this aggregator's turn.
    No,
}

/// The next subblock as it must appear on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSubblock {
    pub state: RoundState,
    pub since: SinceValue,
    pub new_round: bool,
}

/// Scheduling memory of a single aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorSchedule {
    aggregator_index: u16,
    round_start: Option<u64>,
}

impl AggregatorSchedule {
    pub fn new(aggregator_index: u16) -> Self {
        Self {
            aggregator_index,
            round_start: None,
        }
    }

    /// Restore an aggregator that opened a round at `round_start`.
    pub fn resume(aggregator_index: u16, round_start: u64) -> Self {
        Self {
            aggregator_index,
            round_start: Some(round_start),
        }
    }

    pub fn aggregator_index(&self) -> u16 {
        self.aggregator_index
    }

    /// Start of the round this aggregator opened, while it is running.
    pub fn round_start(&self) -> Option<u64> {
        self.round_start
    }

    /// Decide whether to issue at `now`, given the latest on-chain state.
    pub fn should_issue(
        &mut self,
        config: &AuthorityConfig<'_>,
        last: &RoundState,
        now: u64,
    ) -> IssueDecision {
        if config.aggregator_count == 0 {
            return IssueDecision::No;
        }

        if let Some(start) = self.round_start {
            let end = start.saturating_add(config.round_duration as u64);
            if now < end {
                trace!(remaining = end - now, "aggregator in round");
                return IssueDecision::YesIfFull;
            }
            self.round_start = None;
        }

        let count = config.aggregator_count as u64;
        let steps = match rotation_steps(
            last.aggregator_index,
            self.aggregator_index,
            config.aggregator_count,
        ) {
            0 => count,
            steps => steps,
        };
        let next_start = earliest_start(last.round_start_time, steps, config.round_duration)
            .unwrap_or(u64::MAX);
        debug!(
            on_chain_index = last.aggregator_index,
            steps, next_start, "checking aggregator turn"
        );

        if now >= next_start {
            self.round_start = Some(now);
            IssueDecision::Yes
        } else {
            IssueDecision::No
        }
    }

    /// Build the successor of `last` for this aggregator at `now`.
    pub fn next_subblock(
        &mut self,
        config: &AuthorityConfig<'_>,
        last: &RoundState,
        now: u64,
    ) -> PlannedSubblock {
        let round_end = last
            .round_start_time
            .saturating_add(config.round_duration as u64);
        let own_round = config.aggregator_count > 0
            && last.aggregator_index as u64 % config.aggregator_count as u64
                == self.aggregator_index as u64;
        let fits = last
            .subblock_index
            .checked_add(1)
            .map_or(false, |next| next < config.subblocks_per_round);

        let state = if own_round && now < round_end && fits {
            let subtime = now.max(last.subtime);
            RoundState {
                round_start_time: last.round_start_time,
                subtime,
                subblock_index: last.subblock_index + 1,
                aggregator_index: last.aggregator_index,
            }
        } else {
            self.round_start = Some(now);
            RoundState {
                round_start_time: now,
                subtime: now,
                subblock_index: 0,
                aggregator_index: self.aggregator_index,
            }
        };

        PlannedSubblock {
            since: SinceValue::for_metric(config.interval_uses_wall_clock, state.subtime),
            new_round: state.subblock_index == 0,
            state,
        }
    }
}
