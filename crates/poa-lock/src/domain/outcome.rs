//! Accepted validation results.

use super::round::Transition;

/// What an accepted transaction did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The entitled leader produced a subblock.
    BlockProduced {
        aggregator_index: u16,
        transition: Transition,
    },
    /// A quorum of the prior aggregator set replaced the configuration.
    ConfigurationChanged { signers: usize },
}
