//! # Domain Layer
//!
//! Binary layouts, round progression and signer checks.
//! Pure logic with no access to the transaction.

pub mod config;
pub mod errors;
pub mod outcome;
pub mod quorum;
pub mod round;
pub mod schedule;
pub mod setup;
pub mod since;
pub mod state;
pub mod witness;

pub use config::{AuthorityConfig, ReferenceKind};
pub use errors::{
    EncodingError, LoaderError, LockError, LockResult, Source, SysError, TransactionError,
};
pub use outcome::ValidationOutcome;
pub use quorum::{split_signatures, verify_leader, IdentityMask, QuorumTally};
pub use round::{validate_transition, Transition};
pub use schedule::{AggregatorSchedule, IssueDecision, PlannedSubblock};
pub use setup::{AuthoritySetup, SetupError};
pub use since::SinceValue;
pub use state::RoundState;
pub use witness::{encode_witness_args, WitnessLock};
