//! # Round-Robin Proof-of-Authority Lock
//!
//! Deterministic accept/reject validation for transactions that spend and
//! recreate an aggregator authority cell.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): binary layouts, round progression, signer
//!   checks and the off-chain planner. No I/O.
//! - **Ports Layer** (`ports/`): the validation API, the transaction source and
//!   the verification module resolver.
//! - **Components**: `locator` (unique cell lookup), `message` (signing
//!   message), `loader` (per-validation module state).
//! - **Service Layer** (`service.rs`): wires the components into the two
//!   validation flows.
//! - **Adapters** (`adapters/`): in-memory transaction and module registry.
//!
//! ## Flows
//!
//! - **Block production**: the configuration is a cell dependency. The
//!   proposed round state must legally follow the prior one and be signed by
//!   the aggregator it names.
//! - **Configuration change**: the configuration cell itself is spent and
//!   recreated. `change_threshold` distinct members of the prior aggregator
//!   set must sign.
//!
//! Every failure maps to a non-zero exit code through [`LockError::code`].

pub mod adapters;
pub mod constants;
pub mod domain;
pub mod hashing;
pub mod loader;
pub mod locator;
pub mod message;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{InMemoryTransaction, MemoryCell, ModuleRegistry, RegistryError};
pub use domain::{
    encode_witness_args, AggregatorSchedule, AuthorityConfig, AuthoritySetup, EncodingError,
    IssueDecision, LoaderError, LockError, LockResult, PlannedSubblock, ReferenceKind,
    RoundState, SetupError, SinceValue, Transition, TransactionError, ValidationOutcome,
};
pub use hashing::{blake160, ledger_hash, Hash, LedgerHasher};
pub use loader::ValidationContext;
pub use locator::{locate_cell, require_cell};
pub use message::{build_signing_message, compute_signing_message, SigningMessageBuilder};
pub use ports::inbound::AuthorityLockApi;
pub use ports::outbound::{
    LoadPrefilledDataFn, ModuleResolver, Source, SysError, TransactionSource, ValidateSignatureFn,
    VerificationModule,
};
pub use service::{AuthorityLockService, LockArgs};
