//! # Authority Lock Service
//!
//! Application service implementing [`AuthorityLockApi`]. One call to
//! [`AuthorityLockApi::validate`] is one complete validation:
//!
//! 1. at most one group input and one group output;
//! 2. signature extracted from the first group witness, signing message built;
//! 3. script args read: configuration reference, then state reference;
//! 4. configuration found among cell deps: block production, checked by the
//!    round validator and the leader's signature. Otherwise the configuration
//!    is being replaced: prior and proposed configuration cells among inputs
//!    and outputs, authorized by a quorum of the prior aggregator set.

use crate::constants::{
    CONFIG_BUFFER_SIZE, HASH_SIZE, ROUND_STATE_SIZE, SCRIPT_ARGS_SIZE, WITNESS_BUFFER_SIZE,
};
use crate::domain::config::AuthorityConfig;
use crate::domain::errors::{EncodingError, LockResult, TransactionError};
use crate::domain::outcome::ValidationOutcome;
use crate::domain::quorum::{split_signatures, verify_leader, QuorumTally};
use crate::domain::round::validate_transition;
use crate::domain::since::SinceValue;
use crate::domain::state::RoundState;
use crate::domain::witness::WitnessLock;
use crate::hashing::Hash;
use crate::loader::ValidationContext;
use crate::locator::{locate_cell, require_cell};
use crate::message::build_signing_message;
use crate::ports::inbound::AuthorityLockApi;
use crate::ports::outbound::{ModuleResolver, Source, TransactionSource};
use tracing::{debug, trace};

/// The two 32-byte references carried in the lock script args.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockArgs {
    pub config_reference: Hash,
    pub state_reference: Hash,
}

impl LockArgs {
    pub fn parse(args: &[u8]) -> Result<Self, EncodingError> {
        if args.len() != SCRIPT_ARGS_SIZE {
            debug!(len = args.len(), "invalid script args length");
            return Err(EncodingError::InvalidArgsLength(args.len()));
        }
        let mut config_reference = [0u8; HASH_SIZE];
        let mut state_reference = [0u8; HASH_SIZE];
        config_reference.copy_from_slice(&args[..HASH_SIZE]);
        state_reference.copy_from_slice(&args[HASH_SIZE..]);
        Ok(Self {
            config_reference,
            state_reference,
        })
    }

    pub fn to_bytes(&self) -> [u8; SCRIPT_ARGS_SIZE] {
        let mut args = [0u8; SCRIPT_ARGS_SIZE];
        args[..HASH_SIZE].copy_from_slice(&self.config_reference);
        args[HASH_SIZE..].copy_from_slice(&self.state_reference);
        args
    }
}

/// Signature and message shared by both flows.
struct SignedPayload<'w> {
    signature: &'w [u8],
    message: Hash,
}

/// Authority lock validation over a transaction source and module resolver.
pub struct AuthorityLockService<T, R> {
    tx: T,
    resolver: R,
}

impl<T: TransactionSource, R: ModuleResolver> AuthorityLockService<T, R> {
    pub fn new(tx: T, resolver: R) -> Self {
        Self { tx, resolver }
    }

    pub fn transaction(&self) -> &T {
        &self.tx
    }

    fn check_group_cardinality(&self) -> LockResult<()> {
        if self.tx.has_cell(1, Source::GroupInput)? {
            debug!("more than one input cell uses the lock");
            return Err(TransactionError::MultipleGroupInputs.into());
        }
        if self.tx.has_cell(1, Source::GroupOutput)? {
            debug!("more than one output cell uses the lock");
            return Err(TransactionError::MultipleGroupOutputs.into());
        }
        Ok(())
    }

    fn load_tx_hash(&self) -> LockResult<Hash> {
        let mut tx_hash = [0u8; HASH_SIZE];
        let len = self.tx.load_tx_hash(&mut tx_hash)?;
        if len != HASH_SIZE {
            debug!(len, "invalid transaction hash length");
            return Err(TransactionError::InvalidTxHashLength(len).into());
        }
        Ok(tx_hash)
    }

    fn load_args(&self) -> LockResult<LockArgs> {
        let mut args = [0u8; SCRIPT_ARGS_SIZE];
        let len = self.tx.load_script_args(&mut args)?;
        if len != SCRIPT_ARGS_SIZE {
            debug!(len, "invalid script args length");
            return Err(EncodingError::InvalidArgsLength(len).into());
        }
        Ok(LockArgs::parse(&args)?)
    }

    fn load_config<'b>(
        &self,
        buf: &'b mut [u8; CONFIG_BUFFER_SIZE],
        index: usize,
        source: Source,
    ) -> LockResult<AuthorityConfig<'b>> {
        let len = self.tx.load_cell_data(&mut buf[..], 0, index, source)?;
        if len > CONFIG_BUFFER_SIZE {
            debug!(len, "authority config too large");
            return Err(EncodingError::ConfigTooLarge {
                len,
                cap: CONFIG_BUFFER_SIZE,
            }
            .into());
        }
        let data: &'b [u8] = buf;
        Ok(AuthorityConfig::parse(&data[..len])?)
    }

    fn load_state(&self, index: usize, source: Source) -> LockResult<RoundState> {
        let mut buf = [0u8; ROUND_STATE_SIZE];
        let len = self.tx.load_cell_data(&mut buf, 0, index, source)?;
        if len != ROUND_STATE_SIZE {
            debug!(len, %source, "invalid round state length");
            return Err(EncodingError::InvalidStateLength(len).into());
        }
        Ok(RoundState::parse(&buf)?)
    }

    /// Normal operation: the leader entitled by the round rules signs.
    fn produce_block(
        &self,
        context: &mut ValidationContext<&R>,
        config_index: usize,
        args: &LockArgs,
        payload: &SignedPayload<'_>,
    ) -> LockResult<ValidationOutcome> {
        let mut config_buf = [0u8; CONFIG_BUFFER_SIZE];
        let config = self.load_config(&mut config_buf, config_index, Source::CellDep)?;

        let prior_index = require_cell(&self.tx, &args.state_reference, Source::Input)?;
        let proposed_index = require_cell(&self.tx, &args.state_reference, Source::Output)?;
        let prior = self.load_state(prior_index, Source::Input)?;
        let proposed = self.load_state(proposed_index, Source::Output)?;
        let since = SinceValue(self.tx.load_input_since(0, Source::GroupInput)?);

        let transition = validate_transition(&config, &prior, &proposed, since)?;
        trace!(?transition, aggregator = proposed.aggregator_index, "round transition accepted");

        context.load_module(&config.code_reference, config.reference_kind)?;
        let identity = context.recover_identity(payload.signature, &payload.message)?;
        verify_leader(&config, proposed.aggregator_index, identity)?;

        Ok(ValidationOutcome::BlockProduced {
            aggregator_index: proposed.aggregator_index,
            transition,
        })
    }

    /// Configuration replacement authorized by the prior aggregator set.
    fn change_configuration(
        &self,
        context: &mut ValidationContext<&R>,
        args: &LockArgs,
        payload: &SignedPayload<'_>,
    ) -> LockResult<ValidationOutcome> {
        let prior_index = require_cell(&self.tx, &args.config_reference, Source::Input)?;
        let proposed_index = require_cell(&self.tx, &args.config_reference, Source::Output)?;

        let mut prior_buf = [0u8; CONFIG_BUFFER_SIZE];
        let mut proposed_buf = [0u8; CONFIG_BUFFER_SIZE];
        let prior = self.load_config(&mut prior_buf, prior_index, Source::Input)?;
        let proposed = self.load_config(&mut proposed_buf, proposed_index, Source::Output)?;
        trace!(
            prior_count = prior.aggregator_count,
            proposed_count = proposed.aggregator_count,
            "configuration change requested"
        );

        let slots = split_signatures(payload.signature, prior.change_threshold)?;
        context.load_module(&prior.code_reference, prior.reference_kind)?;

        let mut tally = QuorumTally::new(&prior);
        for (slot, signature) in slots.enumerate() {
            let identity = context.recover_identity(signature, &payload.message)?;
            tally.record(slot, identity)?;
        }
        trace!(signers = tally.signers(), "configuration change authorized");

        Ok(ValidationOutcome::ConfigurationChanged {
            signers: tally.signers(),
        })
    }
}

impl<T: TransactionSource, R: ModuleResolver> AuthorityLockApi for AuthorityLockService<T, R> {
    fn validate(&self) -> LockResult<ValidationOutcome> {
        let mut context = ValidationContext::new(&self.resolver);

        self.check_group_cardinality()?;

        let mut witness = vec![0u8; WITNESS_BUFFER_SIZE];
        let witness_len = self.tx.load_witness(&mut witness, 0, 0, Source::GroupInput)?;
        let loaded = &witness[..witness_len.min(WITNESS_BUFFER_SIZE)];
        let lock = WitnessLock::parse(loaded, witness_len)?;

        let tx_hash = self.load_tx_hash()?;
        let payload = SignedPayload {
            signature: lock.signature(loaded),
            message: build_signing_message(&self.tx, &tx_hash, loaded, &lock)?,
        };

        let args = self.load_args()?;
        match locate_cell(&self.tx, &args.config_reference, Source::CellDep)? {
            Some(index) => self.produce_block(&mut context, index, &args, &payload),
            None => self.change_configuration(&mut context, &args, &payload),
        }
    }
}
