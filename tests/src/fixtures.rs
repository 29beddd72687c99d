//! Shared fixtures: aggregator key sets, authority transactions, and the
//! signing step an aggregator performs before broadcasting.

use poa_lock::{
    compute_signing_message, encode_witness_args, AuthorityLockApi, AuthorityLockService,
    AuthoritySetup, Hash, InMemoryTransaction, LockArgs, LockResult, MemoryCell, ModuleRegistry,
    ReferenceKind, RoundState, SinceValue, ValidationOutcome,
};
use poa_verifiers::ed25519::{self, Ed25519Signer};
use poa_verifiers::secp256k1_blake160::{self, Secp256k1Signer};
use poa_verifiers::{builtin_registry, module_type_hash, IdentitySigner};

/// Type hash of the authority configuration cell.
pub const CONFIG_TYPE_HASH: Hash = [0xC1; 32];

/// Type hash of the round state cell.
pub const STATE_TYPE_HASH: Hash = [0x5E; 32];

/// Round parameters shared by a fixture set.
#[derive(Debug, Clone, Copy)]
pub struct RoundParams {
    pub wall_clock: bool,
    pub round_duration: u32,
    pub subblocks_per_round: u32,
    pub change_threshold: u8,
}

impl Default for RoundParams {
    fn default() -> Self {
        Self {
            wall_clock: true,
            round_duration: 100,
            subblocks_per_round: 3,
            change_threshold: 2,
        }
    }
}

/// Aggregators with their keys and the setup naming them.
pub struct AggregatorSet {
    pub signers: Vec<Box<dyn IdentitySigner>>,
    pub setup: AuthoritySetup,
}

impl AggregatorSet {
    fn new(signers: Vec<Box<dyn IdentitySigner>>, module: &str, params: RoundParams) -> Self {
        let setup = AuthoritySetup {
            code_reference: module_type_hash(module),
            reference_kind: ReferenceKind::Type,
            interval_uses_wall_clock: params.wall_clock,
            change_threshold: params.change_threshold,
            round_duration: params.round_duration,
            subblocks_per_round: params.subblocks_per_round,
            identities: signers.iter().map(|signer| signer.identity()).collect(),
        };
        Self { signers, setup }
    }

    pub fn secp256k1(count: usize, params: RoundParams) -> Self {
        let mut rng = rand::thread_rng();
        let signers = (0..count)
            .map(|_| Box::new(Secp256k1Signer::random(&mut rng)) as Box<dyn IdentitySigner>)
            .collect();
        Self::new(signers, secp256k1_blake160::NAME, params)
    }

    pub fn ed25519(count: usize, params: RoundParams) -> Self {
        let mut rng = rand::thread_rng();
        let signers = (0..count)
            .map(|_| Box::new(Ed25519Signer::generate(&mut rng)) as Box<dyn IdentitySigner>)
            .collect();
        Self::new(signers, ed25519::NAME, params)
    }

    pub fn config_data(&self) -> Vec<u8> {
        self.setup.to_bytes().expect("fixture setup is valid")
    }

    pub fn signer(&self, index: usize) -> &dyn IdentitySigner {
        self.signers[index].as_ref()
    }

    pub fn signers_at(&self, indices: &[usize]) -> Vec<&dyn IdentitySigner> {
        indices.iter().map(|&i| self.signer(i)).collect()
    }
}

pub fn lock_args() -> Vec<u8> {
    LockArgs {
        config_reference: CONFIG_TYPE_HASH,
        state_reference: STATE_TYPE_HASH,
    }
    .to_bytes()
    .to_vec()
}

pub fn config_cell(data: Vec<u8>) -> MemoryCell {
    MemoryCell::new(data).with_type_hash(CONFIG_TYPE_HASH)
}

pub fn state_cell(state: &RoundState) -> MemoryCell {
    MemoryCell::new(state.to_bytes().to_vec()).with_type_hash(STATE_TYPE_HASH)
}

/// Unsigned subblock transaction: the authority state cell moves from
/// `prior` to `proposed` with the configuration as a cell dep.
pub fn block_transaction(
    config: Vec<u8>,
    prior: &RoundState,
    proposed: &RoundState,
    since: SinceValue,
) -> InMemoryTransaction {
    InMemoryTransaction::builder(lock_args())
        .cell_dep(config_cell(config))
        .group_input(state_cell(prior), since.0)
        .group_output(state_cell(proposed))
        .build()
}

/// Unsigned configuration replacement transaction.
pub fn config_change_transaction(prior: Vec<u8>, proposed: Vec<u8>) -> InMemoryTransaction {
    InMemoryTransaction::builder(lock_args())
        .group_input(config_cell(prior), 0)
        .group_output(config_cell(proposed))
        .build()
}

/// Put the concatenated signatures of `signers` into the lock field of the
/// first group witness.
pub fn sign_lock(mut tx: InMemoryTransaction, signers: &[&dyn IdentitySigner]) -> InMemoryTransaction {
    let size: usize = signers.iter().map(|signer| signer.signature_size()).sum();
    let placeholder = encode_witness_args(Some(&vec![0u8; size]), None, None);
    let position = tx.group_input_positions()[0];
    tx.set_witness(position, placeholder.clone());

    let message = signing_message(&tx, &placeholder);
    let mut lock = Vec::with_capacity(size);
    for signer in signers {
        lock.extend(signer.sign(&message).expect("fixture signing"));
    }
    tx.set_witness(position, encode_witness_args(Some(&lock), None, None));
    tx
}

/// Digest the lock will compute for `tx` once `first_witness` is in place.
pub fn signing_message(tx: &InMemoryTransaction, first_witness: &[u8]) -> Hash {
    let extras: Vec<&[u8]> = tx
        .witnesses()
        .get(tx.inputs_count()..)
        .unwrap_or(&[])
        .iter()
        .map(Vec::as_slice)
        .collect();
    compute_signing_message(&tx.tx_hash(), first_witness, &[], &extras)
        .expect("placeholder witness is well formed")
}

pub fn registry() -> ModuleRegistry {
    builtin_registry().expect("builtin modules register")
}

pub fn validate(tx: InMemoryTransaction) -> LockResult<ValidationOutcome> {
    AuthorityLockService::new(tx, registry()).validate()
}

pub fn exit_code(tx: InMemoryTransaction) -> i8 {
    AuthorityLockService::new(tx, registry()).exit_code()
}

pub fn state(start: u64, subtime: u64, index: u32, aggregator: u16) -> RoundState {
    RoundState {
        round_start_time: start,
        subtime,
        subblock_index: index,
        aggregator_index: aggregator,
    }
}
