use crate::constants::HASH_SIZE;
use crate::hashing::{ledger_hash, Hash, LedgerHasher};
use crate::ports::outbound::{Source, SysError, TransactionSource};

/// A cell as the lock can observe it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCell {
    pub capacity: u64,
    pub lock_hash: Hash,
    pub type_hash: Option<Hash>,
    pub data: Vec<u8>,
}

impl MemoryCell {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            capacity: 0,
            lock_hash: [0u8; HASH_SIZE],
            type_hash: None,
            data: data.into(),
        }
    }

    pub fn with_type_hash(mut self, type_hash: Hash) -> Self {
        self.type_hash = Some(type_hash);
        self
    }

    pub fn with_lock_hash(mut self, lock_hash: Hash) -> Self {
        self.lock_hash = lock_hash;
        self
    }

    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoryInput {
    cell: MemoryCell,
    since: u64,
}

/// In-memory transaction for tests and off-chain dry runs.
///
/// The executing lock script is identified by its args; cells whose lock hash
/// equals [`InMemoryTransaction::script_hash`] form the script group. The
/// transaction hash covers everything except witnesses, so witnesses may be
/// filled in after the signing message is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryTransaction {
    script_args: Vec<u8>,
    script_hash: Hash,
    cell_deps: Vec<MemoryCell>,
    inputs: Vec<MemoryInput>,
    outputs: Vec<MemoryCell>,
    witnesses: Vec<Vec<u8>>,
    tx_hash: Hash,
}

impl InMemoryTransaction {
    pub fn builder(script_args: impl Into<Vec<u8>>) -> InMemoryTransactionBuilder {
        InMemoryTransactionBuilder::new(script_args.into())
    }

    /// Lock hash of the authority lock instantiated with `args`.
    pub fn script_hash_for(args: &[u8]) -> Hash {
        let mut hasher = LedgerHasher::new();
        hasher.update(b"authority-lock").update_len(args.len()).update(args);
        hasher.finalize()
    }

    pub fn script_hash(&self) -> Hash {
        self.script_hash
    }

    pub fn tx_hash(&self) -> Hash {
        self.tx_hash
    }

    pub fn inputs_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn witnesses(&self) -> &[Vec<u8>] {
        &self.witnesses
    }

    /// Replace or append the witness at `index`, padding with empty witnesses.
    pub fn set_witness(&mut self, index: usize, witness: Vec<u8>) {
        if self.witnesses.len() <= index {
            self.witnesses.resize(index + 1, Vec::new());
        }
        self.witnesses[index] = witness;
    }

    /// Transaction-level positions of the group inputs.
    pub fn group_input_positions(&self) -> Vec<usize> {
        self.inputs
            .iter()
            .enumerate()
            .filter(|(_, input)| input.cell.lock_hash == self.script_hash)
            .map(|(position, _)| position)
            .collect()
    }

    fn group_position(&self, index: usize, source: Source) -> Result<usize, SysError> {
        let script_hash = self.script_hash;
        let position = match source {
            Source::GroupInput => self
                .inputs
                .iter()
                .enumerate()
                .filter(|(_, input)| input.cell.lock_hash == script_hash)
                .map(|(position, _)| position)
                .nth(index),
            Source::GroupOutput => self
                .outputs
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.lock_hash == script_hash)
                .map(|(position, _)| position)
                .nth(index),
            _ => Some(index),
        };
        position.ok_or(SysError::IndexOutOfBound)
    }

    fn cell(&self, index: usize, source: Source) -> Result<&MemoryCell, SysError> {
        let cell = match source {
            Source::CellDep => self.cell_deps.get(index),
            Source::Input => self.inputs.get(index).map(|input| &input.cell),
            Source::Output => self.outputs.get(index),
            Source::GroupInput => {
                let position = self.group_position(index, source)?;
                self.inputs.get(position).map(|input| &input.cell)
            }
            Source::GroupOutput => {
                let position = self.group_position(index, source)?;
                self.outputs.get(position)
            }
        };
        cell.ok_or(SysError::IndexOutOfBound)
    }
}

/// Copy `data[offset..]` into `buf` and report the remaining length.
fn load_partial(data: &[u8], buf: &mut [u8], offset: usize) -> usize {
    let remaining = data.get(offset..).unwrap_or(&[]);
    let copied = remaining.len().min(buf.len());
    buf[..copied].copy_from_slice(&remaining[..copied]);
    remaining.len()
}

impl TransactionSource for InMemoryTransaction {
    fn load_tx_hash(&self, buf: &mut [u8]) -> Result<usize, SysError> {
        Ok(load_partial(&self.tx_hash, buf, 0))
    }

    fn load_script_args(&self, buf: &mut [u8]) -> Result<usize, SysError> {
        Ok(load_partial(&self.script_args, buf, 0))
    }

    fn load_witness(
        &self,
        buf: &mut [u8],
        offset: usize,
        index: usize,
        source: Source,
    ) -> Result<usize, SysError> {
        let position = match source {
            Source::CellDep => return Err(SysError::IndexOutOfBound),
            _ => self.group_position(index, source)?,
        };
        let witness = self
            .witnesses
            .get(position)
            .ok_or(SysError::IndexOutOfBound)?;
        Ok(load_partial(witness, buf, offset))
    }

    fn load_cell_data(
        &self,
        buf: &mut [u8],
        offset: usize,
        index: usize,
        source: Source,
    ) -> Result<usize, SysError> {
        let cell = self.cell(index, source)?;
        Ok(load_partial(&cell.data, buf, offset))
    }

    fn load_cell_type_hash(&self, index: usize, source: Source) -> Result<Option<Hash>, SysError> {
        Ok(self.cell(index, source)?.type_hash)
    }

    fn load_cell_capacity(&self, index: usize, source: Source) -> Result<u64, SysError> {
        Ok(self.cell(index, source)?.capacity)
    }

    fn load_input_since(&self, index: usize, source: Source) -> Result<u64, SysError> {
        let position = match source {
            Source::Input => index,
            Source::GroupInput => self.group_position(index, source)?,
            _ => return Err(SysError::IndexOutOfBound),
        };
        self.inputs
            .get(position)
            .map(|input| input.since)
            .ok_or(SysError::IndexOutOfBound)
    }
}

/// Builder for [`InMemoryTransaction`].
#[derive(Debug, Clone)]
pub struct InMemoryTransactionBuilder {
    script_args: Vec<u8>,
    script_hash: Hash,
    cell_deps: Vec<MemoryCell>,
    inputs: Vec<MemoryInput>,
    outputs: Vec<MemoryCell>,
    witnesses: Vec<Vec<u8>>,
}

impl InMemoryTransactionBuilder {
    fn new(script_args: Vec<u8>) -> Self {
        let script_hash = InMemoryTransaction::script_hash_for(&script_args);
        Self {
            script_args,
            script_hash,
            cell_deps: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            witnesses: Vec::new(),
        }
    }

    pub fn script_hash(&self) -> Hash {
        self.script_hash
    }

    pub fn cell_dep(mut self, cell: MemoryCell) -> Self {
        self.cell_deps.push(cell);
        self
    }

    pub fn input(mut self, cell: MemoryCell, since: u64) -> Self {
        self.inputs.push(MemoryInput { cell, since });
        self
    }

    pub fn output(mut self, cell: MemoryCell) -> Self {
        self.outputs.push(cell);
        self
    }

    /// Input locked by the executing script.
    pub fn group_input(self, cell: MemoryCell, since: u64) -> Self {
        let lock_hash = self.script_hash;
        self.input(cell.with_lock_hash(lock_hash), since)
    }

    /// Output locked by the executing script.
    pub fn group_output(self, cell: MemoryCell) -> Self {
        let lock_hash = self.script_hash;
        self.output(cell.with_lock_hash(lock_hash))
    }

    pub fn witness(mut self, witness: Vec<u8>) -> Self {
        self.witnesses.push(witness);
        self
    }

    pub fn build(self) -> InMemoryTransaction {
        let tx_hash = self.compute_tx_hash();
        InMemoryTransaction {
            script_args: self.script_args,
            script_hash: self.script_hash,
            cell_deps: self.cell_deps,
            inputs: self.inputs,
            outputs: self.outputs,
            witnesses: self.witnesses,
            tx_hash,
        }
    }

    fn compute_tx_hash(&self) -> Hash {
        fn absorb_cell(hasher: &mut LedgerHasher, cell: &MemoryCell) {
            hasher
                .update(&cell.capacity.to_le_bytes())
                .update(&cell.lock_hash)
                .update(&cell.type_hash.unwrap_or([0u8; HASH_SIZE]))
                .update(&ledger_hash(&cell.data));
        }

        let mut hasher = LedgerHasher::new();
        hasher.update_len(self.cell_deps.len());
        for cell in &self.cell_deps {
            absorb_cell(&mut hasher, cell);
        }
        hasher.update_len(self.inputs.len());
        for input in &self.inputs {
            absorb_cell(&mut hasher, &input.cell);
            hasher.update(&input.since.to_le_bytes());
        }
        hasher.update_len(self.outputs.len());
        for cell in &self.outputs {
            absorb_cell(&mut hasher, cell);
        }
        hasher.finalize()
    }
}
