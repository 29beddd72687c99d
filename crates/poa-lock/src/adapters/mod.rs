//! # Adapters Module
//!
//! - `memory`: in-memory transaction source for tests and dry runs
//! - `registry`: verification modules resolved by data hash or type hash

pub mod memory;
pub mod registry;

pub use memory::{InMemoryTransaction, InMemoryTransactionBuilder, MemoryCell};
pub use registry::{ModuleRegistry, RegistryError};
