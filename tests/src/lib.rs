//! # PoA Authority Lock Test Suite
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs          # Aggregator sets, transactions, lock signing
//! └── integration/
//!     ├── block_production.rs
//!     ├── configuration_change.rs
//!     ├── scenarios.rs
//!     └── transaction_shape.rs
//! ```
//!
//! Every scenario runs the full lock over an in-memory transaction with real
//! secp256k1 or ed25519 signatures resolved through the builtin registry.
//!
//! ```bash
//! cargo test -p poa-tests
//! cargo bench -p poa-tests
//! ```

pub mod fixtures;
