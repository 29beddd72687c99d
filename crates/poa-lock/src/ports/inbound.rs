//! # Inbound Ports (Driving Ports / API)
//!
//! The validation entry point a host calls once per transaction.

use crate::constants::EXIT_SUCCESS;
use crate::domain::errors::LockResult;
use crate::domain::outcome::ValidationOutcome;

/// Authority lock validation API.
pub trait AuthorityLockApi {
    /// Run one complete validation of the transaction.
    ///
    /// Each call starts from an empty module slot. Any error is final for
    /// the transaction.
    fn validate(&self) -> LockResult<ValidationOutcome>;

    /// Run the validation and report the host exit code: `0` accepts, any
    /// other value rejects.
    fn exit_code(&self) -> i8 {
        match self.validate() {
            Ok(_) => EXIT_SUCCESS,
            Err(e) => e.code(),
        }
    }
}
