//! # Verification Module Loader
//!
//! [`ValidationContext`] owns everything a loaded verification module needs
//! for one validation: the module slot, the code budget, the prefilled data
//! buffer and the identity scratch buffer. A context is created empty at the
//! start of a validation and a module may be loaded into it exactly once.

use crate::constants::{CODE_BUFFER_SIZE, IDENTITY_BUFFER_SIZE, PREFILLED_DATA_SIZE};
use crate::domain::config::ReferenceKind;
use crate::domain::errors::{LoaderError, LockError, LockResult};
use crate::hashing::Hash;
use crate::ports::outbound::{ModuleResolver, ValidateSignatureFn};
use tracing::{debug, trace};

#[derive(Clone, Copy)]
struct LoadedModule {
    name: &'static str,
    validate_signature: ValidateSignatureFn,
}

/// Per-validation module state.
pub struct ValidationContext<R> {
    resolver: R,
    code_consumed: usize,
    prefilled: Box<[u8]>,
    prefilled_len: usize,
    identity: [u8; IDENTITY_BUFFER_SIZE],
    loaded: Option<LoadedModule>,
}

impl<R: ModuleResolver> ValidationContext<R> {
    /// Empty context with all buffers allocated up front.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            code_consumed: 0,
            prefilled: vec![0u8; PREFILLED_DATA_SIZE].into_boxed_slice(),
            prefilled_len: 0,
            identity: [0u8; IDENTITY_BUFFER_SIZE],
            loaded: None,
        }
    }

    /// Resolve and load the verification module, then fill its prefilled data.
    pub fn load_module(&mut self, code_reference: &Hash, kind: ReferenceKind) -> LockResult<()> {
        if self.loaded.is_some() {
            debug!("verification module already loaded");
            return Err(LoaderError::AlreadyLoaded.into());
        }

        let module = *self
            .resolver
            .resolve(code_reference, kind)
            .ok_or_else(|| {
                debug!(?kind, "verification module not found");
                LoaderError::ModuleNotFound
            })?;

        let available = CODE_BUFFER_SIZE - self.code_consumed;
        if module.code.len() > available {
            debug!(module = module.name, "code budget exceeded");
            return Err(LoaderError::CodeBudgetExceeded {
                required: module.code.len(),
                available,
            }
            .into());
        }
        self.code_consumed += module.code.len();

        let load_prefilled_data = module
            .load_prefilled_data
            .ok_or(LoaderError::MissingEntryPoint("load_prefilled_data"))?;
        let validate_signature = module
            .validate_signature
            .ok_or(LoaderError::MissingEntryPoint("validate_signature"))?;

        let len = load_prefilled_data(&mut self.prefilled).map_err(|code| {
            debug!(module = module.name, code, "loading prefilled data failed");
            LockError::Module(code)
        })?;
        if len > self.prefilled.len() {
            return Err(LoaderError::PrefilledDataTooLarge {
                len,
                cap: self.prefilled.len(),
            }
            .into());
        }
        self.prefilled_len = len;

        trace!(module = module.name, prefilled = len, "verification module loaded");
        self.loaded = Some(LoadedModule {
            name: module.name,
            validate_signature,
        });
        Ok(())
    }

    /// Verify `signature` over `message` and return the signer identity.
    pub fn recover_identity(&mut self, signature: &[u8], message: &Hash) -> LockResult<&[u8]> {
        let module = self.loaded.ok_or(LoaderError::NotLoaded)?;
        let len = (module.validate_signature)(
            &self.prefilled[..self.prefilled_len],
            signature,
            message,
            &mut self.identity,
        )
        .map_err(|code| {
            debug!(module = module.name, code, "signature verification failed");
            LockError::Module(code)
        })?;
        if len > self.identity.len() {
            return Err(LoaderError::IdentityTooLarge {
                len,
                cap: self.identity.len(),
            }
            .into());
        }
        Ok(&self.identity[..len])
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Bytes of the code budget used so far.
    pub fn code_consumed(&self) -> usize {
        self.code_consumed
    }
}
