use crate::domain::config::ReferenceKind;
use crate::hashing::Hash;
use crate::ports::outbound::{ModuleResolver, VerificationModule};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Module `{name}` has the same data hash as `{existing}`")]
    DuplicateDataHash {
        name: &'static str,
        existing: &'static str,
    },

    #[error("Module `{name}` reuses the type hash of `{existing}`")]
    DuplicateTypeHash {
        name: &'static str,
        existing: &'static str,
    },
}

#[derive(Debug, Clone)]
struct RegisteredModule {
    module: VerificationModule,
    data_hash: Hash,
    type_hash: Option<Hash>,
}

/// Verification modules addressable by data hash and, optionally, type hash.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<RegisteredModule>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module reachable by its data hash only.
    pub fn register(&mut self, module: VerificationModule) -> Result<Hash, RegistryError> {
        self.insert(module, None)
    }

    /// Register a module reachable by its data hash and `type_hash`.
    pub fn register_with_type_hash(
        &mut self,
        module: VerificationModule,
        type_hash: Hash,
    ) -> Result<Hash, RegistryError> {
        self.insert(module, Some(type_hash))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn insert(
        &mut self,
        module: VerificationModule,
        type_hash: Option<Hash>,
    ) -> Result<Hash, RegistryError> {
        let data_hash = module.data_hash();
        for existing in &self.modules {
            if existing.data_hash == data_hash {
                return Err(RegistryError::DuplicateDataHash {
                    name: module.name,
                    existing: existing.module.name,
                });
            }
            if type_hash.is_some() && existing.type_hash == type_hash {
                return Err(RegistryError::DuplicateTypeHash {
                    name: module.name,
                    existing: existing.module.name,
                });
            }
        }
        self.modules.push(RegisteredModule {
            module,
            data_hash,
            type_hash,
        });
        Ok(data_hash)
    }
}

impl ModuleResolver for ModuleRegistry {
    fn resolve(&self, code_reference: &Hash, kind: ReferenceKind) -> Option<&VerificationModule> {
        self.modules
            .iter()
            .find(|entry| match kind {
                ReferenceKind::Data => entry.data_hash == *code_reference,
                ReferenceKind::Type => entry.type_hash.as_ref() == Some(code_reference),
            })
            .map(|entry| &entry.module)
    }
}
