//! Named registry of lookup instances
//!
//! The runtime creates one lookup when an execution context is set up and
//! registers it under a well-known name. Execution contexts resolve the
//! name once and then hold the instance directly.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let registry = LookupRegistry::new();
//! registry.install_local(&LookupConfig::default(), &cache)?;
//!
//! let ctx = ExecutionContext::from_registry(&registry, COMPILATION_CACHE_LOOKUP)?;
//! ```

use kiln_core::{CacheView, KilnError, KilnResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::config::{LookupConfig, Topology};
use crate::contract::ProgramLookup;
use crate::local::LocalLookup;
use crate::remote::{LookupTransport, RemoteLookup};

/// Well-known name of the compilation cache lookup
pub const COMPILATION_CACHE_LOOKUP: &str = "compilation_cache_lookup";

/// Registry of lookup instances by name
#[derive(Default)]
pub struct LookupRegistry {
    lookups: RwLock<HashMap<String, Arc<dyn ProgramLookup>>>,
}

impl LookupRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lookup under `name`
    ///
    /// Replaces (and returns) any lookup previously registered under `name`.
    pub fn register(
        &self,
        name: impl Into<String>,
        lookup: Arc<dyn ProgramLookup>,
    ) -> Option<Arc<dyn ProgramLookup>> {
        let name = name.into();
        info!(target: "kiln::registry", %name, lookup = %lookup.debug_string(), "Lookup registered");
        self.lookups.write().insert(name, lookup)
    }

    /// Create a `LocalLookup` over `cache` and register it per `config`
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the config is invalid or its topology is not local.
    pub fn install_local<C: CacheView + 'static>(
        &self,
        config: &LookupConfig,
        cache: &Arc<C>,
    ) -> KilnResult<Arc<dyn ProgramLookup>> {
        config.validate()?;
        if config.topology()? != Topology::Local {
            return Err(KilnError::invalid_input(format!(
                "cannot install a local lookup for topology '{}'",
                config.topology
            )));
        }
        let lookup: Arc<dyn ProgramLookup> = Arc::new(LocalLookup::new(cache));
        self.register(config.resource_name.clone(), Arc::clone(&lookup));
        Ok(lookup)
    }

    /// Create a `RemoteLookup` over `transport` and register it per `config`
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the config is invalid or its topology is not remote.
    pub fn install_remote<T: LookupTransport + 'static>(
        &self,
        config: &LookupConfig,
        transport: T,
    ) -> KilnResult<Arc<dyn ProgramLookup>> {
        config.validate()?;
        if config.topology()? != Topology::Remote {
            return Err(KilnError::invalid_input(format!(
                "cannot install a remote lookup for topology '{}'",
                config.topology
            )));
        }
        let lookup: Arc<dyn ProgramLookup> =
            Arc::new(RemoteLookup::with_config(transport, config.remote.clone()));
        self.register(config.resource_name.clone(), Arc::clone(&lookup));
        Ok(lookup)
    }

    /// Get the lookup registered under `name`
    pub fn get(&self, name: &str) -> Option<Arc<dyn ProgramLookup>> {
        self.lookups.read().get(name).cloned()
    }

    /// Remove the lookup registered under `name`
    pub fn unregister(&self, name: &str) -> Option<Arc<dyn ProgramLookup>> {
        self.lookups.write().remove(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lookups.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the number of registered lookups
    pub fn len(&self) -> usize {
        self.lookups.read().len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.lookups.read().is_empty()
    }
}

impl fmt::Debug for LookupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupRegistry")
            .field("names", &self.names())
            .finish()
    }
}
