//! Namespace registry.
//!
//! Maps case-insensitive identifiers to live [`RamFs`] instances. Backed by
//! a `DashMap`, so unrelated namespaces never contend with each other or with
//! any instance's tree lock.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::info;

use crate::config::{FsConfig, RegistryConfig};
use crate::error::{FsError, FsResult};
use crate::fs::RamFs;
use crate::path::CiString;

/// Identifier → filesystem directory. At most one live instance per
/// identifier.
#[derive(Debug, Default)]
pub struct Registry {
    instances: DashMap<CiString, Arc<RamFs>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry with every namespace in `config` registered.
    pub fn from_config(config: &RegistryConfig) -> FsResult<Self> {
        let registry = Self::new();
        for ns in &config.namespaces {
            registry.register(&ns.name, ns.options())?;
        }
        Ok(registry)
    }

    /// Create a fresh instance under `id`.
    ///
    /// Fails `AlreadyExists` while an open instance holds the identifier. A
    /// closed instance left behind is replaced.
    pub fn register(&self, id: &str, config: FsConfig) -> FsResult<Arc<RamFs>> {
        let fs = match self.instances.entry(CiString::new(id)) {
            Entry::Occupied(existing) if existing.get().is_open() => {
                return Err(FsError::already_exists(id));
            }
            Entry::Occupied(mut stale) => {
                let fs = Arc::new(RamFs::new(id, config));
                stale.insert(Arc::clone(&fs));
                fs
            }
            Entry::Vacant(slot) => Arc::clone(slot.insert(Arc::new(RamFs::new(id, config))).value()),
        };
        info!(fs = id, read_only = fs.is_read_only(), "namespace registered");
        Ok(fs)
    }

    /// The live instance registered under `id`.
    pub fn lookup(&self, id: &str) -> FsResult<Arc<RamFs>> {
        let key = CiString::new(id);
        if let Some(fs) = self.instances.get(&key) {
            if fs.is_open() {
                return Ok(Arc::clone(fs.value()));
            }
        }
        self.instances.remove_if(&key, |_, fs| !fs.is_open());
        Err(FsError::not_found(id))
    }

    /// Close the instance under `id` and forget it.
    pub fn dispose(&self, id: &str) -> FsResult<()> {
        let (_, fs) = self
            .instances
            .remove(&CiString::new(id))
            .ok_or_else(|| FsError::not_found(id))?;
        fs.close();
        info!(fs = id, "namespace disposed");
        Ok(())
    }

    /// Names of live instances, sorted case-insensitively.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<CiString> = self
            .instances
            .iter()
            .filter(|entry| entry.value().is_open())
            .map(|entry| CiString::new(entry.value().name()))
            .collect();
        names.sort();
        names.into_iter().map(CiString::into_string).collect()
    }

    /// Number of live instances. Closed entries awaiting pruning are not
    /// counted, matching [`names`](Self::names).
    pub fn len(&self) -> usize {
        self.instances
            .iter()
            .filter(|entry| entry.value().is_open())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
