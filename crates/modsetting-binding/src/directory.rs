//! Process-wide directory of loaded modules.
//!
//! Hosts register a [`LoadedModule`] here when they load and remove it when
//! they unload. Clients never link against a host; they find its exposed
//! type by scanning this directory.

use crate::surface::ExposedType;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// A module loaded into the process, with the types it exposes.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    identity: String,
    types: Vec<Arc<ExposedType>>,
}

impl LoadedModule {
    /// Create a module with the given identity (e.g. `"ModSetting, Version=0.3"`).
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            types: Vec::new(),
        }
    }

    pub fn with_type(mut self, ty: ExposedType) -> Self {
        self.types.push(Arc::new(ty));
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn types(&self) -> &[Arc<ExposedType>] {
        &self.types
    }

    /// Look up an exposed type by its full name.
    pub fn find_type(&self, name: &str) -> Option<Arc<ExposedType>> {
        self.types.iter().find(|ty| ty.name() == name).cloned()
    }
}

/// Registry of loaded modules, in load order.
#[derive(Debug, Default)]
pub struct ModuleDirectory {
    modules: RwLock<Vec<Arc<LoadedModule>>>,
    scans: AtomicUsize,
}

impl ModuleDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide directory.
    pub fn global() -> Arc<ModuleDirectory> {
        static GLOBAL: OnceLock<Arc<ModuleDirectory>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ModuleDirectory::new())))
    }

    /// Register a module. A module with the same identity is replaced.
    pub fn load(&self, module: LoadedModule) {
        let mut modules = self.modules.write();
        modules.retain(|m| m.identity() != module.identity());
        info!(module = %module.identity(), "Module loaded");
        modules.push(Arc::new(module));
    }

    /// Remove a module by identity. Returns whether it was loaded.
    pub fn unload(&self, identity: &str) -> bool {
        let mut modules = self.modules.write();
        let before = modules.len();
        modules.retain(|m| m.identity() != identity);
        let removed = modules.len() != before;
        if removed {
            info!(module = %identity, "Module unloaded");
        }
        removed
    }

    pub fn is_loaded(&self, identity: &str) -> bool {
        self.modules.read().iter().any(|m| m.identity() == identity)
    }

    /// Snapshot of the loaded modules.
    pub fn modules(&self) -> Vec<Arc<LoadedModule>> {
        self.modules.read().clone()
    }

    /// Snapshot taken for discovery. Counted by [`scan_count`](Self::scan_count).
    pub fn scan(&self) -> Vec<Arc<LoadedModule>> {
        let count = self.scans.fetch_add(1, Ordering::Relaxed) + 1;
        let modules = self.modules();
        debug!(scan = count, modules = modules.len(), "Scanning loaded modules");
        modules
    }

    /// Number of discovery scans performed so far.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }
}
