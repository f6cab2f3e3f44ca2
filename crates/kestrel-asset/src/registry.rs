//! Process-wide registry of active platform assets
//!
//! Holds at most one active [`PlatformAsset`] per [`PlatformKind`]. Readers
//! get a shared `Arc` snapshot; only [`Asset::initial`](crate::Asset::initial)
//! and [`Asset::delete`](crate::Asset::delete) change entries. The lock is
//! held only for the map swap, never across validation or I/O.
//!
//! [`AssetRegistry::global`] is created on first use and lives until process
//! exit. Independent registries can be built with [`AssetRegistry::new`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, info};

use kestrel_common::{Error, Result};

use crate::asset::{load_platform_asset, Asset};
use crate::platform::{PlatformAsset, PlatformConfig};
use crate::store::FileStore;
use crate::PlatformKind;

/// Monotonic activation counter, distinguishing successive assets of a kind
pub type Generation = u64;

static GLOBAL: OnceLock<AssetRegistry> = OnceLock::new();

#[derive(Debug)]
struct Entry {
    asset: Arc<PlatformAsset>,
    generation: Generation,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<PlatformKind, Entry>,
    next_generation: Generation,
}

/// Active asset per platform kind
#[derive(Debug, Default)]
pub struct AssetRegistry {
    inner: RwLock<Inner>,
}

impl AssetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static AssetRegistry {
        GLOBAL.get_or_init(AssetRegistry::new)
    }

    /// The active asset for `kind`, if one has been initialized
    pub fn get(&self, kind: PlatformKind) -> Option<Arc<PlatformAsset>> {
        self.inner
            .read()
            .entries
            .get(&kind)
            .map(|e| Arc::clone(&e.asset))
    }

    /// Look up by platform name
    ///
    /// Unknown names fail with [`Error::UnsupportedPlatform`]; a known but
    /// unconfigured platform is `Ok(None)`.
    pub fn get_by_name(&self, name: &str) -> Result<Option<Arc<PlatformAsset>>> {
        let kind: PlatformKind = name.parse()?;
        Ok(self.get(kind))
    }

    /// Typed copy of the active config of kind `C::KIND`
    pub fn get_config<C: PlatformConfig>(&self) -> Option<C> {
        self.get(C::KIND).and_then(|a| C::from_asset(&a).cloned())
    }

    /// The active asset for `kind`, or [`Error::NotFound`]
    pub fn require(&self, kind: PlatformKind) -> Result<Arc<PlatformAsset>> {
        self.get(kind).ok_or_else(|| {
            Error::not_found(kind.as_str(), format!("no active {kind} asset configured"))
        })
    }

    /// Kinds with an active asset, in [`PlatformKind`] order
    pub fn active_kinds(&self) -> Vec<PlatformKind> {
        let mut kinds: Vec<PlatformKind> = self.inner.read().entries.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Generation of the active entry for `kind`
    pub fn generation(&self, kind: PlatformKind) -> Option<Generation> {
        self.inner.read().entries.get(&kind).map(|e| e.generation)
    }

    /// Make `asset` the active entry for its kind
    ///
    /// An identical active asset keeps its entry and generation.
    pub(crate) fn activate(&self, asset: PlatformAsset) -> Generation {
        let kind = asset.kind();
        let mut inner = self.inner.write();

        if let Some(existing) = inner.entries.get(&kind) {
            if *existing.asset == asset {
                return existing.generation;
            }
        }

        inner.next_generation += 1;
        let generation = inner.next_generation;
        let previous = inner.entries.insert(
            kind,
            Entry {
                asset: Arc::new(asset),
                generation,
            },
        );
        drop(inner);

        if let Some(previous) = previous {
            debug!(
                platform = %kind,
                superseded = previous.generation,
                generation,
                "superseded active asset"
            );
        }
        generation
    }

    /// Remove the entry for `kind` if it is still `generation`
    ///
    /// Returns whether an entry was removed.
    pub(crate) fn deactivate(&self, kind: PlatformKind, generation: Generation) -> bool {
        let mut inner = self.inner.write();
        match inner.entries.get(&kind) {
            Some(entry) if entry.generation == generation => {
                inner.entries.remove(&kind);
                true
            }
            _ => false,
        }
    }

    /// Rebuild state from documents persisted under `dir`
    ///
    /// Every `<kind>.yaml` present is loaded and initialized. Missing files
    /// are skipped; unreadable or invalid ones fail the restore. Returns the
    /// activated handles so callers can later delete them.
    pub async fn restore(&self, dir: &Path) -> Result<Vec<Box<dyn Asset>>> {
        let mut restored = Vec::new();
        for kind in PlatformKind::ALL {
            if let Some(handle) = self.restore_kind(dir, *kind).await? {
                restored.push(handle);
            }
        }

        info!(
            dir = %dir.display(),
            restored = restored.len(),
            "restored assets from disk"
        );
        Ok(restored)
    }

    /// Load and initialize the document for `kind` under `dir`, if present
    pub async fn restore_kind(
        &self,
        dir: &Path,
        kind: PlatformKind,
    ) -> Result<Option<Box<dyn Asset>>> {
        let store = FileStore::for_kind(dir, kind);
        if !store.exists().await? {
            return Ok(None);
        }

        let asset = load_platform_asset(&store).await?;
        if asset.kind() != kind {
            return Err(Error::validation_for(
                kind.as_str(),
                format!(
                    "{} holds a {} asset",
                    store.path().display(),
                    asset.kind()
                ),
            ));
        }

        let mut handle = asset.into_handle();
        handle.initial(self)?;
        Ok(Some(handle))
    }
}

/// The active asset for `kind` in the process-wide registry
pub fn get_asset(kind: PlatformKind) -> Option<Arc<PlatformAsset>> {
    AssetRegistry::global().get(kind)
}
