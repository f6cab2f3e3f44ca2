//! Asset lifecycle: initial, delete, persist and load
//!
//! [`InfraAsset`] wraps one platform config and drives it through
//! `Uninitialized -> Active -> Deleted`. Activation validates a normalized
//! copy first and only then swaps it into the registry, so a failed
//! `initial` leaves both the handle and the registry untouched.

use async_trait::async_trait;
use tracing::{debug, info};

use kestrel_common::{Error, Result};

use crate::platform::{PlatformAsset, PlatformConfig};
use crate::registry::{AssetRegistry, Generation};
use crate::store::AssetStore;
use crate::PlatformKind;

/// Lifecycle state of an asset handle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssetState {
    /// Constructed or loaded, never activated
    #[default]
    Uninitialized,
    /// Activated into a registry by this handle
    Active,
    /// Deactivated by this handle
    Deleted,
}

impl std::fmt::Display for AssetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Active => write!(f, "active"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// Lifecycle operations every platform asset supports
///
/// Object safe so orchestration code can hold a mixed set of assets.
#[async_trait]
pub trait Asset: Send + Sync {
    /// Platform kind this asset targets
    fn kind(&self) -> PlatformKind;

    /// Current lifecycle state of this handle
    fn state(&self) -> AssetState;

    /// Validate, normalize and activate in `registry`
    ///
    /// Supersedes any asset of the same kind already active there.
    fn initial(&mut self, registry: &AssetRegistry) -> Result<()>;

    /// Deactivate and remove from `registry`
    ///
    /// Succeeds without effect when this handle is not the active asset.
    fn delete(&mut self, registry: &AssetRegistry) -> Result<()>;

    /// Write the current configuration to `store`
    async fn persist(&self, store: &dyn AssetStore) -> Result<()>;

    /// The configuration as its tagged registry representation
    fn to_platform_asset(&self) -> PlatformAsset;
}

/// Lifecycle handle for one platform config
#[derive(Clone, Debug)]
pub struct InfraAsset<C> {
    config: C,
    state: AssetState,
    generation: Option<Generation>,
}

impl<C: PlatformConfig> InfraAsset<C> {
    /// Wrap a config in an uninitialized handle
    pub fn new(config: C) -> Self {
        Self {
            config,
            state: AssetState::Uninitialized,
            generation: None,
        }
    }

    /// The configuration (normalized once `initial` has succeeded)
    pub fn config(&self) -> &C {
        &self.config
    }

    /// True while the entry this handle activated is still the registry's
    ///
    /// Turns false once another `initial` of the same kind supersedes it.
    pub fn is_current(&self, registry: &AssetRegistry) -> bool {
        self.generation
            .is_some_and(|g| registry.generation(C::KIND) == Some(g))
    }

    /// Read a persisted document of kind `C::KIND` from `store`
    ///
    /// The returned handle is uninitialized; call `initial` to activate it.
    pub async fn load(store: &dyn AssetStore) -> Result<Self> {
        let asset = load_platform_asset(store).await?;
        match C::from_asset(&asset) {
            Some(cfg) => Ok(Self::new(cfg.clone())),
            None => Err(Error::validation_for_field(
                C::KIND.as_str(),
                crate::platform::PLATFORM_TAG,
                format!(
                    "{} holds a {} asset, expected {}",
                    store.location(),
                    asset.kind(),
                    C::KIND
                ),
            )),
        }
    }
}

#[async_trait]
impl<C: PlatformConfig> Asset for InfraAsset<C> {
    fn kind(&self) -> PlatformKind {
        C::KIND
    }

    fn state(&self) -> AssetState {
        self.state
    }

    fn initial(&mut self, registry: &AssetRegistry) -> Result<()> {
        let mut candidate = self.config.clone();
        candidate.normalize();
        candidate.validate()?;

        let generation = registry.activate(candidate.clone().into_asset());

        self.config = candidate;
        self.state = AssetState::Active;
        self.generation = Some(generation);
        info!(platform = %self.kind(), generation, "asset activated");
        Ok(())
    }

    fn delete(&mut self, registry: &AssetRegistry) -> Result<()> {
        let kind = self.kind();
        match self.generation.take() {
            Some(generation) if registry.deactivate(kind, generation) => {
                info!(platform = %kind, generation, "asset deleted");
            }
            Some(generation) => {
                debug!(
                    platform = %kind,
                    generation,
                    "asset already superseded or removed, nothing to delete"
                );
            }
            None => {
                debug!(platform = %kind, "asset was never activated, nothing to delete");
            }
        }

        if self.state == AssetState::Active {
            self.state = AssetState::Deleted;
        }
        Ok(())
    }

    async fn persist(&self, store: &dyn AssetStore) -> Result<()> {
        let document = self.to_platform_asset().to_yaml()?;
        store.write(document.as_bytes()).await?;
        info!(platform = %self.kind(), location = %store.location(), "asset persisted");
        Ok(())
    }

    fn to_platform_asset(&self) -> PlatformAsset {
        self.config.clone().into_asset()
    }
}

/// Read and decode whatever asset document `store` holds
pub async fn load_platform_asset(store: &dyn AssetStore) -> Result<PlatformAsset> {
    let bytes = store.read().await?;
    let asset = PlatformAsset::from_yaml(&bytes)?;
    debug!(platform = %asset.kind(), location = %store.location(), "asset loaded");
    Ok(asset)
}
