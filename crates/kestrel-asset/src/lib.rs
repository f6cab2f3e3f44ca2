//! Infrastructure platform assets
//!
//! This crate provides:
//! - [`Asset`] lifecycle trait and the [`InfraAsset`] handle implementing it
//!   for every platform config (OpenStack, bare metal, libvirt)
//! - [`AssetRegistry`] holding the active asset per [`PlatformKind`]
//! - [`AssetStore`] persistence contract with file and in-memory stores
//!
//! # Example
//!
//! ```text
//! let registry = AssetRegistry::global();
//! let mut asset = InfraAsset::new(openstack_config);
//! asset.initial(registry)?;
//! asset.persist(&FileStore::for_kind(dir, PlatformKind::OpenStack)).await?;
//! let active = get_asset(PlatformKind::OpenStack);
//! ```

pub mod asset;
pub mod kind;
pub mod nodes;
pub mod platform;
pub mod registry;
pub mod store;
pub mod validation;

pub use asset::{load_platform_asset, Asset, AssetState, InfraAsset};
pub use kind::PlatformKind;
pub use nodes::NodeLayout;
pub use platform::{
    config_schema, BareMetalConfig, LibvirtConfig, OpenStackConfig, OpenStackCredentials,
    PlatformAsset, PlatformConfig,
};
pub use registry::{get_asset, AssetRegistry, Generation};
pub use store::{AssetStore, FileStore, MemoryStore};

pub use kestrel_common::{Error, Result};
