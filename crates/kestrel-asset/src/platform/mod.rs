//! Platform configuration variants
//!
//! Each supported platform has a config type implementing [`PlatformConfig`].
//! [`PlatformAsset`] is the tagged union the registry stores and the store
//! persists; documents carry a `platform` field naming the variant.
//!
//! # Supported Platforms
//!
//! - [`OpenStackConfig`] - OpenStack private cloud
//! - [`BareMetalConfig`] - existing hosts over SSH
//! - [`LibvirtConfig`] - libvirt/QEMU hypervisor

mod baremetal;
mod libvirt;
mod openstack;

pub use baremetal::BareMetalConfig;
pub use libvirt::LibvirtConfig;
pub use openstack::{OpenStackConfig, OpenStackCredentials};

use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use kestrel_common::{Error, Result};

use crate::asset::{Asset, InfraAsset};
use crate::PlatformKind;

/// Name of the discriminator field in persisted documents
pub const PLATFORM_TAG: &str = "platform";

/// Placeholder shown in place of secrets
pub const REDACTED: &str = "<redacted>";

/// Configuration payload of one platform kind
///
/// `normalize` fills derived fields and is always run before `validate`.
/// Neither touches any registry.
pub trait PlatformConfig:
    Clone + std::fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// The platform this config targets
    const KIND: PlatformKind;

    /// Fill derived fields (default schemes, trimmed names)
    fn normalize(&mut self) {}

    /// Check required fields and cross-field consistency
    fn validate(&self) -> Result<()>;

    /// A complete, valid example configuration
    fn sample() -> Self;

    /// Wrap into the registry/persistence representation
    fn into_asset(self) -> PlatformAsset;

    /// Borrow the config back out of a [`PlatformAsset`] of the same kind
    fn from_asset(asset: &PlatformAsset) -> Option<&Self>;
}

/// A platform configuration tagged with its kind
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum PlatformAsset {
    /// OpenStack configuration
    OpenStack(OpenStackConfig),
    /// Bare metal configuration
    BareMetal(BareMetalConfig),
    /// Libvirt configuration
    Libvirt(LibvirtConfig),
}

impl PlatformAsset {
    /// The platform kind of the wrapped config
    pub fn kind(&self) -> PlatformKind {
        match self {
            Self::OpenStack(_) => PlatformKind::OpenStack,
            Self::BareMetal(_) => PlatformKind::BareMetal,
            Self::Libvirt(_) => PlatformKind::Libvirt,
        }
    }

    /// Sample configuration for `kind`
    pub fn sample(kind: PlatformKind) -> Self {
        match kind {
            PlatformKind::OpenStack => OpenStackConfig::sample().into_asset(),
            PlatformKind::BareMetal => BareMetalConfig::sample().into_asset(),
            PlatformKind::Libvirt => LibvirtConfig::sample().into_asset(),
        }
    }

    /// Typed view of the config, if it is of kind `C::KIND`
    pub fn config<C: PlatformConfig>(&self) -> Option<&C> {
        C::from_asset(self)
    }

    /// Wrap in an uninitialized lifecycle handle of the matching variant
    pub fn into_handle(self) -> Box<dyn Asset> {
        match self {
            Self::OpenStack(cfg) => Box::new(InfraAsset::new(cfg)),
            Self::BareMetal(cfg) => Box::new(InfraAsset::new(cfg)),
            Self::Libvirt(cfg) => Box::new(InfraAsset::new(cfg)),
        }
    }

    /// Copy with secrets replaced, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Self::OpenStack(cfg) = &mut copy {
            if !cfg.credentials.password.is_empty() {
                cfg.credentials.password = REDACTED.to_string();
            }
        }
        copy
    }

    /// Encode as a YAML document
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::serialization_for_kind(self.kind().as_str(), e.to_string()))
    }

    /// Decode a YAML (or JSON) document
    ///
    /// An unknown `platform` tag is reported as unsupported rather than as a
    /// parse failure.
    pub fn from_yaml(bytes: &[u8]) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_slice(bytes)
            .map_err(|e| Error::serialization(format!("invalid asset document: {e}")))?;

        let tag = value
            .get(PLATFORM_TAG)
            .and_then(serde_yaml::Value::as_str)
            .ok_or_else(|| {
                Error::serialization(format!(
                    "asset document has no `{PLATFORM_TAG}` field"
                ))
            })?;
        let kind: PlatformKind = tag.parse()?;

        serde_yaml::from_value(value)
            .map_err(|e| Error::serialization_for_kind(kind.as_str(), e.to_string()))
    }
}

/// JSON schema of the config type for `kind`
pub fn config_schema(kind: PlatformKind) -> RootSchema {
    match kind {
        PlatformKind::OpenStack => schemars::schema_for!(OpenStackConfig),
        PlatformKind::BareMetal => schemars::schema_for!(BareMetalConfig),
        PlatformKind::Libvirt => schemars::schema_for!(LibvirtConfig),
    }
}
