//! Libvirt platform configuration

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use kestrel_common::defaults::{LIBVIRT_DEFAULT_NETWORK, LIBVIRT_DEFAULT_URI};
use kestrel_common::Result;

use super::{PlatformAsset, PlatformConfig};
use crate::nodes::NodeLayout;
use crate::validation::{parse_url, require, trim_optional};
use crate::PlatformKind;

/// Libvirt/QEMU hypervisor target
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LibvirtConfig {
    /// Connection URI (default: `qemu:///system`)
    #[serde(default)]
    pub uri: String,

    /// Libvirt network nodes attach to (default: `default`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    /// Base disk image for new domains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    /// Node counts, addresses and hostnames
    #[serde(default)]
    pub nodes: NodeLayout,
}

impl PlatformConfig for LibvirtConfig {
    const KIND: PlatformKind = PlatformKind::Libvirt;

    fn normalize(&mut self) {
        self.uri = self.uri.trim().to_string();
        if self.uri.is_empty() {
            self.uri = LIBVIRT_DEFAULT_URI.to_string();
        }
        trim_optional(&mut self.network);
        if self.network.is_none() {
            self.network = Some(LIBVIRT_DEFAULT_NETWORK.to_string());
        }
        trim_optional(&mut self.image_path);
        self.nodes.normalize();
    }

    fn validate(&self) -> Result<()> {
        require(Self::KIND, "uri", &self.uri)?;
        parse_url(Self::KIND, "uri", &self.uri)?;
        self.nodes.validate(Self::KIND, false)
    }

    fn sample() -> Self {
        Self {
            uri: LIBVIRT_DEFAULT_URI.to_string(),
            network: Some(LIBVIRT_DEFAULT_NETWORK.to_string()),
            image_path: Some("/var/lib/libvirt/images/node.qcow2".to_string()),
            nodes: NodeLayout::sample(),
        }
    }

    fn into_asset(self) -> PlatformAsset {
        PlatformAsset::Libvirt(self)
    }

    fn from_asset(asset: &PlatformAsset) -> Option<&Self> {
        match asset {
            PlatformAsset::Libvirt(cfg) => Some(cfg),
            _ => None,
        }
    }
}
