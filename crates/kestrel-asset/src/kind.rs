//! Platform kinds an asset can target

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use kestrel_common::Error;

/// Supported infrastructure platform kinds
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// OpenStack private cloud
    OpenStack,
    /// Pre-provisioned hosts reachable over SSH
    BareMetal,
    /// Local or remote libvirt/QEMU hypervisor
    Libvirt,
}

impl PlatformKind {
    /// All platform kinds, in registry iteration order
    pub const ALL: &'static [PlatformKind] = &[Self::OpenStack, Self::BareMetal, Self::Libvirt];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenStack => "openstack",
            Self::BareMetal => "baremetal",
            Self::Libvirt => "libvirt",
        }
    }

    /// True if the platform creates machines (and so can assign addresses)
    pub fn provisions_machines(&self) -> bool {
        matches!(self, Self::OpenStack | Self::Libvirt)
    }
}

impl std::str::FromStr for PlatformKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openstack" => Ok(Self::OpenStack),
            "baremetal" | "bare-metal" => Ok(Self::BareMetal),
            "libvirt" => Ok(Self::Libvirt),
            _ => Err(Error::unsupported_platform(s)),
        }
    }
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
