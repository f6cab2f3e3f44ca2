//! Bare metal platform configuration
//!
//! Hosts already exist and are reached over SSH, so every node address must
//! be listed up front.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use kestrel_common::defaults::{BAREMETAL_DEFAULT_SSH_PORT, BAREMETAL_DEFAULT_SSH_USER};
use kestrel_common::{Error, Result};

use super::{PlatformAsset, PlatformConfig};
use crate::nodes::NodeLayout;
use crate::validation::{require, trim_optional};
use crate::PlatformKind;

fn default_ssh_port() -> u16 {
    BAREMETAL_DEFAULT_SSH_PORT
}

/// Pre-provisioned hosts reachable over SSH
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BareMetalConfig {
    /// SSH login user on every host
    #[serde(default)]
    pub ssh_user: String,

    /// SSH port on every host
    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,

    /// Private key used for SSH (agent keys are used when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key_path: Option<String>,

    /// Node counts, addresses and hostnames
    #[serde(default)]
    pub nodes: NodeLayout,
}

impl Default for BareMetalConfig {
    fn default() -> Self {
        Self {
            ssh_user: String::new(),
            ssh_port: BAREMETAL_DEFAULT_SSH_PORT,
            ssh_key_path: None,
            nodes: NodeLayout::default(),
        }
    }
}

impl PlatformConfig for BareMetalConfig {
    const KIND: PlatformKind = PlatformKind::BareMetal;

    fn normalize(&mut self) {
        self.ssh_user = self.ssh_user.trim().to_string();
        trim_optional(&mut self.ssh_key_path);
        self.nodes.normalize();
    }

    fn validate(&self) -> Result<()> {
        require(Self::KIND, "sshUser", &self.ssh_user)?;
        if self.ssh_port == 0 {
            return Err(Error::validation_for_field(
                Self::KIND.as_str(),
                "sshPort",
                "sshPort must be non-zero",
            ));
        }
        self.nodes.validate(Self::KIND, !Self::KIND.provisions_machines())
    }

    fn sample() -> Self {
        Self {
            ssh_user: BAREMETAL_DEFAULT_SSH_USER.to_string(),
            ssh_port: BAREMETAL_DEFAULT_SSH_PORT,
            ssh_key_path: Some("~/.ssh/id_rsa".to_string()),
            nodes: NodeLayout::sample(),
        }
    }

    fn into_asset(self) -> PlatformAsset {
        PlatformAsset::BareMetal(self)
    }

    fn from_asset(asset: &PlatformAsset) -> Option<&Self> {
        match asset {
            PlatformAsset::BareMetal(cfg) => Some(cfg),
            _ => None,
        }
    }
}
