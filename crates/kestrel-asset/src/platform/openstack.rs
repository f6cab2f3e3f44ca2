//! OpenStack platform configuration
//!
//! Describes how to reach a Keystone endpoint and which existing networks,
//! flavor and image new nodes are built from.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use kestrel_common::defaults::{
    OPENSTACK_DEFAULT_REGION, OPENSTACK_DEFAULT_USERNAME, OPENSTACK_SAMPLE_AUTH_URL,
};
use kestrel_common::Result;

use super::{PlatformAsset, PlatformConfig};
use crate::nodes::NodeLayout;
use crate::validation::{normalize_endpoint, parse_http_endpoint, require, trim_optional};
use crate::PlatformKind;

/// Keystone credentials
///
/// The password never appears in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenStackCredentials {
    /// Keystone user name
    #[serde(default)]
    pub username: String,

    /// Keystone password
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for OpenStackCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenStackCredentials")
            .field("username", &self.username)
            .field("password", &super::REDACTED)
            .finish()
    }
}

/// OpenStack connection and placement target
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenStackConfig {
    // ==========================================================================
    // Identity
    // ==========================================================================
    /// Keystone endpoint (a bare host gets `http://` prefixed)
    #[serde(default)]
    pub auth_url: String,

    /// Keystone credentials
    #[serde(default)]
    pub credentials: OpenStackCredentials,

    /// Project (tenant) new resources are created in
    #[serde(default)]
    pub tenant_name: String,

    /// Region name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    // ==========================================================================
    // Networks
    // ==========================================================================
    /// Existing internal network nodes attach to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_network: Option<String>,

    /// Existing external network for floating IPs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_network: Option<String>,

    // ==========================================================================
    // Instances
    // ==========================================================================
    /// Existing flavor for all nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_name: Option<String>,

    /// Existing Glance image for all nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,

    /// Node counts, addresses and hostnames
    #[serde(default)]
    pub nodes: NodeLayout,
}

impl PlatformConfig for OpenStackConfig {
    const KIND: PlatformKind = PlatformKind::OpenStack;

    fn normalize(&mut self) {
        self.auth_url = normalize_endpoint(&self.auth_url);
        self.credentials.username = self.credentials.username.trim().to_string();
        self.tenant_name = self.tenant_name.trim().to_string();
        trim_optional(&mut self.region);
        trim_optional(&mut self.internal_network);
        trim_optional(&mut self.external_network);
        trim_optional(&mut self.flavor_name);
        trim_optional(&mut self.image_name);
        self.nodes.normalize();
    }

    fn validate(&self) -> Result<()> {
        require(Self::KIND, "authUrl", &self.auth_url)?;
        parse_http_endpoint(Self::KIND, "authUrl", &self.auth_url)?;
        require(
            Self::KIND,
            "credentials.username",
            &self.credentials.username,
        )?;
        require(
            Self::KIND,
            "credentials.password",
            &self.credentials.password,
        )?;
        require(Self::KIND, "tenantName", &self.tenant_name)?;
        self.nodes.validate(Self::KIND, false)
    }

    fn sample() -> Self {
        Self {
            auth_url: OPENSTACK_SAMPLE_AUTH_URL.to_string(),
            credentials: OpenStackCredentials {
                username: OPENSTACK_DEFAULT_USERNAME.to_string(),
                password: "changeme".to_string(),
            },
            tenant_name: "admin".to_string(),
            region: Some(OPENSTACK_DEFAULT_REGION.to_string()),
            internal_network: Some("existing-internal-net".to_string()),
            external_network: Some("existing-external-net".to_string()),
            flavor_name: Some("existing-flavor".to_string()),
            image_name: Some("existing-image".to_string()),
            nodes: NodeLayout::sample(),
        }
    }

    fn into_asset(self) -> PlatformAsset {
        PlatformAsset::OpenStack(self)
    }

    fn from_asset(asset: &PlatformAsset) -> Option<&Self> {
        match asset {
            PlatformAsset::OpenStack(cfg) => Some(cfg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> OpenStackConfig {
        OpenStackConfig {
            auth_url: "http://10.1.10.51:5000".to_string(),
            credentials: OpenStackCredentials {
                username: "admin".to_string(),
                password: "secret".to_string(),
            },
            tenant_name: "kestrel".to_string(),
            nodes: NodeLayout::sample(),
            ..Default::default()
        }
    }

    #[test]
    fn sample_is_valid() {
        let mut cfg = OpenStackConfig::sample();
        cfg.normalize();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn auth_url_is_required() {
        let mut cfg = valid_config();
        cfg.auth_url = "  ".to_string();
        cfg.normalize();
        let err = cfg.validate().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("authUrl"));
        assert_eq!(err.platform(), Some("openstack"));
    }

    #[test]
    fn bare_host_auth_url_gets_http_scheme() {
        let mut cfg = valid_config();
        cfg.auth_url = "10.1.10.51:5000".to_string();
        cfg.normalize();
        assert_eq!(cfg.auth_url, "http://10.1.10.51:5000");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn non_http_auth_url_is_rejected() {
        let mut cfg = valid_config();
        cfg.auth_url = "ftp://10.1.10.51".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn credentials_and_tenant_are_required() {
        let mut cfg = valid_config();
        cfg.credentials.password.clear();
        assert_eq!(
            cfg.validate().unwrap_err().field(),
            Some("credentials.password")
        );

        let mut cfg = valid_config();
        cfg.tenant_name.clear();
        assert_eq!(cfg.validate().unwrap_err().field(), Some("tenantName"));
    }

    #[test]
    fn blank_optional_fields_collapse_to_none() {
        let mut cfg = valid_config();
        cfg.region = Some("   ".to_string());
        cfg.flavor_name = Some(" m1.large ".to_string());
        cfg.normalize();
        assert!(cfg.region.is_none());
        assert_eq!(cfg.flavor_name.as_deref(), Some("m1.large"));
    }

    #[test]
    fn debug_redacts_password() {
        let cfg = valid_config();
        let debug = format!("{cfg:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn deserializes_camel_case_document() {
        let yaml = r#"
authUrl: 10.1.10.51:5000
credentials:
  username: admin
  password: secret
tenantName: kestrel
externalNetwork: ext-net
nodes:
  masterCount: 1
  workerCount: 0
  masterIps: ["10.1.10.51"]
"#;
        let cfg: OpenStackConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.external_network.as_deref(), Some("ext-net"));
        assert_eq!(cfg.nodes.master_ips, vec!["10.1.10.51"]);
    }
}
