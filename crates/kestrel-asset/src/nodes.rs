//! Control plane and worker node layout shared by every platform

use std::collections::HashSet;
use std::net::IpAddr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use kestrel_common::defaults::{
    node_names, DEFAULT_MASTER_COUNT, DEFAULT_WORKER_COUNT, MASTER_HOSTNAME_PREFIX,
    SAMPLE_MASTER_IPS, SAMPLE_WORKER_IPS, WORKER_HOSTNAME_PREFIX,
};
use kestrel_common::{Error, Result};

use crate::PlatformKind;

/// Node counts with optional per-node addresses and hostnames
///
/// Address and name lists are either empty (the platform assigns them) or
/// hold exactly one entry per node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeLayout {
    /// Number of control plane nodes
    #[serde(default)]
    pub master_count: u32,

    /// Number of worker nodes
    #[serde(default)]
    pub worker_count: u32,

    /// Control plane addresses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub master_ips: Vec<String>,

    /// Worker addresses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub worker_ips: Vec<String>,

    /// Control plane hostnames
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub master_names: Vec<String>,

    /// Worker hostnames
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub worker_names: Vec<String>,
}

impl NodeLayout {
    /// Three masters and three workers with fixed addresses and names
    pub fn sample() -> Self {
        Self {
            master_count: DEFAULT_MASTER_COUNT,
            worker_count: DEFAULT_WORKER_COUNT,
            master_ips: SAMPLE_MASTER_IPS.iter().map(|s| s.to_string()).collect(),
            worker_ips: SAMPLE_WORKER_IPS.iter().map(|s| s.to_string()).collect(),
            master_names: node_names(MASTER_HOSTNAME_PREFIX, DEFAULT_MASTER_COUNT),
            worker_names: node_names(WORKER_HOSTNAME_PREFIX, DEFAULT_WORKER_COUNT),
        }
    }

    /// Trim whitespace around addresses and hostnames
    pub fn normalize(&mut self) {
        for list in [
            &mut self.master_ips,
            &mut self.worker_ips,
            &mut self.master_names,
            &mut self.worker_names,
        ] {
            for entry in list.iter_mut() {
                *entry = entry.trim().to_string();
            }
        }
    }

    /// Check counts against lists, address syntax and uniqueness
    ///
    /// When `require_ips` is set, both address lists must be filled in.
    pub fn validate(&self, platform: PlatformKind, require_ips: bool) -> Result<()> {
        if self.master_count == 0 {
            return Err(Error::validation_for_field(
                platform.as_str(),
                "nodes.masterCount",
                "masterCount must be at least 1",
            ));
        }

        check_len(
            platform,
            "nodes.masterIps",
            self.master_ips.len(),
            self.master_count,
            require_ips,
        )?;
        check_len(
            platform,
            "nodes.workerIps",
            self.worker_ips.len(),
            self.worker_count,
            require_ips,
        )?;
        check_len(
            platform,
            "nodes.masterNames",
            self.master_names.len(),
            self.master_count,
            false,
        )?;
        check_len(
            platform,
            "nodes.workerNames",
            self.worker_names.len(),
            self.worker_count,
            false,
        )?;

        let mut seen_ips: HashSet<IpAddr> = HashSet::new();
        for (field, ips) in [
            ("nodes.masterIps", &self.master_ips),
            ("nodes.workerIps", &self.worker_ips),
        ] {
            for raw in ips {
                let ip: IpAddr = raw.parse().map_err(|_| {
                    Error::validation_for_field(
                        platform.as_str(),
                        field,
                        format!("invalid IP address: {raw:?}"),
                    )
                })?;
                if !seen_ips.insert(ip) {
                    return Err(Error::validation_for_field(
                        platform.as_str(),
                        field,
                        format!("duplicate IP address: {ip}"),
                    ));
                }
            }
        }

        let mut seen_names: HashSet<&str> = HashSet::new();
        for (field, names) in [
            ("nodes.masterNames", &self.master_names),
            ("nodes.workerNames", &self.worker_names),
        ] {
            for name in names {
                if name.is_empty() {
                    return Err(Error::validation_for_field(
                        platform.as_str(),
                        field,
                        "hostnames must not be empty",
                    ));
                }
                if !seen_names.insert(name.as_str()) {
                    return Err(Error::validation_for_field(
                        platform.as_str(),
                        field,
                        format!("duplicate hostname: {name}"),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn check_len(
    platform: PlatformKind,
    field: &str,
    len: usize,
    count: u32,
    required: bool,
) -> Result<()> {
    if len == 0 && !required {
        return Ok(());
    }
    if len != count as usize {
        return Err(Error::validation_for_field(
            platform.as_str(),
            field,
            format!("{field} has {len} entries but the node count is {count}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(master_ips: &[&str], master_count: u32) -> NodeLayout {
        NodeLayout {
            master_count,
            worker_count: 0,
            master_ips: master_ips.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn sample_layout_is_valid() {
        let nodes = NodeLayout::sample();
        assert_eq!(nodes.master_names, vec!["master01", "master02", "master03"]);
        assert!(nodes.validate(PlatformKind::OpenStack, true).is_ok());
    }

    #[test]
    fn mismatched_ip_count_is_rejected() {
        let nodes = layout(&["10.1.10.51", "10.1.10.52", "10.1.10.53"], 2);
        let err = nodes.validate(PlatformKind::OpenStack, false).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("nodes.masterIps"));
        assert!(err.to_string().contains("3 entries"));
    }

    #[test]
    fn empty_ip_lists_are_allowed_unless_required() {
        let nodes = layout(&[], 3);
        assert!(nodes.validate(PlatformKind::OpenStack, false).is_ok());

        let err = nodes.validate(PlatformKind::BareMetal, true).unwrap_err();
        assert_eq!(err.field(), Some("nodes.masterIps"));
    }

    #[test]
    fn huge_counts_without_lists_validate() {
        let mut nodes = layout(&[], u32::MAX);
        nodes.worker_count = u32::MAX;
        assert!(nodes.validate(PlatformKind::OpenStack, false).is_ok());
    }

    #[test]
    fn zero_masters_is_rejected() {
        let err = layout(&[], 0)
            .validate(PlatformKind::Libvirt, false)
            .unwrap_err();
        assert_eq!(err.field(), Some("nodes.masterCount"));
    }

    #[test]
    fn malformed_and_duplicate_ips_are_rejected() {
        let err = layout(&["10.1.10.51", "*.*.*.*"], 2)
            .validate(PlatformKind::OpenStack, false)
            .unwrap_err();
        assert!(err.to_string().contains("invalid IP address"));

        let mut nodes = layout(&["10.1.10.51"], 1);
        nodes.worker_count = 1;
        nodes.worker_ips = vec!["10.1.10.51".to_string()];
        let err = nodes.validate(PlatformKind::OpenStack, false).unwrap_err();
        assert_eq!(err.field(), Some("nodes.workerIps"));
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn ipv6_addresses_are_accepted() {
        let nodes = layout(&["fd00::1"], 1);
        assert!(nodes.validate(PlatformKind::BareMetal, false).is_ok());
    }

    #[test]
    fn duplicate_hostnames_are_rejected() {
        let mut nodes = NodeLayout::sample();
        nodes.worker_names[0] = "master01".to_string();
        let err = nodes.validate(PlatformKind::OpenStack, false).unwrap_err();
        assert!(err.to_string().contains("duplicate hostname"));
    }

    #[test]
    fn normalize_trims_entries() {
        let mut nodes = layout(&[" 10.1.10.51 "], 1);
        nodes.master_names = vec![" master01".to_string()];
        nodes.normalize();
        assert_eq!(nodes.master_ips, vec!["10.1.10.51"]);
        assert_eq!(nodes.master_names, vec!["master01"]);
        assert!(nodes.validate(PlatformKind::OpenStack, true).is_ok());
    }
}
