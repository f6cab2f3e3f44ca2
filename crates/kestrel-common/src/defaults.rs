//! Default values for sample infrastructure configurations.
//!
//! These seed the templates printed by `kestrel asset template` and are never
//! applied silently to a user's configuration.

/// Default number of control plane nodes
pub const DEFAULT_MASTER_COUNT: u32 = 3;

/// Default number of worker nodes
pub const DEFAULT_WORKER_COUNT: u32 = 3;

/// Hostname prefix for control plane nodes
pub const MASTER_HOSTNAME_PREFIX: &str = "master";

/// Hostname prefix for worker nodes
pub const WORKER_HOSTNAME_PREFIX: &str = "node";

/// Control plane addresses of the sample layout
pub const SAMPLE_MASTER_IPS: &[&str] = &["10.1.10.51", "10.1.10.52", "10.1.10.53"];

/// Worker addresses of the sample layout
pub const SAMPLE_WORKER_IPS: &[&str] = &["10.1.10.61", "10.1.10.62", "10.1.10.63"];

/// Scheme prefixed to endpoints given as a bare host
pub const DEFAULT_ENDPOINT_SCHEME: &str = "http://";

// OpenStack
/// Keystone endpoint of the sample OpenStack config
pub const OPENSTACK_SAMPLE_AUTH_URL: &str = "http://10.1.10.51:5000";
/// Administrative user of the sample OpenStack config
pub const OPENSTACK_DEFAULT_USERNAME: &str = "admin";
/// Region of the sample OpenStack config
pub const OPENSTACK_DEFAULT_REGION: &str = "RegionOne";

// Bare metal
/// SSH user for bare metal hosts
pub const BAREMETAL_DEFAULT_SSH_USER: &str = "root";
/// SSH port for bare metal hosts
pub const BAREMETAL_DEFAULT_SSH_PORT: u16 = 22;

// Libvirt
/// Connection URI for a local system libvirt daemon
pub const LIBVIRT_DEFAULT_URI: &str = "qemu:///system";
/// Libvirt network nodes attach to
pub const LIBVIRT_DEFAULT_NETWORK: &str = "default";

/// Hostnames `<prefix>01..<prefix>NN` for `count` nodes
pub fn node_names(prefix: &str, count: u32) -> Vec<String> {
    (1..=count).map(|i| format!("{prefix}{i:02}")).collect()
}
