//! `kestrel asset` - template, initialize, inspect and delete platform assets.
//!
//! Each invocation is a fresh process, so commands that read state first
//! restore the persisted documents into the process-wide registry.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use tracing::info;

use kestrel_asset::{
    config_schema, Asset, AssetRegistry, AssetStore, FileStore, PlatformAsset, PlatformKind,
};

use crate::config::resolve_asset_dir;
use crate::{Error, Result};

/// Manage infrastructure platform assets
#[derive(Args, Debug)]
pub struct AssetArgs {
    /// Directory holding persisted assets (default: $KESTREL_ASSET_DIR or ~/.kestrel/assets)
    #[arg(long, global = true)]
    pub asset_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: AssetCommand,
}

#[derive(Subcommand, Debug)]
pub enum AssetCommand {
    /// Print a sample document for a platform
    Template {
        /// Platform (openstack, baremetal, libvirt)
        platform: PlatformKind,
    },

    /// Print the JSON schema of a platform config
    Schema {
        /// Platform (openstack, baremetal, libvirt)
        platform: PlatformKind,
    },

    /// Validate a document, activate it and persist it
    Init {
        /// Asset document (YAML)
        #[arg(short, long)]
        file: PathBuf,

        /// Activate without writing to the asset directory
        #[arg(long)]
        no_persist: bool,
    },

    /// Show persisted assets
    Show {
        /// Only this platform
        platform: Option<PlatformKind>,

        /// Include secrets in the output
        #[arg(long)]
        show_secrets: bool,
    },

    /// Delete a persisted asset
    Delete {
        /// Platform (openstack, baremetal, libvirt)
        platform: PlatformKind,
    },
}

pub async fn run(args: AssetArgs) -> Result<()> {
    let registry = AssetRegistry::global();

    match args.command {
        AssetCommand::Template { platform } => print!("{}", template(platform)?),
        AssetCommand::Schema { platform } => println!("{}", schema(platform)?),
        AssetCommand::Init { file, no_persist } => {
            let dir = resolve_asset_dir(args.asset_dir)?;
            let target = (!no_persist).then_some(dir.as_path());
            let kind = init(registry, &file, target).await?;
            match target {
                Some(dir) => println!("Initialized {kind} asset in {}", dir.display()),
                None => println!("Validated {kind} asset (not persisted)"),
            }
        }
        AssetCommand::Show {
            platform,
            show_secrets,
        } => {
            let dir = resolve_asset_dir(args.asset_dir)?;
            print!("{}", show(registry, &dir, platform, show_secrets).await?);
        }
        AssetCommand::Delete { platform } => {
            let dir = resolve_asset_dir(args.asset_dir)?;
            if delete(registry, &dir, platform).await? {
                println!("Deleted {platform} asset.");
            } else {
                println!("No {platform} asset configured.");
            }
        }
    }

    Ok(())
}

/// Sample document for `kind`
pub fn template(kind: PlatformKind) -> Result<String> {
    Ok(PlatformAsset::sample(kind).to_yaml()?)
}

/// Pretty JSON schema for the config of `kind`
pub fn schema(kind: PlatformKind) -> Result<String> {
    Ok(serde_json::to_string_pretty(&config_schema(kind))?)
}

/// Activate the document at `file`, persisting it under `dir` when given
pub async fn init(
    registry: &AssetRegistry,
    file: &Path,
    dir: Option<&Path>,
) -> Result<PlatformKind> {
    let bytes = tokio::fs::read(file).await.map_err(|e| Error::ConfigFile {
        path: file.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut handle = PlatformAsset::from_yaml(&bytes)?.into_handle();
    let kind = handle.kind();
    handle.initial(registry)?;

    if let Some(dir) = dir {
        let store = FileStore::for_kind(dir, kind);
        handle.persist(&store).await?;
        info!(platform = %kind, path = %store.path().display(), "asset initialized");
    }

    Ok(kind)
}

/// YAML for the persisted asset of `kind`, or every persisted asset
pub async fn show(
    registry: &AssetRegistry,
    dir: &Path,
    kind: Option<PlatformKind>,
    show_secrets: bool,
) -> Result<String> {
    let kinds: Vec<PlatformKind> = match kind {
        Some(kind) => {
            registry.restore_kind(dir, kind).await?;
            vec![kind]
        }
        None => {
            registry.restore(dir).await?;
            registry.active_kinds()
        }
    };

    let mut out = String::new();
    for kind in kinds {
        let Some(asset) = registry.get(kind) else {
            out.push_str(&format!("# no {kind} asset configured\n"));
            continue;
        };
        let asset = if show_secrets {
            (*asset).clone()
        } else {
            asset.redacted()
        };
        if !out.is_empty() {
            out.push_str("---\n");
        }
        out.push_str(&asset.to_yaml()?);
    }

    if out.is_empty() {
        out.push_str(&format!("# no assets in {}\n", dir.display()));
    }
    Ok(out)
}

/// Deactivate and remove the persisted asset of `kind`
///
/// Returns whether a document existed.
pub async fn delete(registry: &AssetRegistry, dir: &Path, kind: PlatformKind) -> Result<bool> {
    let store = FileStore::for_kind(dir, kind);
    if !store.exists().await? {
        return Ok(false);
    }

    // A document that no longer validates is still removable.
    match registry.restore_kind(dir, kind).await {
        Ok(Some(mut handle)) => handle.delete(registry)?,
        Ok(None) => {}
        Err(e) => info!(platform = %kind, error = %e, "removing unreadable asset document"),
    }

    store.remove().await?;
    info!(platform = %kind, path = %store.path().display(), "asset deleted");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPENSTACK_DOC: &str = r#"
platform: openstack
authUrl: 10.1.10.51:5000
credentials:
  username: admin
  password: hunter2
tenantName: kestrel
nodes:
  masterCount: 1
  workerCount: 1
"#;

    fn write_doc(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn template_and_schema_cover_every_platform() {
        for kind in PlatformKind::ALL {
            let yaml = template(*kind).unwrap();
            assert!(yaml.contains(&format!("platform: {kind}")));
            let decoded = PlatformAsset::from_yaml(yaml.as_bytes()).unwrap();
            assert_eq!(decoded.kind(), *kind);

            let json = schema(*kind).unwrap();
            assert!(json.contains("\"properties\""));
        }
    }

    /// Story: an operator initializes an asset, a later process shows it,
    /// and a third deletes it.
    #[tokio::test]
    async fn init_show_delete_across_processes() {
        let work = tempfile::tempdir().unwrap();
        let assets = work.path().join("assets");
        let file = write_doc(work.path(), "openstack.yaml", OPENSTACK_DOC);

        let first = AssetRegistry::new();
        let kind = init(&first, &file, Some(&assets)).await.unwrap();
        assert_eq!(kind, PlatformKind::OpenStack);
        assert!(assets.join("openstack.yaml").exists());
        let active = first.require(kind).unwrap();
        assert_eq!(
            active.config::<kestrel_asset::OpenStackConfig>().unwrap().auth_url,
            "http://10.1.10.51:5000"
        );

        let second = AssetRegistry::new();
        let shown = show(&second, &assets, Some(kind), false).await.unwrap();
        assert!(shown.contains("authUrl: http://10.1.10.51:5000"));
        assert!(!shown.contains("hunter2"));
        let shown = show(&second, &assets, None, true).await.unwrap();
        assert!(shown.contains("hunter2"));

        let third = AssetRegistry::new();
        assert!(delete(&third, &assets, kind).await.unwrap());
        assert!(third.get(kind).is_none());
        assert!(!assets.join("openstack.yaml").exists());
        assert!(!delete(&third, &assets, kind).await.unwrap());
    }

    #[tokio::test]
    async fn init_without_persist_writes_nothing() {
        let work = tempfile::tempdir().unwrap();
        let file = write_doc(work.path(), "doc.yaml", OPENSTACK_DOC);

        let registry = AssetRegistry::new();
        init(&registry, &file, None).await.unwrap();
        assert!(registry.get(PlatformKind::OpenStack).is_some());
        assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn invalid_document_is_rejected_with_usage_exit_code() {
        let work = tempfile::tempdir().unwrap();
        let assets = work.path().join("assets");
        let file = write_doc(
            work.path(),
            "bad.yaml",
            "platform: baremetal\nnodes:\n  masterCount: 1\n  workerCount: 0\n",
        );

        let registry = AssetRegistry::new();
        let err = init(&registry, &file, Some(&assets)).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(registry.active_kinds().is_empty());
        assert!(!assets.exists());
    }

    #[tokio::test]
    async fn unknown_platform_and_missing_file_are_usage_errors() {
        let work = tempfile::tempdir().unwrap();
        let file = write_doc(work.path(), "vsphere.yaml", "platform: vsphere\n");

        let registry = AssetRegistry::new();
        let err = init(&registry, &file, None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Asset(kestrel_common::Error::UnsupportedPlatform { .. })
        ));

        let err = init(&registry, &work.path().join("missing.yaml"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConfigFile { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn show_reports_empty_directory() {
        let work = tempfile::tempdir().unwrap();
        let registry = AssetRegistry::new();

        let all = show(&registry, work.path(), None, false).await.unwrap();
        assert!(all.starts_with("# no assets in"));

        let one = show(&registry, work.path(), Some(PlatformKind::Libvirt), false)
            .await
            .unwrap();
        assert_eq!(one, "# no libvirt asset configured\n");
    }

    #[tokio::test]
    async fn delete_removes_document_that_no_longer_validates() {
        let work = tempfile::tempdir().unwrap();
        write_doc(work.path(), "libvirt.yaml", "platform: libvirt\nuri: \"::\"\n");

        let registry = AssetRegistry::new();
        assert!(delete(&registry, work.path(), PlatformKind::Libvirt)
            .await
            .unwrap());
        assert!(!work.path().join("libvirt.yaml").exists());
    }
}
