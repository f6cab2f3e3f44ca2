//! Durable storage for asset documents
//!
//! [`AssetStore`] is the narrow contract persistence needs: write a whole
//! document, read it back, remove it. [`FileStore`] keeps one YAML file per
//! platform kind; [`MemoryStore`] keeps bytes in process.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};

use kestrel_common::error::UNKNOWN_CONTEXT;
use kestrel_common::{Error, Result, ASSET_FILE_EXTENSION};

use crate::PlatformKind;

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// A single durable slot holding one encoded asset document
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Replace the stored document with `bytes`
    async fn write(&self, bytes: &[u8]) -> Result<()>;

    /// Read the stored document
    ///
    /// Fails with [`Error::NotFound`] when nothing has been written.
    async fn read(&self) -> Result<Vec<u8>>;

    /// Remove the stored document; removing an absent one succeeds
    async fn remove(&self) -> Result<()>;

    /// Human-readable location for logs and errors
    fn location(&self) -> String;
}

/// Asset document stored as a file
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash mid-write never leaves a truncated document behind. Each write gets
/// its own temp file; concurrent writers race only on the final rename and
/// the last one wins.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    kind: Option<PlatformKind>,
}

impl FileStore {
    /// Store at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: None,
        }
    }

    /// Conventional store for `kind` under `dir`: `<dir>/<kind>.yaml`
    pub fn for_kind(dir: &Path, kind: PlatformKind) -> Self {
        Self {
            path: dir.join(format!("{kind}.{ASSET_FILE_EXTENSION}")),
            kind: Some(kind),
        }
    }

    /// Path of the document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a document is present
    ///
    /// Fails with [`Error::Io`] when the path cannot be inspected.
    pub async fn exists(&self) -> Result<bool> {
        tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| self.io_err("inspect", e))
    }

    fn label(&self) -> &str {
        self.kind.map_or(UNKNOWN_CONTEXT, |k| k.as_str())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        name.push(format!(".{}.{seq}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }

    fn io_err(&self, action: &str, e: std::io::Error) -> Error {
        Error::io(self.location(), format!("failed to {action}: {e}"))
    }
}

#[async_trait]
impl AssetStore for FileStore {
    async fn write(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_err("create directory", e))?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| self.io_err("write", e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                warn!(path = %tmp.display(), error = %cleanup, "failed to remove temp file");
            }
            return Err(self.io_err("replace", e));
        }

        debug!(path = %self.path.display(), bytes = bytes.len(), "wrote asset document");
        Ok(())
    }

    async fn read(&self) -> Result<Vec<u8>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::not_found(
                self.label(),
                format!("no asset persisted at {}", self.path.display()),
            )),
            Err(e) => Err(self.io_err("read", e)),
        }
    }

    async fn remove(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed asset document");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err("remove", e)),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-process store, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    name: String,
    data: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    /// Empty store identified by `name` in logs
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Mutex::new(None),
        }
    }

    /// Copy of the stored bytes
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.data.lock().clone()
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    async fn write(&self, bytes: &[u8]) -> Result<()> {
        *self.data.lock() = Some(bytes.to_vec());
        Ok(())
    }

    async fn read(&self) -> Result<Vec<u8>> {
        self.data.lock().clone().ok_or_else(|| {
            Error::not_found(
                UNKNOWN_CONTEXT,
                format!("nothing written to {}", self.location()),
            )
        })
    }

    async fn remove(&self) -> Result<()> {
        self.data.lock().take();
        Ok(())
    }

    fn location(&self) -> String {
        format!("memory:{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn for_kind_uses_conventional_file_name() {
        let store = FileStore::for_kind(Path::new("/var/lib/kestrel"), PlatformKind::OpenStack);
        assert_eq!(store.path(), Path::new("/var/lib/kestrel/openstack.yaml"));
        assert_eq!(store.location(), "/var/lib/kestrel/openstack.yaml");

        let first = store.temp_path();
        let second = store.temp_path();
        assert_ne!(first, second);
        assert_eq!(first.parent(), Some(Path::new("/var/lib/kestrel")));
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("openstack.yaml."));
        assert!(name.ends_with(".tmp"));
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn file_store_write_read_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::for_kind(&dir.path().join("nested"), PlatformKind::Libvirt);
        assert!(!store.exists().await.unwrap());

        store.write(b"platform: libvirt\n").await.unwrap();
        assert!(store.exists().await.unwrap());
        assert_eq!(store.read().await.unwrap(), b"platform: libvirt\n");
        assert_eq!(file_names(&dir.path().join("nested")), vec!["libvirt.yaml"]);

        store.write(b"platform: libvirt\nuri: qemu:///session\n").await.unwrap();
        assert_eq!(
            store.read().await.unwrap(),
            b"platform: libvirt\nuri: qemu:///session\n"
        );

        store.remove().await.unwrap();
        store.remove().await.unwrap();
        assert!(!store.exists().await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_to_one_document_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::for_kind(dir.path(), PlatformKind::OpenStack));

        for round in 0..20 {
            let writers: Vec<_> = (0..8)
                .map(|writer| {
                    let store = Arc::clone(&store);
                    tokio::spawn(async move {
                        let doc =
                            format!("platform: openstack\nround: {round}\nwriter: {writer}\n");
                        store.write(doc.as_bytes()).await
                    })
                })
                .collect();
            for writer in writers {
                writer.await.unwrap().unwrap();
            }

            let doc = String::from_utf8(store.read().await.unwrap()).unwrap();
            let lines: Vec<&str> = doc.lines().collect();
            assert_eq!(lines.len(), 3, "torn document: {doc:?}");
            assert_eq!(lines[1], format!("round: {round}"));
        }

        assert_eq!(file_names(dir.path()), vec!["openstack.yaml"]);
    }

    #[tokio::test]
    async fn failed_replace_cleans_up_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("openstack.yaml")).unwrap();
        std::fs::write(dir.path().join("openstack.yaml").join("keep"), b"x").unwrap();

        let store = FileStore::for_kind(dir.path(), PlatformKind::OpenStack);
        let err = store.write(b"platform: openstack\n").await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("failed to replace"));
        assert_eq!(file_names(dir.path()), vec!["openstack.yaml"]);
    }

    #[tokio::test]
    async fn exists_reports_uninspectable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let store = FileStore::for_kind(&blocker, PlatformKind::BareMetal);
        let err = store.exists().await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn file_store_missing_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::for_kind(dir.path(), PlatformKind::BareMetal);
        let err = store.read().await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.platform(), Some("baremetal"));
    }

    #[tokio::test]
    async fn file_store_write_into_file_parent_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let store = FileStore::new(blocker.join("openstack.yaml"));
        let err = store.write(b"x").await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryStore::new("unit");
        assert!(store.read().await.unwrap_err().is_not_found());

        store.write(b"abc").await.unwrap();
        assert_eq!(store.read().await.unwrap(), b"abc");
        assert_eq!(store.location(), "memory:unit");

        store.remove().await.unwrap();
        assert!(store.contents().is_none());
    }
}
