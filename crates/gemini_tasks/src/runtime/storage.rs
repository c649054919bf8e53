//! Filesystem and in-memory blob storage.

use async_trait::async_trait;
use gemini_tasks_error::{StorageError, StorageErrorKind};
use gemini_tasks_interface::Storage;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, instrument};
use url::Url;

const MEMORY_SCHEME: &str = "memory://";

/// Validates a blob name as a relative path made only of plain components.
///
/// Names such as `run-1/generated-image-0.png` are kept; absolute names and
/// names containing `.` or `..` segments are rejected.
fn relative_path(name: &str) -> Result<PathBuf, StorageError> {
    let invalid = || StorageError::new(StorageErrorKind::InvalidUri(name.to_string()));
    let mut path = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => path.push(part),
            _ => return Err(invalid()),
        }
    }
    if path.as_os_str().is_empty() {
        return Err(invalid());
    }
    Ok(path)
}

/// Stores blobs as files under a root directory, addressed by `file://` URIs.
///
/// A bare relative path passed to [`Storage::get`] is resolved under the root.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `root`; the directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_of(&self, uri: &str) -> Result<PathBuf, StorageError> {
        if uri.starts_with("file:") {
            let url = Url::parse(uri)
                .map_err(|_| StorageError::new(StorageErrorKind::InvalidUri(uri.to_string())))?;
            return url
                .to_file_path()
                .map_err(|_| StorageError::new(StorageErrorKind::InvalidUri(uri.to_string())));
        }
        if uri.contains("://") {
            return Err(StorageError::new(StorageErrorKind::InvalidUri(uri.to_string())));
        }
        Ok(self.root.join(relative_path(uri)?))
    }
}

#[async_trait]
impl Storage for FileStorage {
    #[instrument(skip(self))]
    async fn get(&self, uri: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_of(uri)?;
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                StorageError::new(StorageErrorKind::NotFound(uri.to_string()))
            }
            _ => StorageError::new(StorageErrorKind::Io(format!("{}: {}", path.display(), e))),
        })
    }

    #[instrument(skip(self, data), fields(bytes = data.len()))]
    async fn put(&self, name: &str, data: Vec<u8>) -> Result<String, StorageError> {
        let io_error = |e: std::io::Error| StorageError::new(StorageErrorKind::Io(e.to_string()));

        let path = self.root.join(relative_path(name)?);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(&path, &data).await.map_err(io_error)?;

        let absolute = tokio::fs::canonicalize(&path).await.map_err(io_error)?;
        let uri = Url::from_file_path(&absolute).map_err(|_| {
            StorageError::new(StorageErrorKind::InvalidUri(absolute.display().to_string()))
        })?;
        debug!(uri = %uri, "Stored blob");
        Ok(uri.to_string())
    }
}

/// Keeps blobs in memory, addressed by `memory://{name}` URIs.
///
/// Names may contain `/`-separated directories; an existing name is overwritten.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a blob synchronously and returns its URI.
    pub fn insert(&self, name: &str, data: impl Into<Vec<u8>>) -> Result<String, StorageError> {
        let path = relative_path(name)?;
        let segments: Vec<String> = path
            .components()
            .map(|part| part.as_os_str().to_string_lossy().into_owned())
            .collect();
        let uri = format!("{}{}", MEMORY_SCHEME, segments.join("/"));
        self.blobs
            .write()
            .map_err(|_| StorageError::new(StorageErrorKind::Other("storage lock poisoned".into())))?
            .insert(uri.clone(), data.into());
        Ok(uri)
    }

    /// URIs of every stored blob, sorted.
    pub fn uris(&self) -> Vec<String> {
        let mut uris: Vec<String> = self
            .blobs
            .read()
            .map(|blobs| blobs.keys().cloned().collect())
            .unwrap_or_default();
        uris.sort();
        uris
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, uri: &str) -> Result<Vec<u8>, StorageError> {
        if !uri.starts_with(MEMORY_SCHEME) {
            return Err(StorageError::new(StorageErrorKind::InvalidUri(uri.to_string())));
        }
        self.blobs
            .read()
            .map_err(|_| StorageError::new(StorageErrorKind::Other("storage lock poisoned".into())))?
            .get(uri)
            .cloned()
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(uri.to_string())))
    }

    async fn put(&self, name: &str, data: Vec<u8>) -> Result<String, StorageError> {
        self.insert(name, data)
    }
}
