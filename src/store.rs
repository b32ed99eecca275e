//! Blob store collaborators that hold the per-location CSV payloads.
//!
//! Objects live under `simulations/<location>/<filename>`.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, SimError};

/// Top-level prefix of simulation objects.
pub const SIMULATIONS_PREFIX: &str = "simulations";

/// Read access to byte payloads by path.
pub trait BlobStore: Send + Sync + 'static {
    /// Fetches the object at `path`.
    ///
    /// Returns `Ok(None)` when the object does not exist.
    fn fetch(&self, path: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;
}

/// Builds the object path `simulations/<location>/<filename>`.
///
/// # Errors
///
/// Returns `SimError::InvalidRequest` if either part is empty or is not a
/// single path segment.
pub fn object_path(location: &str, filename: &str) -> Result<String> {
    check_segment("location", location)?;
    check_segment("filename", filename)?;
    Ok(format!("{SIMULATIONS_PREFIX}/{location}/{filename}"))
}

fn check_segment(name: &str, value: &str) -> Result<()> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if invalid {
        return Err(SimError::InvalidRequest(format!(
            "{name} \"{value}\" is not a valid path segment"
        )));
    }
    Ok(())
}

/// Blob store backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Creates a store rooted at `root` (the bucket directory).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl BlobStore for FsStore {
    async fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let full = self.root.join(path);
        match tokio::fs::read(&full).await {
            Ok(bytes) => {
                debug!(path, bytes = bytes.len(), "fetched object");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SimError::Storage {
                path: path.to_string(),
                source: e,
            }),
        }
    }
}

/// In-memory blob store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bytes` at an arbitrary path.
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.objects.insert(path.into(), bytes.into());
    }

    /// Stores `bytes` under `simulations/<location>/<filename>`.
    ///
    /// # Panics
    ///
    /// Panics if `location` or `filename` is not a valid path segment.
    pub fn with_object(
        mut self,
        location: &str,
        filename: &str,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let path = object_path(location, filename)
            .unwrap_or_else(|e| panic!("invalid object path: {e}"));
        self.insert(path, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl BlobStore for MemoryStore {
    async fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.objects.get(path).cloned())
    }
}
