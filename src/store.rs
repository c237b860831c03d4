//! Flat-file review storage.
//!
//! The whole collection lives in one pretty-printed JSON array, newest
//! review first. Every read decodes the full document and every write
//! replaces it.
//!
//! Writes go to a sibling temp file which is then renamed over the document,
//! so readers never observe a half-written array. [`ReviewStore::prepend`]
//! runs its load-modify-save cycle under a mutex, so two submissions handled
//! by the same process cannot overwrite each other. Separate processes
//! sharing one document are not coordinated.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::review::Review;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid review document: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode reviews: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Handle to the review document at a fixed path.
pub struct ReviewStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ReviewStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole collection. A missing document is an empty collection.
    pub async fn load(&self) -> Result<Vec<Review>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no review document yet");
                return Ok(Vec::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_slice(&bytes)
            .map_err(|source| StoreError::Decode { path: self.path.clone(), source })
    }

    /// Replaces the document with `reviews`.
    pub async fn save(&self, reviews: &[Review]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(reviews).map_err(StoreError::Encode)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        atomic_write(&self.path, &json)
            .await
            .map_err(|source| self.io_error(source))
    }

    /// Puts `review` at the front of the collection and persists it.
    ///
    /// Returns the number of reviews after insertion.
    pub async fn prepend(&self, review: Review) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut reviews = self.load().await?;
        reviews.insert(0, review);
        self.save(&reviews).await?;

        info!(path = %self.path.display(), total = reviews.len(), "review saved");
        Ok(reviews.len())
    }

    /// Readiness check: the document is absent or decodes as a review array,
    /// i.e. the next [`load`](ReviewStore::load) would succeed.
    pub async fn check_readable(&self) -> Result<(), StoreError> {
        self.load().await.map(|_| ())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }
}

/// Writes `contents` to a PID-suffixed temp file, then renames it over `path`.
async fn atomic_write(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let tmp_path = path.with_extension(format!("tmp.{}", std::process::id()));
    tokio::fs::write(&tmp_path, contents).await?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e);
    }
    Ok(())
}
