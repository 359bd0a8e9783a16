// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Submission artifact storage.
//!
//! The blob store is an external collaborator; uploads can fail without
//! the submission itself failing. A failed upload degrades to a
//! placeholder reference and a warning, so the status transition the
//! artifact supports is never blocked by storage trouble.

use std::collections::HashMap;

use tracing::warn;

use kazi_domain::TaskId;

/// Errors from the blob store collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The upload did not complete.
    UploadFailed(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UploadFailed(msg) => write!(f, "Upload failed: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// The blob store contract.
pub trait BlobStore {
    /// Stores bytes at a path and returns the public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    fn put(&mut self, path: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Returns the public URL for a stored path.
    fn public_url(&self, path: &str) -> String;
}

/// An in-memory blob store.
///
/// Backs tests and the default server configuration; a production
/// deployment substitutes a bucket-backed implementation of the same
/// trait.
pub struct InMemoryBlobStore {
    base_url: String,
    objects: HashMap<String, Vec<u8>>,
}

impl InMemoryBlobStore {
    /// Creates an empty store serving URLs under the given base.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            objects: HashMap::new(),
        }
    }

    /// Returns the number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new("blob://assignments")
    }
}

impl BlobStore for InMemoryBlobStore {
    fn put(&mut self, path: &str, bytes: &[u8]) -> Result<String, StorageError> {
        self.objects.insert(path.to_string(), bytes.to_vec());
        Ok(self.public_url(path))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

/// Builds the storage path for a submission artifact.
#[must_use]
pub fn submission_path(task_id: &TaskId, file_name: &str) -> String {
    let extension: &str = file_name.rsplit('.').next().unwrap_or("bin");
    format!("{task_id}_submission.{extension}")
}

/// The result of storing a submission artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    /// The reference to record on the task.
    pub url: String,
    /// Whether the upload failed and the URL is a placeholder.
    pub degraded: bool,
}

/// Stores a submission artifact, degrading to a placeholder on failure.
///
/// The placeholder keeps the submission flow moving; the warning makes
/// the degraded upload observable and distinguishable from a hard
/// failure.
pub fn store_submission_artifact(
    store: &mut dyn BlobStore,
    task_id: &TaskId,
    file_name: &str,
    bytes: &[u8],
) -> StoredArtifact {
    let path: String = submission_path(task_id, file_name);

    match store.put(&path, bytes) {
        Ok(url) => StoredArtifact {
            url,
            degraded: false,
        },
        Err(e) => {
            warn!(
                "Artifact upload for task {} failed ({}); recording placeholder reference",
                task_id, e
            );
            StoredArtifact {
                url: format!("pending-upload://{path}"),
                degraded: true,
            }
        }
    }
}
