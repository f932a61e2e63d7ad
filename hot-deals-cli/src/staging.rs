//! A document store backed by a private temporary directory.
//!
//! The Claude CLI reads documents from disk, so "uploading" means writing the
//! bytes under a fresh file name in a directory the CLI is granted access to.

use std::path::Path;

use hot_deals::error::UploadError;
use hot_deals::extraction::{DocumentHandle, DocumentStore};
use tempfile::TempDir;
use uuid::Uuid;

/// Staging directory for documents handed to the CLI; removed on drop.
#[derive(Debug)]
pub struct StagingStore {
    dir: TempDir,
}

impl StagingStore {
    /// Creates a fresh staging directory.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("hot-deals-").tempdir()?;
        Ok(Self { dir })
    }

    /// The staging directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "application/pdf" => "pdf",
        "text/plain" => "txt",
        _ => "bin",
    }
}

#[async_trait::async_trait]
impl DocumentStore for StagingStore {
    async fn upload(
        &self,
        bytes: &[u8],
        mime_type: &str,
        display_name: &str,
    ) -> Result<DocumentHandle, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError(format!("{display_name} is empty")));
        }
        let id = format!("{}.{}", Uuid::new_v4(), extension_for(mime_type));
        tokio::fs::write(self.path().join(&id), bytes)
            .await
            .map_err(|e| UploadError(format!("could not stage {display_name}: {e}")))?;
        tracing::debug!(%id, bytes = bytes.len(), "staged document");

        Ok(DocumentHandle {
            id,
            display_name: display_name.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    async fn delete(&self, handle: &DocumentHandle) -> Result<(), UploadError> {
        tokio::fs::remove_file(self.path().join(&handle.id))
            .await
            .map_err(|e| UploadError(format!("could not remove {}: {e}", handle.id)))
    }
}
