//! The outside services an extraction depends on.
//!
//! Both traits are object safe and `Send + Sync`, so a CLI, a server or a
//! test can plug in its own document store and model backend.

use std::fmt;

use crate::error::{InferenceError, UploadError};

/// An uploaded document, opaque to everything but the store that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    /// Store-specific identifier.
    pub id: String,
    /// Human-readable name given at upload.
    pub display_name: String,
    /// MIME type of the uploaded bytes.
    pub mime_type: String,
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.id)
    }
}

/// Holds uploaded documents for the inference collaborator to read.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores `bytes` and returns a handle the inference client understands.
    async fn upload(
        &self,
        bytes: &[u8],
        mime_type: &str,
        display_name: &str,
    ) -> Result<DocumentHandle, UploadError>;

    /// Removes a previously uploaded document.
    async fn delete(&self, handle: &DocumentHandle) -> Result<(), UploadError>;
}

/// A single inference call: one document, one instruction text.
#[derive(Debug, Clone, Copy)]
pub struct InferenceRequest<'a> {
    /// The document to read.
    pub document: &'a DocumentHandle,
    /// The instruction template, sent verbatim.
    pub instructions: &'a str,
    /// Model override; `None` uses the client's default.
    pub model: Option<&'a str>,
}

/// Sends a document and instructions to a model and returns its raw text.
#[async_trait::async_trait]
pub trait InferenceClient: Send + Sync {
    /// Runs one request to completion.
    async fn generate(&self, request: InferenceRequest<'_>) -> Result<String, InferenceError>;
}
