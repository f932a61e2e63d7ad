//! Single-shot extraction: upload, one inference call, normalize.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::collaborators::{DocumentHandle, DocumentStore, InferenceClient, InferenceRequest};
use super::config::ExtractionConfig;
use crate::error::{ExtractionError, UploadError};
use crate::normalizer::{self, NormalizedResult};

/// Runs extractions against a document store and an inference client.
///
/// Holds no state between calls; every method issues at most one inference
/// request and never retries.
pub struct ExtractionOrchestrator<S, C> {
    store: S,
    client: C,
    config: ExtractionConfig,
}

impl<S, C> ExtractionOrchestrator<S, C>
where
    S: DocumentStore,
    C: InferenceClient,
{
    /// Creates an orchestrator with the default configuration.
    #[must_use]
    pub fn new(store: S, client: C) -> Self {
        Self {
            store,
            client,
            config: ExtractionConfig::default(),
        }
    }

    /// Replaces the configuration (fluent builder pattern).
    #[must_use]
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// The document store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The inference client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Extracts deals from an uploaded document with the given instructions.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Inference` unchanged if the client fails, and
    /// `ExtractionError::Normalization` with the raw text if the response is not JSON.
    pub async fn extract(
        &self,
        document: &DocumentHandle,
        instructions: &str,
    ) -> Result<NormalizedResult, ExtractionError> {
        self.run(document, instructions, self.config.model.as_deref()).await
    }

    /// Extracts with the configured instruction template.
    ///
    /// # Errors
    ///
    /// See [`Self::extract`].
    pub async fn extract_default(
        &self,
        document: &DocumentHandle,
    ) -> Result<NormalizedResult, ExtractionError> {
        self.extract(document, &self.config.instructions).await
    }

    /// Extracts with a per-call model override.
    ///
    /// # Errors
    ///
    /// See [`Self::extract`].
    pub async fn extract_with_model(
        &self,
        document: &DocumentHandle,
        instructions: &str,
        model: &str,
    ) -> Result<NormalizedResult, ExtractionError> {
        self.run(document, instructions, Some(model)).await
    }

    /// Uploads a document under the configured display name.
    ///
    /// # Errors
    ///
    /// Returns the store's `UploadError`.
    pub async fn upload(&self, bytes: &[u8], mime_type: &str) -> Result<DocumentHandle, UploadError> {
        let handle = self
            .store
            .upload(bytes, mime_type, &self.config.display_name)
            .await?;
        debug!(document = %handle, bytes = bytes.len(), "uploaded document");
        Ok(handle)
    }

    /// Uploads, extracts with the default instructions, then deletes the upload.
    ///
    /// Deletion is best effort: a failure is logged and the extraction
    /// result is returned regardless.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Upload` if the upload fails, otherwise see [`Self::extract`].
    pub async fn process(
        &self,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<NormalizedResult, ExtractionError> {
        let handle = self.upload(bytes, mime_type).await?;
        let result = self.extract_default(&handle).await;
        if let Err(e) = self.store.delete(&handle).await {
            warn!(document = %handle, "failed to delete uploaded document: {e}");
        }
        result
    }

    async fn run(
        &self,
        document: &DocumentHandle,
        instructions: &str,
        model: Option<&str>,
    ) -> Result<NormalizedResult, ExtractionError> {
        let start = Instant::now();
        let request = InferenceRequest {
            document,
            instructions,
            model,
        };
        info!(document = %document, model = model.unwrap_or("default"), "requesting extraction");

        let text = self.client.generate(request).await?;
        debug!(
            chars = text.chars().count(),
            elapsed_ms = start.elapsed().as_millis(),
            "inference finished"
        );

        Ok(normalizer::normalize(&text)?)
    }
}
