//! Hot-deal extraction from hotel rate contracts.
//!
//! A contract is uploaded to a [`DocumentStore`](extraction::DocumentStore),
//! read once by an [`InferenceClient`](extraction::InferenceClient), and the
//! model's raw text is normalized into typed [`DealPackage`](model::DealPackage)s.
//! The packages can then be edited through an
//! [`EditableProjection`](projection::EditableProjection) and exported as
//! `{"hot_deals": [...]}`.
//!
//! ```
//! use hot_deals::prelude::*;
//! use serde_json::json;
//!
//! let result = normalize(r#"{"hot_deals": [{"name": "Spring Fling", "hotel": {"name": "Palm Cove"}}]}"#).unwrap();
//! let mut projection = EditableProjection::from(result);
//! projection.update_field(0, "minimum_nights", json!(3)).unwrap();
//! assert!(projection.export_json().unwrap().contains("\"minimum_nights\": 3"));
//! ```

pub mod error;
pub mod extraction;
pub mod model;
pub mod normalizer;
pub mod projection;

/// Common traits and types for ergonomic usage of the hot-deal pipeline.
pub mod prelude {
    pub use crate::error::{ExtractionError, FieldError, InferenceError, NormalizationError, UploadError};
    pub use crate::extraction::{
        DocumentHandle, DocumentStore, ExtractionConfig, ExtractionOrchestrator, InferenceClient,
        InferenceRequest, DEFAULT_INSTRUCTIONS,
    };
    pub use crate::model::{DealPackage, ItemList, Mode};
    pub use crate::normalizer::{normalize, DealWarning, Issue, NormalizedResult};
    pub use crate::projection::{EditableProjection, EXPORT_FILE_NAME, EXPORT_MIME_TYPE};
}
