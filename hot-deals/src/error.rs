//! Error types for the extraction pipeline, one per boundary.

use thiserror::Error;

/// A problem with a single field of a domain entity.
///
/// Every variant carries the dotted path of the offending field
/// (e.g. `hotel.rating` or `meal_plans[0].name`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// A required field is missing, or a value has the wrong shape.
    #[error("{path}: {reason}")]
    Validation {
        /// Path of the offending field.
        path: String,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// A numeric value lies outside its allowed range.
    #[error("{path}: {value} is out of range (expected {expected})")]
    Range {
        /// Path of the offending field.
        path: String,
        /// The rejected value.
        value: f64,
        /// Description of the allowed range, e.g. `>= 0`.
        expected: String,
    },

    /// A date field is not an ISO-8601 `YYYY-MM-DD` string.
    #[error("{path}: expected a YYYY-MM-DD date, got {value:?}")]
    DateFormat {
        /// Path of the offending field.
        path: String,
        /// The rejected raw value.
        value: String,
    },
}

impl FieldError {
    /// Builds a [`FieldError::Validation`].
    pub fn validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the path of the offending field.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Validation { path, .. } | Self::Range { path, .. } | Self::DateFormat { path, .. } => {
                path
            }
        }
    }
}

/// The document store could not accept the document.
#[derive(Debug, Error)]
#[error("document upload failed: {0}")]
pub struct UploadError(pub String);

/// The inference collaborator failed before producing any text.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Network, authentication or process-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The model provider refused the request for quota reasons.
    #[error("rate limited: {0}")]
    RateLimit(String),
}

/// The model response could not be parsed as JSON by either strategy.
#[derive(Debug, Clone, Error)]
#[error("could not parse model response as JSON: {message}")]
pub struct NormalizationError {
    /// The raw model response, verbatim.
    pub raw_text: String,
    /// Description of the parse failure.
    pub message: String,
}

/// Errors that stop a single extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Uploading the document failed.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// The inference call failed; propagated untouched.
    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// The inference call succeeded but its text was not JSON.
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
}

impl ExtractionError {
    /// Returns the raw model output when the failure happened after inference.
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Normalization(err) => Some(&err.raw_text),
            Self::Upload(_) | Self::Inference(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_path() {
        let err = FieldError::Range {
            path: "hotel.rating".to_string(),
            value: 7.0,
            expected: "0..=5".to_string(),
        };
        assert_eq!(err.path(), "hotel.rating");
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_extraction_error_raw_text() {
        let err = ExtractionError::from(NormalizationError {
            raw_text: "no json here".to_string(),
            message: "expected value".to_string(),
        });
        assert_eq!(err.raw_text(), Some("no json here"));

        let err = ExtractionError::from(InferenceError::RateLimit("429".to_string()));
        assert!(err.raw_text().is_none());
        assert_eq!(err.to_string(), "rate limited: 429");
    }
}
