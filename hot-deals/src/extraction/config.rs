//! Configuration passed into the orchestrator at construction.

use super::prompt::DEFAULT_INSTRUCTIONS;

/// Display name given to uploaded documents unless configured otherwise.
pub const DEFAULT_DISPLAY_NAME: &str = "Uploaded PDF";

/// MIME type of hotel contracts.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Configuration for a single extraction session.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Model to request; `None` leaves the choice to the inference client.
    pub model: Option<String>,
    /// Instruction template used by `extract_default` (default: [`DEFAULT_INSTRUCTIONS`]).
    pub instructions: String,
    /// Display name for uploaded documents (default: `"Uploaded PDF"`).
    pub display_name: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            model: None,
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
        }
    }
}

impl ExtractionConfig {
    /// Set the model to request.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Replace the default instruction template.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Set the display name for uploaded documents.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert!(config.model.is_none());
        assert_eq!(config.display_name, "Uploaded PDF");
        assert_eq!(config.instructions, DEFAULT_INSTRUCTIONS);
    }

    #[test]
    fn test_builders() {
        let config = ExtractionConfig::default()
            .with_model("sonnet")
            .with_instructions("Extract deals.")
            .with_display_name("contract.pdf");
        assert_eq!(config.model.as_deref(), Some("sonnet"));
        assert_eq!(config.instructions, "Extract deals.");
        assert_eq!(config.display_name, "contract.pdf");
    }
}
