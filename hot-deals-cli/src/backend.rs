//! [`InferenceClient`] implementation that runs the Claude Code CLI.

use std::path::PathBuf;

use claudecode_adapter::{BuiltinToolSet, ClaudeCli, ClaudeError, Feature, OutputFormat, RunConfig, ToolPolicy};
use hot_deals::error::InferenceError;
use hot_deals::extraction::{InferenceClient, InferenceRequest};

use crate::config::{ClientConfig, API_KEY_ENV_VAR};

/// Reads staged documents with a read-only, isolated `claude --print` run.
#[derive(Debug, Clone)]
pub struct ClaudeInference {
    cli: ClaudeCli,
    staging: PathBuf,
    config: ClientConfig,
}

impl ClaudeInference {
    /// Creates a backend that reads documents from `staging`.
    #[must_use]
    pub const fn new(cli: ClaudeCli, staging: PathBuf, config: ClientConfig) -> Self {
        Self { cli, staging, config }
    }

    /// The CLI configuration for one request.
    ///
    /// Flags the installed CLI did not list in `--help` are left out, and
    /// without `--output-format` the reply is read as plain text.
    pub(crate) fn run_config(&self, model: Option<&str>) -> RunConfig {
        let capabilities = &self.cli.capabilities;
        let env = self
            .config
            .api_key
            .iter()
            .map(|key| (API_KEY_ENV_VAR.to_string(), key.clone()))
            .collect();

        let mut tools = ToolPolicy::read_only();
        if !capabilities.supports(Feature::ToolsFlag) {
            tools.builtin = BuiltinToolSet::Default;
        }
        tools.disable_slash_commands = capabilities.supports(Feature::DisableSlashCommands);

        let add_dirs = if capabilities.supports(Feature::AddDir) {
            vec![self.staging.clone()]
        } else {
            Vec::new()
        };

        RunConfig {
            model: model.map(str::to_string),
            output_format: if capabilities.supports(Feature::JsonOutput) {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            tools,
            add_dirs,
            cwd: Some(self.staging.clone()),
            env,
            timeout: self.config.timeout(),
            no_session_persistence: capabilities.supports(Feature::NoSessionPersistence),
            setting_sources: capabilities
                .supports(Feature::SettingSources)
                .then(String::new),
        }
    }
}

/// The instruction text followed by where to find the document.
pub(crate) fn build_prompt(request: &InferenceRequest<'_>) -> String {
    format!(
        "{}\n\nThe contract is the file `{}` in the current directory ({}). \
         Read it with the Read tool before answering.",
        request.instructions.trim_end(),
        request.document.id,
        request.document.display_name,
    )
}

#[async_trait::async_trait]
impl InferenceClient for ClaudeInference {
    async fn generate(&self, request: InferenceRequest<'_>) -> Result<String, InferenceError> {
        let config = self.run_config(request.model);
        let result = self
            .cli
            .run(&build_prompt(&request), &config)
            .await
            .map_err(|e| match e {
                ClaudeError::RateLimited(message) => InferenceError::RateLimit(message),
                other => InferenceError::Transport(other.to_string()),
            })?;
        tracing::info!(duration_ms = result.duration_ms, "claude replied");
        Ok(result.text().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claudecode_adapter::Capabilities;
    use hot_deals::extraction::DocumentHandle;

    const EVERY_FEATURE: [Feature; 6] = [
        Feature::JsonOutput,
        Feature::ToolsFlag,
        Feature::AddDir,
        Feature::NoSessionPersistence,
        Feature::SettingSources,
        Feature::DisableSlashCommands,
    ];

    fn capabilities(features: &[Feature]) -> Capabilities {
        Capabilities {
            features: features.iter().copied().collect(),
        }
    }

    fn backend(path: PathBuf, capabilities: Capabilities, staging: PathBuf, api_key: Option<&str>) -> ClaudeInference {
        let config = ClientConfig {
            api_key: api_key.map(str::to_string),
            ..ClientConfig::default()
        };
        ClaudeInference::new(ClaudeCli::new(path, capabilities), staging, config)
    }

    fn modern(api_key: Option<&str>) -> ClaudeInference {
        backend(
            PathBuf::from("/usr/bin/claude"),
            capabilities(&EVERY_FEATURE),
            PathBuf::from("/tmp/hot-deals-x"),
            api_key,
        )
    }

    fn contract() -> DocumentHandle {
        DocumentHandle {
            id: "1234.pdf".to_string(),
            display_name: "Uploaded PDF".to_string(),
            mime_type: "application/pdf".to_string(),
        }
    }

    #[test]
    fn test_run_config_is_read_only_and_isolated() {
        let config = modern(Some("sk-test")).run_config(Some("sonnet"));
        assert_eq!(config.model.as_deref(), Some("sonnet"));
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.cwd, Some(PathBuf::from("/tmp/hot-deals-x")));
        assert_eq!(config.add_dirs, vec![PathBuf::from("/tmp/hot-deals-x")]);
        assert_eq!(config.tools.builtin, BuiltinToolSet::Explicit(vec!["Read".to_string()]));
        assert_eq!(config.tools.allowed, Some(vec!["Read".to_string()]));
        assert!(config.tools.disable_slash_commands);
        assert!(config.no_session_persistence);
        assert_eq!(config.setting_sources.as_deref(), Some(""));
        assert_eq!(config.env, vec![(API_KEY_ENV_VAR.to_string(), "sk-test".to_string())]);
    }

    #[test]
    fn test_unsupported_flags_are_left_out() {
        let without_persistence: Vec<Feature> = EVERY_FEATURE
            .into_iter()
            .filter(|feature| *feature != Feature::NoSessionPersistence)
            .collect();
        let config = backend(
            PathBuf::from("/usr/bin/claude"),
            capabilities(&without_persistence),
            PathBuf::from("/tmp/hot-deals-x"),
            None,
        )
        .run_config(None);
        assert!(!config.no_session_persistence);
        assert_eq!(config.setting_sources.as_deref(), Some(""));

        let args = claudecode_adapter::cmd::build_args("p", &config);
        assert!(!args.iter().any(|arg| arg == "--no-session-persistence"));
    }

    #[test]
    fn test_bare_cli_gets_plain_text_run() {
        let config = backend(
            PathBuf::from("/usr/bin/claude"),
            Capabilities::default(),
            PathBuf::from("/tmp/hot-deals-x"),
            None,
        )
        .run_config(None);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert_eq!(config.tools.builtin, BuiltinToolSet::Default);
        assert!(config.add_dirs.is_empty());
        assert_eq!(config.cwd, Some(PathBuf::from("/tmp/hot-deals-x")));
        assert!(config.setting_sources.is_none());
        assert!(!config.tools.disable_slash_commands);
    }

    #[test]
    fn test_no_api_key_means_no_env() {
        assert!(modern(None).run_config(None).env.is_empty());
    }

    #[test]
    fn test_prompt_points_at_the_document() {
        let document = contract();
        let prompt = build_prompt(&InferenceRequest {
            document: &document,
            instructions: "Extract the deals.\n",
            model: None,
        });
        assert!(prompt.starts_with("Extract the deals.\n\nThe contract is the file `1234.pdf`"));
    }

    #[cfg(unix)]
    async fn generate_with(body: &str) -> Result<String, InferenceError> {
        let dir = tempfile::tempdir().unwrap();
        let path = crate::testing::fake_claude(&dir, body);
        let backend = backend(path, Capabilities::default(), dir.path().to_path_buf(), None);
        let document = contract();
        backend
            .generate(InferenceRequest {
                document: &document,
                instructions: "Extract the deals.",
                model: None,
            })
            .await
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_rate_limited_run_is_rate_limit() {
        let err = generate_with("echo 'API Error: 429 Too Many Requests' >&2; exit 1")
            .await
            .unwrap_err();
        match err {
            InferenceError::RateLimit(message) => assert!(message.contains("429"), "{message}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_run_is_transport() {
        let err = generate_with("echo 'authentication failed' >&2; exit 1")
            .await
            .unwrap_err();
        match err {
            InferenceError::Transport(message) => {
                assert!(message.contains("authentication failed"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_plain_text_reply_is_returned() {
        let reply = generate_with(r#"echo '{"hot_deals": []}'"#).await.unwrap();
        assert_eq!(reply.trim(), r#"{"hot_deals": []}"#);
    }
}
