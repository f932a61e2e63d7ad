//! The `extract` and `normalize` subcommands.

use std::path::{Path, PathBuf};

use hot_deals::extraction::{ExtractionConfig, ExtractionOrchestrator, PDF_MIME_TYPE};
use hot_deals::normalizer::{self, DealWarning, NormalizedResult};
use hot_deals::projection::EditableProjection;

use crate::backend::ClaudeInference;
use crate::config::ClientConfig;
use crate::edits::{self, FieldEdit};
use crate::errors::CliError;
use crate::staging::StagingStore;

/// Output path that writes the export to stdout.
pub const STDOUT: &str = "-";

/// Options for `hot-deals extract`.
#[derive(Debug)]
pub struct ExtractOptions {
    /// Contract to read.
    pub pdf: PathBuf,
    /// Where to write the export.
    pub output: PathBuf,
    /// Instruction file replacing the built-in prompt.
    pub instructions: Option<PathBuf>,
    /// Edits applied before export.
    pub edits: Vec<FieldEdit>,
    /// Backend configuration.
    pub client: ClientConfig,
}

/// Uploads a contract, extracts its deals and writes the export.
///
/// When the model reply cannot be parsed, it is saved next to the output as
/// `<output>.raw.txt` before the error is returned.
///
/// # Errors
///
/// Returns any configuration, I/O, extraction or edit failure.
pub async fn run_extract(options: ExtractOptions) -> Result<(), CliError> {
    let bytes = tokio::fs::read(&options.pdf)
        .await
        .map_err(CliError::file(&options.pdf))?;

    let report = claudecode_adapter::init(options.client.binary_path.clone()).await?;
    tracing::info!(version = %report.version, "using claude at {}", report.claude_path.display());
    let cli = claudecode_adapter::ClaudeCli::from_report(report);

    let store = StagingStore::new()?;
    let backend = ClaudeInference::new(cli, store.path().to_path_buf(), options.client.clone());

    let mut config = ExtractionConfig::default();
    if let Some(model) = &options.client.model {
        config = config.with_model(model.clone());
    }
    if let Some(path) = &options.instructions {
        let text = tokio::fs::read_to_string(path).await.map_err(CliError::file(path))?;
        config = config.with_instructions(text);
    }
    if let Some(name) = options.pdf.file_name() {
        config = config.with_display_name(name.to_string_lossy());
    }

    let orchestrator = ExtractionOrchestrator::new(store, backend).with_config(config);
    let result = match orchestrator.process(&bytes, PDF_MIME_TYPE).await {
        Ok(result) => result,
        Err(err) => {
            if let Some(raw) = err.raw_text() {
                save_raw_reply(&options.output, raw).await?;
            }
            return Err(err.into());
        }
    };

    finish(result, &options.edits, &options.output).await
}

/// Normalizes a saved model reply and writes the export.
///
/// # Errors
///
/// Returns any I/O, normalization or edit failure.
pub async fn run_normalize(raw_file: &Path, output: &Path, edits: &[FieldEdit]) -> Result<(), CliError> {
    let text = tokio::fs::read_to_string(raw_file)
        .await
        .map_err(CliError::file(raw_file))?;
    let result = normalizer::normalize(&text)?;
    finish(result, edits, output).await
}

/// Reports warnings, applies edits and writes the export.
async fn finish(result: NormalizedResult, edits: &[FieldEdit], output: &Path) -> Result<(), CliError> {
    report_warnings(&result.warnings);

    let mut projection = EditableProjection::from(result);
    edits::apply(&mut projection, edits)?;
    report_warnings(&projection.warnings());

    let json = projection.export_json()?;
    if output == Path::new(STDOUT) {
        println!("{json}");
    } else {
        tokio::fs::write(output, format!("{json}\n"))
            .await
            .map_err(CliError::file(output))?;
        tracing::info!(deals = projection.len(), "wrote {}", output.display());
    }
    Ok(())
}

fn report_warnings(warnings: &[DealWarning]) {
    for warning in warnings {
        tracing::warn!("{warning}");
    }
}

/// `<output>.raw.txt`, or `hot_deals.raw.txt` when writing to stdout.
#[must_use]
pub fn raw_reply_path(output: &Path) -> PathBuf {
    if output == Path::new(STDOUT) {
        return PathBuf::from("hot_deals.raw.txt");
    }
    let mut name = output.as_os_str().to_os_string();
    name.push(".raw.txt");
    PathBuf::from(name)
}

async fn save_raw_reply(output: &Path, raw: &str) -> Result<(), CliError> {
    let path = raw_reply_path(output);
    tokio::fs::write(&path, raw).await.map_err(CliError::file(&path))?;
    tracing::error!("model reply was not JSON; saved it to {}", path.display());
    Ok(())
}
