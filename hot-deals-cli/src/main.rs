//! The `hot-deals` binary: extract hot deals from a hotel contract PDF.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hot_deals::extraction::DEFAULT_INSTRUCTIONS;
use hot_deals::projection::EXPORT_FILE_NAME;
use hot_deals_cli::commands::{run_extract, run_normalize, ExtractOptions};
use hot_deals_cli::config::ClientConfig;
use hot_deals_cli::edits::FieldEdit;
use hot_deals_cli::errors::CliError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract hot deals from a contract PDF
    Extract {
        /// The contract to read
        pdf: PathBuf,
        /// Export file, or `-` for stdout
        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
        /// Model to request (default: `HOT_DEALS_MODEL`, else the CLI default)
        #[arg(short, long)]
        model: Option<String>,
        /// File with instructions replacing the built-in prompt
        #[arg(long)]
        instructions: Option<PathBuf>,
        /// Edit a field before export, e.g. `0.hotel.rating=4.5` (repeatable)
        #[arg(long = "set", value_name = "DEAL.PATH=VALUE")]
        edits: Vec<FieldEdit>,
        /// Path to the `claude` executable
        #[arg(long)]
        claude_bin: Option<PathBuf>,
        /// Give up after this many seconds (default: 300)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Normalize a saved model reply into the export format
    Normalize {
        /// File holding the raw model reply
        raw_file: PathBuf,
        /// Export file, or `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
        /// Edit a field before export, e.g. `0.name="Summer Sale"` (repeatable)
        #[arg(long = "set", value_name = "DEAL.PATH=VALUE")]
        edits: Vec<FieldEdit>,
    },
    /// Print the built-in extraction prompt
    Prompt,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _env = dotenvy::dotenv();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Extract {
            pdf,
            output,
            model,
            instructions,
            edits,
            claude_bin,
            timeout_secs,
        } => {
            let client = ClientConfig::from_env()?
                .with_binary_path(claude_bin)
                .with_model(model)
                .with_timeout_secs(timeout_secs);
            run_extract(ExtractOptions {
                pdf,
                output,
                instructions,
                edits,
                client,
            })
            .await?;
        }
        Commands::Normalize {
            raw_file,
            output,
            edits,
        } => {
            run_normalize(&raw_file, &output, &edits).await?;
        }
        Commands::Prompt => print!("{DEFAULT_INSTRUCTIONS}"),
    }

    Ok(())
}
