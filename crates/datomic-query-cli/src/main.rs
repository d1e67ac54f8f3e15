//! `dq`: validate, run and translate Datomic query documents, and browse
//! the schema catalog of a query API.

mod commands;
mod input;
mod shell;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use datomic_query::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dq", version)]
#[command(about = "Datomic query documents from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(long, global = true, env = "DQ_CONFIG", default_value = "dq.toml")]
    config: PathBuf,

    /// Override the API base URL; endpoints under the old base follow it
    #[arg(long, global = true, env = "DQ_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Check a query document without submitting it
    Validate {
        /// JSON document path, or `-` for stdin
        file: PathBuf,
    },

    /// Submit a query document and print the response
    Run {
        /// JSON document path, or `-` for stdin
        file: PathBuf,

        /// JSON array of input values appended to the document's args
        #[arg(long)]
        args: Option<String>,

        /// Submit even if the document fails validation
        #[arg(long)]
        skip_validation: bool,
    },

    /// Ask the server to translate a query document
    Translate {
        /// JSON document path, or `-` for stdin
        file: PathBuf,
    },

    /// List schema attributes grouped by namespace
    Schema(commands::SchemaArgs),

    /// Print the resolved settings as TOML
    Config,

    /// Read documents line by line and submit each
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = load_settings(&cli)?;
    tracing::debug!(api_url = %settings.api_url, "settings resolved");

    match cli.command {
        Command::Validate { file } => commands::validate_file(&file),
        Command::Run {
            file,
            args,
            skip_validation,
        } => commands::run(&settings, &file, args.as_deref(), skip_validation).await,
        Command::Translate { file } => commands::translate(&settings, &file).await,
        Command::Schema(args) => commands::schema(&settings, &args).await,
        Command::Config => {
            let mut shown = settings;
            for value in shown.auth_headers.values_mut() {
                *value = "<redacted>".to_string();
            }
            print!("{}", toml::to_string(&shown)?);
            Ok(())
        }
        Command::Shell => shell::run(&settings).await,
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let settings = Settings::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    let Some(api_url) = &cli.api_url else {
        return Ok(settings);
    };

    let settings = settings.with_api_url(api_url.as_str());
    settings.validate()?;

    Ok(settings)
}
