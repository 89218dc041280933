use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use cantine::{
    load_config, render_day, run_menu_extraction, DocupipeClient, ExtractorConfig, RecordTable,
};

#[derive(Parser)]
#[command(name = "cantine")]
#[command(about = "Extract school cafeteria menus from weekly menu scans")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run OCR extraction over the image folder, unless records already exist
    Extract,
    /// Print the menu for one day
    Show {
        /// Day to show (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cantine").join("config.json"))
}

fn init_logging(json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    // Scanner and progress modules log through the `log` facade
    tracing_log::LogTracer::init()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs)?;

    let config_path = cli
        .config
        .or_else(default_config_path)
        .context("No configuration file given and no default config directory")?;
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    info!(config = %config_path.display(), "Configuration loaded");

    match cli.command {
        Commands::Extract => {
            let extractor_config = ExtractorConfig::from_config(&config);
            let message = match DocupipeClient::from_config(&config.ocr) {
                Ok(client) => run_menu_extraction(&extractor_config, client),
                Err(e) => {
                    warn!(error = %e, "OCR client unavailable");
                    format!("Menu extraction skipped, continuing without menu data: {}", e)
                }
            };
            println!("{}", message);
        }
        Commands::Show { date } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let table = RecordTable::new(&config.output_directory, &config.output_filename);
            let records = table
                .load()
                .with_context(|| format!("No menu records at {}", table.path().display()))?;
            println!("{}", render_day(&records, date));
        }
    }

    Ok(())
}
