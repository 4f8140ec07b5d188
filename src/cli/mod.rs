pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "hrt")]
#[command(about = "HR Tracker CLI - operational commands for the HR Tracker API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create the collection tables in the configured store")]
    Migrate,

    #[command(about = "Load fixture documents (JSON or YAML) into a collection")]
    Seed {
        #[arg(help = "Target collection (admins, employees, projects, tasks, timesheets)")]
        collection: String,
        #[arg(help = "Fixture file; .yaml/.yml is read as YAML, anything else as JSON")]
        file: std::path::PathBuf,
    },

    #[command(about = "List the collections the service owns")]
    Collections,

    #[command(about = "Check health of a running server via its /health endpoint")]
    Health {
        #[arg(long, help = "Server base URL (defaults to http://127.0.0.1:<API_PORT>)")]
        url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::Seed { collection, file } => commands::seed::handle(&collection, &file, output_format).await,
        Commands::Collections => commands::collections::handle(output_format),
        Commands::Health { url } => commands::health::handle(url, output_format).await,
    }
}
