pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "iot-energy")]
#[command(about = "IoT Energy CLI - database maintenance and API tooling")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply SQL migrations in file-name order")]
    Migrate {
        #[arg(long, default_value = "migrations", help = "Directory holding the .sql files")]
        dir: String,
    },

    #[command(about = "Seed accounts and reference data")]
    Seed {
        #[command(subcommand)]
        cmd: commands::seed::SeedCommands,
    },

    #[command(about = "Generate random secrets for JWT_SECRET and NEXTAUTH_SECRET")]
    Secrets,

    #[command(about = "Database connectivity and schema inspection")]
    Db {
        #[command(subcommand)]
        cmd: commands::db::DbCommands,
    },

    #[command(about = "Inspect user accounts")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UsersCommands,
    },

    #[command(about = "Call a running server")]
    Remote {
        #[arg(long, env = "IOT_ENERGY_API_URL", help = "Server base URL (defaults to NEXT_PUBLIC_API_URL)")]
        url: Option<String>,

        #[command(subcommand)]
        cmd: commands::remote::RemoteCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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
        Commands::Migrate { dir } => commands::migrate::handle(&dir, output_format).await,
        Commands::Seed { cmd } => commands::seed::handle(cmd, output_format).await,
        Commands::Secrets => commands::secrets::handle(output_format),
        Commands::Db { cmd } => commands::db::handle(cmd, output_format).await,
        Commands::Users { cmd } => commands::users::handle(cmd, output_format).await,
        Commands::Remote { url, cmd } => commands::remote::handle(url, cmd, output_format).await,
    }
}
