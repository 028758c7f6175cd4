use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use curator_core::config::{ensure_dirs, load_config, Config};
use curator_core::db::{migrations, open_database_with, open_existing, schema_status};

#[derive(Parser)]
#[command(name = "curator", about = "Curation bot state store")]
struct Cli {
    /// Database file (defaults to the configured path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database if needed and bring its schema up to date
    Migrate {
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the schema version and tables without creating or migrating
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config()?;
    if let Some(path) = cli.db {
        config.database.path = path;
    }

    match cli.command {
        Commands::Migrate { json } => migrate(&config, json),
        Commands::Status { json } => status(&config, json),
    }
}

fn migrate(config: &Config, json: bool) -> Result<()> {
    ensure_dirs(config)?;
    let (_conn, outcome) = open_database_with(&config.database)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if outcome.is_noop() {
        println!("Schema up to date at version {}", outcome.final_version);
    } else {
        for name in &outcome.applied {
            println!("  applied {name}");
        }
        println!(
            "Migrated schema from version {} to {}",
            outcome.starting_version, outcome.final_version
        );
    }
    Ok(())
}

fn status(config: &Config, json: bool) -> Result<()> {
    let path = &config.database.path;
    let latest = migrations::latest_version();

    if !path.exists() {
        if json {
            let body = serde_json::json!({
                "path": path,
                "exists": false,
                "version": null,
                "latest_version": latest,
                "pending": latest,
                "tables": [],
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        } else {
            println!("No database at {}", path.display());
            println!("Run `curator migrate` to create it.");
        }
        return Ok(());
    }

    let mut conn = open_existing(&config.database)?;
    let (version, tables) = schema_status(&mut conn)?;

    if json {
        let body = serde_json::json!({
            "path": path,
            "exists": true,
            "version": version,
            "latest_version": latest,
            "pending": latest.saturating_sub(version),
            "tables": tables,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("Database: {}", path.display());
    println!("Schema version: {version} (latest {latest})");
    if version < latest {
        println!("{} migration(s) pending", latest - version);
    } else if version > latest {
        println!("Database is newer than this build");
    }
    if tables.is_empty() {
        println!("No tables. Run `curator migrate` to create them.");
    } else {
        println!("Tables: {}", tables.join(", "));
    }
    Ok(())
}
