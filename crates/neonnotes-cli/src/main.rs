//! NeonNotes CLI - sign in and manage your notes from the terminal

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::add::run_add;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::list::run_list;
use crate::commands::search::run_search;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("neonnotes=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let globals = cli.globals;

    match cli.command {
        Commands::Auth { command } => run_auth(command, &globals).await?,
        Commands::List { limit, json } => run_list(limit, json, &globals).await?,
        Commands::Search { query, limit, json } => {
            run_search(&query, limit, json, &globals).await?;
        }
        Commands::Add {
            title,
            content,
            image,
        } => run_add(&title, content.as_deref(), image.as_deref(), &globals).await?,
        Commands::Edit {
            id,
            title,
            content,
            image,
        } => {
            run_edit(
                &id,
                title.as_deref(),
                content.as_deref(),
                image.as_deref(),
                &globals,
            )
            .await?;
        }
        Commands::Delete { id, yes } => run_delete(&id, yes, &globals).await?,
        Commands::Config { command } => run_config(command, &globals)?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
