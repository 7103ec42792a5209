mod cli;
mod config;
mod db;
mod embedding;
mod guard;
mod knowledge;
mod state;
mod stats;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brain", version, about = "Personal assistant memory layer — loop prevention and semantic doc recall")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask the cooldown gate whether an action should execute now
    Check {
        /// Action description, e.g. "Fix VelocityPanel"
        action: String,
        /// Context for this attempt, e.g. "cookie issue"
        #[arg(default_value = "")]
        context: String,
        /// Override the configured cooldown window, in hours
        #[arg(long)]
        cooldown_hours: Option<f64>,
    },
    /// Search indexed documentation by semantic similarity
    Search {
        query: String,
        /// Number of results to return
        #[arg(short, long)]
        n: Option<usize>,
    },
    /// Index markdown documentation into the vector store
    Embed {
        /// Directory to scan (defaults to storage.docs_dir)
        dir: Option<PathBuf>,
    },
    /// Show table counters
    Stats,
    /// Run database diagnostics
    Doctor,
    /// Delete all stored data (asks for confirmation)
    Reset,
    /// Read or write persistent key/value state
    State {
        #[command(subcommand)]
        action: StateAction,
    },
    /// Manage agent sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Manage the embedding model
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
}

#[derive(Subcommand)]
enum StateAction {
    Get { key: String },
    Set { key: String, value: String },
}

#[derive(Subcommand)]
enum SessionAction {
    Start,
    End { id: String },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download the embedding model to ~/.brain/models/
    Download,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::BrainConfig::load()?;

    // Log to stderr so stdout stays clean for ALLOW/BLOCK lines and scripts.
    let filter = EnvFilter::try_new(&config.log.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    record_invocation(&config, &cli.command);

    match cli.command {
        Command::Check {
            action,
            context,
            cooldown_hours,
        } => {
            let code = cli::check::check(&config, &action, &context, cooldown_hours)?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Command::Search { query, n } => {
            cli::search::search(&config, &query, n).await?;
        }
        Command::Embed { dir } => {
            cli::embed::embed(&config, dir).await?;
        }
        Command::Stats => {
            cli::stats::stats(&config)?;
        }
        Command::Doctor => {
            cli::doctor::doctor(&config)?;
        }
        Command::Reset => {
            cli::reset::reset(&config)?;
        }
        Command::State { action } => match action {
            StateAction::Get { key } => cli::state::state_get(&config, &key)?,
            StateAction::Set { key, value } => cli::state::state_set(&config, &key, &value)?,
        },
        Command::Session { action } => match action {
            SessionAction::Start => cli::state::session_start(&config)?,
            SessionAction::End { id } => cli::state::session_end(&config, &id)?,
        },
        Command::Model { action } => match action {
            ModelAction::Download => {
                cli::model_download(&config.embedding).await?;
            }
        },
    }

    Ok(())
}

/// Append this invocation to the command log. Best-effort: a logging failure
/// is reported but never fails the command itself. Maintenance commands
/// (doctor, reset, model) are not logged — doctor must not create the
/// database as a side effect of inspecting it.
fn record_invocation(config: &config::BrainConfig, command: &Command) {
    let entry: Option<(&str, Vec<String>)> = match command {
        Command::Check { action, context, .. } => {
            Some(("check", vec![action.clone(), context.clone()]))
        }
        Command::Search { query, .. } => Some(("search", vec![query.clone()])),
        Command::Embed { dir } => Some((
            "embed",
            dir.iter().map(|d| d.to_string_lossy().into_owned()).collect(),
        )),
        Command::Stats => Some(("stats", vec![])),
        Command::State { action } => match action {
            StateAction::Get { key } => Some(("state get", vec![key.clone()])),
            StateAction::Set { key, .. } => Some(("state set", vec![key.clone()])),
        },
        Command::Session { action } => match action {
            SessionAction::Start => Some(("session start", vec![])),
            SessionAction::End { id } => Some(("session end", vec![id.clone()])),
        },
        Command::Doctor | Command::Reset | Command::Model { .. } => None,
    };

    if let Some((name, args)) = entry {
        let logged = db::open_database(config.resolved_db_path())
            .and_then(|conn| state::log_command(&conn, name, &args));
        if let Err(e) = logged {
            tracing::warn!(command = name, error = %e, "failed to record invocation");
        }
    }
}
