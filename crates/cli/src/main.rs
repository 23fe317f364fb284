use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use liftlog_client::{ClientConfig, SupabaseClient};
use liftlog_service::TrackerSettings;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Log workouts in plain language and follow their processing", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: Connection,
    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the `LIFTLOG_*` environment variables.
#[derive(Args)]
struct Connection {
    /// Supabase project URL
    #[arg(long, global = true)]
    url: Option<String>,
    /// Supabase anon key
    #[arg(long, global = true)]
    anon_key: Option<String>,
    /// Access token of the signed-in user
    #[arg(long, global = true)]
    access_token: Option<String>,
    /// Delay between polls, in milliseconds
    #[arg(long, global = true)]
    interval: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit workout messages for processing
    Log {
        #[arg(required = true)]
        messages: Vec<String>,
        /// Keep polling and print the pending jobs as they change
        #[arg(short, long)]
        watch: bool,
    },
    /// Poll and print pending jobs until interrupted
    Watch,
    /// Print the jobs currently pending
    Pending,
    /// Mark a job as timed out
    Timeout { job_id: String },
    /// List logged exercises
    Exercises,
    /// Show one exercise
    Exercise { id: String },
}

fn client_config(connection: &Connection) -> Result<ClientConfig> {
    let mut config =
        ClientConfig::from_env_or(connection.url.clone(), connection.anon_key.clone())?;
    if let Some(token) = &connection.access_token {
        config = config.with_access_token(token.clone());
    }
    Ok(config)
}

fn tracker_settings(connection: &Connection) -> TrackerSettings {
    let settings = TrackerSettings::from_env();
    match connection.interval {
        Some(ms) => settings.with_poll_interval(Duration::from_millis(ms)),
        None => settings,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let client = Arc::new(SupabaseClient::new(&client_config(&cli.connection)?)?);
    let settings = tracker_settings(&cli.connection);

    match cli.command {
        Commands::Log { messages, watch } => {
            commands::jobs::run_log(client, settings, &messages, watch).await
        },
        Commands::Watch => commands::jobs::run_watch(client, settings).await,
        Commands::Pending => commands::jobs::run_pending(client, settings).await,
        Commands::Timeout { job_id } => commands::jobs::run_timeout(client, settings, job_id).await,
        Commands::Exercises => commands::exercises::run_list(client).await,
        Commands::Exercise { id } => commands::exercises::run_get(client, &id).await,
    }
}
