use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use confhub_core::config::{Environment, RecordId};

mod commands;
mod console;
mod render;

use console::Console;

#[derive(Parser)]
#[command(name = "confhub")]
#[command(about = "confhub CLI - manage service configurations on a confhub backend", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config.toml and CONFHUB_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding config.toml and the stored session
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long, env = "CONFHUB_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CONFHUB_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to the password
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Show configuration statistics and recent uploads
    Dashboard {
        /// Use the counts computed by the backend
        #[arg(long)]
        server: bool,
    },
    /// List services grouped by environment
    Services {
        /// Case-insensitive service name filter
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_parser = parse_environment)]
        env: Option<Environment>,
    },
    /// List the versions of one service
    History {
        service: String,
        #[arg(value_parser = parse_environment)]
        env: Environment,
        /// Show only the active version with its data
        #[arg(long)]
        active: bool,
    },
    /// Show one configuration version
    View {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        /// Print every line of the preview
        #[arg(long)]
        full: bool,
        /// Save the data as JSON into this directory
        #[arg(long)]
        download: Option<PathBuf>,
    },
    /// Validate and upload a JSON or YAML file
    Upload {
        file: PathBuf,
        #[arg(long)]
        service: String,
        #[arg(long, value_parser = parse_environment)]
        env: Environment,
    },
    /// Make a version the active one
    Activate {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
    },
    /// Delete a version
    Delete {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
    },
    /// Check a JSON or YAML file locally without uploading it
    Validate {
        file: PathBuf,
        /// Print every line of the preview
        #[arg(long)]
        full: bool,
    },
}

fn parse_environment(raw: &str) -> Result<Environment, String> {
    raw.parse().map_err(|e: confhub_core::ConfhubError| e.to_string())
}

fn parse_record_id(raw: &str) -> Result<RecordId, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("id must not be empty".to_string());
    }
    Ok(RecordId::from(raw))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        // Runs without a backend or a config directory.
        Commands::Validate { file, full } => commands::upload::validate(&file, full).await,
        command => {
            let console = Console::open(cli.config_dir.as_deref(), cli.api_url.as_deref())?;
            run(&console, command).await
        }
    }
}

async fn run(console: &Console, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            commands::auth::login(console, &email, password).await?
        }
        Commands::Logout => commands::auth::logout(console).await,
        Commands::Whoami => commands::auth::whoami(console).await?,
        Commands::Signup {
            name,
            email,
            password,
            confirm_password,
        } => commands::auth::signup(console, name, email, password, confirm_password).await?,
        Commands::Dashboard { server } => commands::dashboard::show(console, server).await?,
        Commands::Services { search, env } => {
            commands::catalog::services(console, search, env).await?
        }
        Commands::History {
            service,
            env,
            active: true,
        } => commands::catalog::active(console, &service, env).await?,
        Commands::History { service, env, .. } => {
            commands::catalog::history(console, &service, env).await?
        }
        Commands::View { id, full, download } => {
            commands::catalog::view(console, id, full, download).await?
        }
        Commands::Upload { file, service, env } => {
            commands::upload::upload(console, &file, &service, env).await?
        }
        Commands::Activate { id } => commands::catalog::activate(console, id).await?,
        Commands::Delete { id } => commands::catalog::delete(console, id).await?,
        Commands::Validate { file, full } => commands::upload::validate(&file, full).await?,
    }

    Ok(())
}
