use anyhow::Result;
use clap::{Parser, Subcommand};
use owl_api::{config::Config, migration, server, service::hash_password, telemetry};
use tracing::info;

#[derive(Parser)]
#[command(name = "owl-api", version, about = "OWL Network API server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the database if needed and apply migrations
    Migrate,
    /// Print an argon2 hash for seeding auth_user.password
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(Command::HashPassword { password }) = &cli.command {
        println!("{}", hash_password(password)?);
        return Ok(());
    }

    let config = Config::from_env()?;
    let prometheus_handle = telemetry::init(&config.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Migrate => migration::run_migrations(&config).await,
        Command::Serve => {
            info!("Starting OWL Network API");
            info!("HTTP server listening on {}", config.http_addr());
            server::run(config, prometheus_handle).await
        }
        Command::HashPassword { .. } => Ok(()),
    }
}
