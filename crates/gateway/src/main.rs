//! Tweeter gateway - HTTP JSON API for the social service.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::config::GatewayConfig;
use social_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "HTTP API for users, tweets and follows")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Bind host (overrides GATEWAY_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides GATEWAY_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Manage database migrations
    Migrate {
        #[arg(value_enum)]
        action: MigrateCommand,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MigrateCommand {
    /// Apply pending migrations
    Up,
    /// Roll back the last migration
    Down,
    /// List migrations and whether they are applied
    Status,
    /// Drop all tables and reapply every migration
    Fresh,
}

impl From<MigrateCommand> for MigrateAction {
    fn from(command: MigrateCommand) -> Self {
        match command {
            MigrateCommand::Up => MigrateAction::Up,
            MigrateCommand::Down => MigrateAction::Down,
            MigrateCommand::Status => MigrateAction::Status,
            MigrateCommand::Fresh => MigrateAction::Fresh,
        }
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = match cli.command {
        Commands::Serve { host, port } => {
            let mut config = GatewayConfig::from_env();
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            gateway_lib::run(config).await
        }
        Commands::Migrate { action } => social_service_lib::run_migrations(action.into()).await,
    };

    if let Err(e) = result {
        tracing::error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}
