//! Admin Service - HTTP API for super-admin management of university admins.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use admin_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "admin-service")]
#[command(about = "University admin management service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long, env = "ADMIN_SERVICE_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "ADMIN_SERVICE_PORT", default_value = "3000")]
        port: u16,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Create the first super-admin if none exists
    Seed {
        #[arg(long, env = "ADMIN_SEED_NAME", default_value = "Super Admin")]
        name: String,
        #[arg(long, env = "ADMIN_SEED_EMAIL")]
        email: String,
        #[arg(long, env = "ADMIN_SEED_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            admin_service_lib::run_embedded(&host, port).await?;
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            admin_service_lib::run_migrations(migrate_action).await?;
        }
        Commands::Seed {
            name,
            email,
            password,
        } => {
            admin_service_lib::seed_super_admin(name, email, password).await?;
        }
    }

    Ok(())
}
