//! Admin Service Library
//!
//! Super-admin HTTP API that keeps each admin's global account and its
//! per-university memberships in step. Also exposes the migration and seed
//! commands used by the CLI.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::AdminServiceConfig;
use crate::infra::Database;
use crate::repository::AdminStore;
use crate::service::{AdminManager, AdminService};

/// Run the HTTP server on the given address.
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminServiceConfig::from_env()?;
    run_server_with_config(host, port, config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config::database_from_env()).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Create the first super-admin account if none exists.
pub async fn seed_super_admin(
    name: String,
    email: String,
    password: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config::database_from_env()).await?;
    let repo = Arc::new(AdminStore::new(db.get_connection()));
    let admins = AdminManager::new(repo);

    match admins.seed_super_admin(name, email.clone(), password).await? {
        Some(id) => info!(admin_id = %id, email = %email, "Super-admin created"),
        None => info!("A super-admin already exists, nothing to seed"),
    }

    Ok(())
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: AdminServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    // Initialize database
    let db = Database::connect(&config.database).await?;
    let repo = Arc::new(AdminStore::new(db.get_connection()));

    let state = AppState::from_repository(repo, config.jwt);
    let app = create_router(state);

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Admin service listening on {}", addr);
    info!("Swagger UI available at http://{}/swagger-ui/", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
