//! combatd - tabletop combat tracker daemon
//!
//! Tracks one live encounter (initiative order, hit points, status
//! effects and death saves) and serves it over a REST API, with saved
//! encounters, character profiles and effect presets kept in SQLite.

pub mod api;
pub mod characters;
pub mod combat;
pub mod config;
pub mod db;
pub mod encounters;
pub mod presets;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

pub use config::Config;
use db::Database;
use encounters::ServiceError;

/// The combatd server instance
pub struct Server {
    config: Config,
    db: Arc<Database>,
    state: api::AppState,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance
    pub async fn new(config: Config) -> Result<Self> {
        let db = Arc::new(Database::new(config.db_path.as_deref()).await?);
        let state = api::AppState::new(db.clone(), &config);

        if config.autoload_latest {
            match state.encounters.load_latest().await {
                Ok(_) => {}
                Err(ServiceError::NotFound(_)) => info!("No saved encounter to load"),
                Err(e) => warn!("Could not load latest encounter: {}", e),
            }
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            db,
            state,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Get the database handle
    pub fn db(&self) -> Arc<Database> {
        self.db.clone()
    }

    /// Shared state handed to every request
    pub fn state(&self) -> api::AppState {
        self.state.clone()
    }

    /// Build the router
    fn router(&self) -> Router {
        api::router(self.state.clone())
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("combatd listening on {}", local_addr);

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .await?;

        info!("combatd shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
