//! Axum setup and router configuration
//!
//! Wires the HTTP surface to the database handle and runs the server
//! with graceful shutdown.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::db::Database;
use crate::routes::{self, health::ServerState, health::SharedState};

/// Server command-line arguments
#[derive(Parser, Debug, Clone)]
pub struct ServerArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    pub port: u16,

    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Database file path (default: ~/.stacks/stacks.db)
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl Default for ServerArgs {
    fn default() -> Self {
        Self {
            port: 5000,
            bind: "127.0.0.1".to_string(),
            db_path: None,
            timeout: 30,
        }
    }
}

/// Run the server with the given arguments
pub async fn run_server(args: ServerArgs) -> anyhow::Result<()> {
    let db_path = args.db_path.unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".stacks")
            .join("stacks.db")
    });

    info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;

    let state = Arc::new(RwLock::new(ServerState::new(db.clone())));
    let app = create_router(db, state, args.timeout);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;

    info!("Starting stacks-server on http://{}", addr);
    info!("Database: {}", db_path.display());

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the Axum router with all routes
pub fn create_router(db: Database, state: SharedState, timeout_secs: u64) -> Router {
    // CORS layer for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(timeout_secs)))
        .layer(cors);

    Router::new()
        // Health
        .route("/health", get(routes::health_check))
        // Books
        .route("/book/add", post(routes::add_book))
        .route("/book/get", get(routes::get_all_books))
        .route("/book/get/{id}", get(routes::get_one_book))
        .route("/book/update/{id}", put(routes::update_book))
        .route(
            "/book/update/title/{book_title}",
            put(routes::update_book_by_title),
        )
        .route("/book/delete/{id}", delete(routes::delete_book))
        // Users
        .route("/user/add", post(routes::add_user))
        .route("/user/get", get(routes::get_all_users))
        .route("/user/get/{id}", get(routes::get_one_user))
        .route("/user/update/{id}", put(routes::update_user))
        .route("/user/delete/{id}", delete(routes::delete_user))
        // State
        .with_state(db)
        // Health needs full state for uptime
        .layer(axum::Extension(state))
        .layer(middleware)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
