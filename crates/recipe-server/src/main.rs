//! Binary entrypoint for the recipe HTTP server.
//!
//! Reads configuration from environment variables:
//! - `RECIPES_DB_PATH`: SQLite database file path (default: "recipes.db")
//! - `RECIPES_BIND`: Interface to listen on (default: "0.0.0.0")
//! - `RECIPES_PORT`: Server listen port (default: "3000")
//!
//! Log verbosity follows `RUST_LOG` (default: "info").

use recipe_server::config::ServerConfig;
use recipe_server::router::build_router;
use recipe_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let db_path = config.db_path.to_string_lossy();

    let state = AppState::new(&db_path).expect("Failed to initialize application state");

    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!(db = %db_path, "recipe server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
