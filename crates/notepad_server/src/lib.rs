//! HTTP surface for the notepad's AI assist.
//!
//! Three JSON endpoints plus a health probe. Notes never pass through the
//! server beyond the text a request carries.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use routes::router;
pub use state::AppState;

use log::info;
use tokio::net::TcpListener;

/// Binds `config.bind` and serves the router until the process stops.
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.bind).await?;
    info!(
        "event=server_start module=server status=ok bind={}",
        listener.local_addr()?
    );
    axum::serve(listener, router(state)).await
}
