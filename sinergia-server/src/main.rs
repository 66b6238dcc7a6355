mod config;
mod routes;
mod state;

use std::env;
use std::net::SocketAddr;

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .init();

    let config = ServerConfig::from_env();
    let port = config.port;
    let state = AppState::new(config)?;

    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", addr);
    info!("- Calendar: http://{}/api/calendar", addr);
    info!("- Types:    http://{}/api/types", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
