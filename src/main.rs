//! Judgeboard · Problem Editor Admin Backend
//!
//! - Axum HTTP + WebSocket API for the admin problem editor
//! - Upstream problem service reached over HTTP
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT          : u16 (default 4000)
//!   UPSTREAM_BASE_URL     : problem service base URL (default "http://localhost:3001")
//!   UPSTREAM_TIMEOUT_SECS : per-request timeout (default 20)
//!   ADMIN_CONFIG_PATH  : path to TOML config (form defaults)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod templates;
mod upstream;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;
use crate::upstream::Upstream;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (upstream client, sessions, defaults).
  let upstream = Upstream::from_env()?;
  let state = Arc::new(AppState::new(upstream));

  // Initial list load; an unreachable upstream is logged and just leaves
  // the list empty.
  let problems = state.fetch_problems().await;
  info!(target: "editor", count = problems.len(), "Initial problem list loaded");

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 4000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 4000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "admin_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
