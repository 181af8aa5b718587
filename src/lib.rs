//! A small subscription service: `POST /subscribe` records an opt-in email once,
//! `GET /health` reports liveness.

mod app;
pub mod config;
pub mod database;
mod error;
pub mod model;
pub mod web;

use tracing_subscriber::EnvFilter;

pub use app::{bind, App, AppState, InternalState};
pub use error::{Error, Result};
pub use web::serve::serve;

/// Human-readable tracing for local development. `RUST_LOG` overrides the default `debug` level.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .compact()
        .init();
}

/// One JSON object per line, for log collectors. `RUST_LOG` overrides the default `info` level.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
