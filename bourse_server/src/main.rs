//! Casablanca bourse quote backend.
//!
//! HTTP service that:
//! - simulates Casablanca bourse quotes deterministically (`/casablanca-bourse`),
//! - relays live quotes for a whitelist of tickers (`/market-data`),
//! - sells challenge plans through a one-shot checkout (`/create-checkout`,
//!   `/verify-payment`), a hosted crypto charge (`/create-crypto-checkout`)
//!   or an approve-then-capture order (`/create-paypal-order`,
//!   `/capture-paypal-order`).
//!
//! Wiring only lives here: configuration comes from the environment (after an
//! optional `.env`), the symbol registry is parsed once, the collaborators are
//! built from the configuration, and the router is served until Ctrl-C.

use bourse_common::SymbolRegistry;
use bourse_common::net::addr;
use log::{error, info, warn};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::router::create_router;
use crate::state::AppState;

mod auth;
mod config;
mod error;
mod handlers;
mod model;
mod providers;
mod router;
mod state;
#[cfg(test)]
mod testkit;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // read before the logger so a RUST_LOG from `.env` applies
    let dotenv = dotenvy::dotenv();
    init_logger();
    match &dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => {
            if let Some(message) = dotenv_warning(e) {
                warn!("{}", message);
            }
        }
    }

    let config = ServerConfig::from_env()?;
    let registry = SymbolRegistry::casablanca()?;
    info!("Loaded {} Casablanca symbols", registry.len());

    let app = create_router(AppState::from_config(&config, registry));

    let listener = TcpListener::bind(addr("0.0.0.0", config.port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Warning for a `.env` that exists but could not be loaded; a missing file is fine.
fn dotenv_warning(err: &dotenvy::Error) -> Option<String> {
    (!err.not_found()).then(|| format!("Ignoring malformed .env: {}", err))
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn missing_env_file_is_silent() {
        let missing = dotenvy::Error::Io(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(dotenv_warning(&missing), None);
    }

    #[test]
    fn malformed_env_file_is_reported() {
        let malformed = dotenvy::Error::LineParse("PORT 8080".into(), 5);
        let warning = dotenv_warning(&malformed).unwrap();
        assert!(warning.starts_with("Ignoring malformed .env"));
        assert!(warning.contains("PORT 8080"));

        let unreadable = dotenvy::Error::Io(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(dotenv_warning(&unreadable).is_some());
    }
}
