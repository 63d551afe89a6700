// ABOUTME: Server binary for the MMS membership backend
// ABOUTME: Wires configuration, database, token issuer, and the HTTP router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! # MMS Server Binary
//!
//! Starts the membership backend: loads configuration from the environment,
//! bootstraps the account store, and serves the REST API.

use anyhow::Result;
use clap::Parser;
use mms_server::{
    auth::{generate_jwt_secret, AuthManager},
    config::environment::ServerConfig,
    database::Database,
    logging,
    routes::{self, ApiContext},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "mms-server")]
#[command(about = "MMS - Membership management backend")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url =
            mms_server::config::environment::DatabaseUrl::parse_url(&database_url);
    }

    logging::init_from_env()?;
    info!("Configuration: {}", config.summary());

    let database = Database::new(&config.database.url.to_connection_string()).await?;
    info!(
        "Database initialized: {}",
        config.database.url.to_connection_string()
    );

    // The signing secret is injected into the token issuer at construction.
    // Without JWT_SECRET a random secret is generated, which invalidates
    // outstanding tokens across restarts.
    let secret = match config.auth.jwt_secret.as_deref() {
        Some(secret) => secret.as_bytes().to_vec(),
        None => {
            warn!("JWT_SECRET not set; generating an ephemeral signing secret");
            generate_jwt_secret()?.to_vec()
        }
    };

    let auth_manager = AuthManager::new(
        secret,
        config.auth.access_token_expiry_mins,
        config.auth.refresh_token_expiry_hours,
    );
    info!("Authentication manager initialized");

    let context = ApiContext::new(Arc::new(database), Arc::new(auth_manager));
    let app = routes::router(context)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install shutdown signal handler: {e}");
        // Fall through: without a signal handler the server runs until killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
