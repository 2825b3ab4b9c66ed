// ABOUTME: Server binary that wires configuration, database, auth, and routes together
// ABOUTME: Seeds the bootstrap admin account and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! # Metabolica Server Binary
//!
//! Starts the clinical assessment API: loads configuration from the
//! environment, opens and migrates the database, seeds the bootstrap admin
//! account, and serves the axum router.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use metabolica::auth::AuthManager;
use metabolica::config::ServerConfig;
use metabolica::context::ServerResources;
use metabolica::database::Database;
use metabolica::llm::{GeminiProvider, NarrativeProvider};
use metabolica::{logging, routes};
use tracing::info;

#[derive(Parser)]
#[command(name = "metabolica-server")]
#[command(about = "Metabolica - Cardiometabolic risk assessment API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("Starting Metabolica server");
    info!("{}", config.summary());

    let database = Database::new(&config.database_url.to_connection_string()).await?;
    database.migrate().await?;
    if database
        .seed_bootstrap_admin(&config.auth.bootstrap_admin_password)
        .await?
    {
        info!("Bootstrap admin account created");
    }

    let auth = AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.jwt_expiry_hours,
    );

    let narrative: Option<Arc<dyn NarrativeProvider>> = config
        .gemini_api_key
        .as_deref()
        .map(|key| Arc::new(GeminiProvider::new(key)) as Arc<dyn NarrativeProvider>);
    if narrative.is_none() {
        info!("GEMINI_API_KEY not set, narrative generation disabled");
    }

    let addr = format!("0.0.0.0:{}", config.http_port);
    let resources = Arc::new(ServerResources::new(database, auth, config, narrative));
    let app = routes::router(resources.clone());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");
    axum::serve(listener, app).await?;

    resources.database.close().await;
    Ok(())
}
