// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Devlinks API Server
//!
//! Serves the session-gated dashboard and the public preview page, backed
//! by Firebase Authentication, Cloud Firestore and Firebase Storage.

use anyhow::Context;
use devlinks::{
    config::{Config, StoreBackend},
    db::DocumentStore,
    services::{FirebaseIdentity, ObjectStorage},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        port = config.port,
        backend = ?config.store_backend,
        "Starting Devlinks API"
    );

    let (db, storage) = match config.store_backend {
        StoreBackend::Firebase => (
            DocumentStore::new(&config.firebase_project_id)
                .await
                .context("Failed to connect to Firestore")?,
            ObjectStorage::new_firebase(&config.storage_bucket)?,
        ),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory stores; data is lost on restart");
            (DocumentStore::new_in_memory(), ObjectStorage::new_in_memory())
        }
    };

    let identity = Arc::new(
        FirebaseIdentity::new(&config).context("Failed to initialize identity provider")?,
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        storage,
        identity,
    });

    // Build router
    let app = devlinks::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("devlinks=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
