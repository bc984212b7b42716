//! Web layer module
//!
//! This module provides the HTTP interface of the greeting overlay service.
//! Handlers are thin and delegate to the service layer.
//!
//! # Routes
//!
//! - `POST /upload`: multipart upload, returns `{"imageId"}`
//! - `POST /add-text`: JSON `{"imageId","name","dateTime"}`, returns `{"url"}`
//! - `GET /health`: liveness and registry size
//! - `/uploads/<file>`: stored originals and composed images
//! - everything else: static files from the public directory

use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use sandboxed_file_manager::{RetentionPolicy, SandboxedManager};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{info, warn};

use crate::{
    config::Config,
    errors::AppResult,
    services::{CompositionService, ImageRegistry, UploadService},
};

pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod utils;

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: &Config, state: AppState) -> Result<Self> {
        let addr: SocketAddr = config.bind_address().parse()?;
        Ok(Self {
            app: create_router(state),
            addr,
        })
    }

    /// Serve until SIGINT or SIGTERM
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", self.addr, e))?;
        info!("Listening on http://{}", self.addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: SandboxedManager,
    pub registry: ImageRegistry,
    pub upload_service: UploadService,
    pub composition_service: CompositionService,
    pub start_time: DateTime<Utc>,
}

impl AppState {
    /// Prepare the uploads directory and wire up the services
    pub async fn from_config(config: Config) -> AppResult<Self> {
        let storage = SandboxedManager::builder()
            .base_directory(config.storage.uploads_dir.clone())
            .retention_policy(
                RetentionPolicy::new()
                    .remove_after(config.retention.max_age)
                    .enabled(config.retention.enabled),
            )
            .build()
            .await?;

        let registry = ImageRegistry::new();
        let upload_service = UploadService::new(storage.clone(), registry.clone());
        let composition_service =
            CompositionService::from_config(&config.render, storage.clone(), registry.clone())?;

        Ok(Self {
            config,
            storage,
            registry,
            upload_service,
            composition_service,
            start_time: Utc::now(),
        })
    }
}

/// Create the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.storage.base_dir());
    let public = ServeDir::new(&state.config.web.public_dir);
    let body_limit = state.config.web.max_upload_bytes;

    Router::new()
        .route("/upload", post(handlers::images::upload_image))
        .route("/add-text", post(handlers::images::add_text))
        .route("/health", get(handlers::health::health_check))
        .nest_service("/uploads", uploads)
        .fallback_service(public)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(
            middleware::request_logging_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
