//! # SlotBook API
//!
//! The web server for the SlotBook availability service. Customers look up
//! free service windows and book them; administrators publish new windows
//! and manage reservations.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Validate requests and call into the slot store
//! - **Middleware**: Admin authentication and error to response mapping
//! - **Config**: Environment based configuration
//!
//! Persistence sits behind [`SlotStore`], injected through [`ApiState`].

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{Router, http::HeaderValue};
use eyre::{Result, WrapErr};
use slotbook_db::store::SlotStore;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Availability store every handler talks to
    pub store: Arc<dyn SlotStore>,

    /// Argon2 hash guarding admin routes; `None` leaves them open
    pub(crate) admin_password_hash: Option<String>,

    /// Name of the storage backend, reported by `/health`
    pub storage: &'static str,
}

impl ApiState {
    pub fn new(store: Arc<dyn SlotStore>, storage: &'static str) -> Self {
        Self {
            store,
            admin_password_hash: None,
            storage,
        }
    }

    /// Sets the admin password hash, rejecting one argon2 cannot parse.
    pub fn with_admin_password_hash(mut self, hash: Option<String>) -> Result<Self> {
        if let Some(hash) = &hash {
            middleware::auth::check_admin_password_hash(hash)?;
        }
        self.admin_password_hash = hash;
        Ok(self)
    }

    pub fn is_admin_protected(&self) -> bool {
        self.admin_password_hash.is_some()
    }
}

/// Installs the global fmt subscriber at the given level.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the application router with every route attached.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Slot management and availability endpoints
        .merge(routes::slot::routes(state.clone()))
        // Customer booking endpoints
        .merge(routes::booking::routes(state.clone()))
        // Attach shared state to all routes
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::HeaderName::from_static(middleware::auth::ADMIN_PASSWORD_HEADER),
        ])
        .allow_origin(origins))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Starts the API server and serves until Ctrl-C.
///
/// # Arguments
///
/// * `config` - API configuration including host, port, and other settings
/// * `state` - Shared state holding the slot store
pub async fn start_server(config: config::ApiConfig, state: ApiState) -> Result<()> {
    if !state.is_admin_protected() {
        warn!("ADMIN_PASSWORD_HASH is not set; admin endpoints are unprotected");
    }

    let app = app(Arc::new(state));

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
