//! JSON HTTP interface.
//!
//! Routes keep the shape of the shop's existing front end: one `/transactions` resource whose
//! operation is picked by an `action` parameter (query string for reads, JSON body for writes),
//! plus `/clothes` and `/detergents` for the catalog. Handlers only decode, dispatch to
//! [`crate::core`] and encode; every rule lives in the core.

mod catalog;
mod edit;
mod error;
mod transactions;

pub use error::ApiError;

use std::{net::SocketAddr, sync::Arc};

use crate::errors::{Error, Result};
use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl AppState {
    /// Creates the handler state around a database connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/transactions",
            get(transactions::fetch)
                .post(transactions::submit)
                .put(edit::update),
        )
        .route(
            "/clothes",
            get(catalog::list_clothes).post(catalog::add_cloth),
        )
        .route(
            "/detergents",
            get(catalog::list_detergents).post(catalog::add_detergent),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the API on `addr` until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await.map_err(|e| Error::Server {
        message: format!("Failed to bind {addr}: {e}"),
    })?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
pub(crate) mod test_support {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::{AppState, router};
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use sea_orm::DatabaseConnection;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Router over the given database, plus a handle for checking rows afterwards.
    pub fn app(db: DatabaseConnection) -> (Router, Arc<DatabaseConnection>) {
        let state = AppState::new(db);
        let db = Arc::clone(&state.db);
        (router(state), db)
    }

    /// Sends one request and returns the status with the decoded JSON body.
    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is JSON")
        };
        (status, json)
    }
}
