//! axum implementation of the server engine.

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use super::{RouteTable, ServerEngine, ServerHandle, Teardown};
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::ui;

/// Serves mock routes over HTTP with axum.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockServer;

impl MockServer {
    pub fn new() -> Self {
        Self
    }

    fn build_router(table: RouteTable, silent: bool) -> Router {
        let state = Arc::new(ServeState { table, silent });

        Router::new()
            .fallback(handle_request)
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(state)
    }
}

#[async_trait]
impl ServerEngine for MockServer {
    async fn create(&self, config: ServerConfig) -> Result<ServerHandle, ServerError> {
        let table = RouteTable::new(&config)?;
        let addr = config.address();

        let listener = TcpListener::bind((config.host.as_str(), config.port))
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let port = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?
            .port();

        info!(port, routes = table.len(), "mock server bound");
        let app = Self::build_router(table, config.silent);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        Ok(ServerHandle::new(
            port,
            ServeTeardown {
                port,
                shutdown: Some(shutdown_tx),
                task: Some(task),
            },
        ))
    }
}

struct ServeTeardown {
    port: u16,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

#[async_trait]
impl Teardown for ServeTeardown {
    async fn destroy(&mut self) -> Result<(), ServerError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        let Some(task) = self.task.take() else {
            return Ok(());
        };

        let result = task
            .await
            .map_err(|e| ServerError::Teardown(e.to_string()))?
            .map_err(|e| ServerError::Teardown(e.to_string()));
        debug!(port = self.port, "mock server stopped");
        result
    }
}

struct ServeState {
    table: RouteTable,
    silent: bool,
}

async fn handle_request(
    State(state): State<Arc<ServeState>>,
    method: Method,
    uri: Uri,
) -> Response {
    let started = Instant::now();
    let path = uri.path();

    let response = match state.table.lookup(&method, path) {
        Some(route) => {
            if let Some(delay) = route.delay {
                tokio::time::sleep(delay).await;
            }
            let mut response = Response::new(Body::from(route.body.clone()));
            *response.status_mut() = route.status;
            *response.headers_mut() = route.headers.clone();
            response
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Not Found",
                "method": method.as_str(),
                "path": path,
            })),
        )
            .into_response(),
    };

    if !state.silent {
        ui::request(
            method.as_str(),
            path,
            response.status().as_u16(),
            started.elapsed(),
        );
    }

    response
}
