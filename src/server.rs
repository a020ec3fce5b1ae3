//! HTTP API served over a Unix domain socket
//!
//! Routes:
//! - `GET /hello` returns `{"Message": "hello"}`
//! - `GET /apps` returns the cached app summaries, or `{"error": ...}` with a 500

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use log::{info, warn};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tokio::net::UnixListener;

use crate::cache::CacheGate;
use crate::data::{AppSummary, FeedError, FeedSource};

/// Errors that can stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// A leftover file at the socket path could not be removed
    #[error("Failed to remove stale socket {path}: {source}")]
    RemoveStaleSocket {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Binding the Unix socket failed
    #[error("Failed to bind {path}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The accept loop failed
    #[error("Server error: {0}")]
    Serve(#[from] io::Error),
}

/// Body of the `/hello` response
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageBody {
    pub message: String,
}

/// A failed request, rendered as `500 {"error": "<message>"}`
#[derive(Debug)]
pub struct ApiError(pub FeedError);

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.0.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Builds the router for the given cache gate
pub fn router<F>(gate: Arc<CacheGate<F>>) -> Router
where
    F: FeedSource + 'static,
{
    Router::new()
        .route("/hello", get(hello))
        .route("/apps", get(get_apps::<F>))
        .layer(middleware::from_fn(log_request))
        .with_state(gate)
}

/// Removes any stale file at `path` and binds a Unix listener there
pub fn bind_socket(path: &Path) -> Result<UnixListener, ServerError> {
    match std::fs::remove_file(path) {
        Ok(()) => info!("Removed stale socket {}", path.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ServerError::RemoveStaleSocket {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    UnixListener::bind(path).map_err(|source| ServerError::Bind {
        path: path.to_path_buf(),
        source,
    })
}

/// Serves the API on `socket_path` until ctrl-c or SIGTERM
///
/// The socket file is removed again on a clean shutdown.
pub async fn serve<F>(socket_path: &Path, gate: Arc<CacheGate<F>>) -> Result<(), ServerError>
where
    F: FeedSource + 'static,
{
    let listener = bind_socket(socket_path)?;
    info!("Starting listening on {}", socket_path.display());

    axum::serve(listener, router(gate))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    if let Err(err) = std::fs::remove_file(socket_path) {
        warn!("Failed to remove socket {}: {}", socket_path.display(), err);
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Logs one line per request with method, URI, status and latency
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} {} {}ms",
        method,
        uri,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

async fn hello() -> Json<MessageBody> {
    Json(MessageBody {
        message: "hello".to_string(),
    })
}

async fn get_apps<F>(
    State(gate): State<Arc<CacheGate<F>>>,
) -> Result<Json<Arc<Vec<AppSummary>>>, ApiError>
where
    F: FeedSource + 'static,
{
    let apps = gate.get_summaries(Instant::now()).await?;
    Ok(Json(apps))
}
