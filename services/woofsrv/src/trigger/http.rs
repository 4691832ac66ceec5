//! HTTP trigger
//!
//! `{prefix}on` and `{prefix}off` respond with a plain `OK`, any other
//! command under the prefix gets an `ERROR:` line and paths outside the
//! prefix are 404. `GET /health` reports the controller state as JSON.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use errors::{WoofError, WoofResult};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use super::WoofTrigger;
use crate::service::{BarkService, ServiceStatus};

#[derive(Clone)]
struct HttpState {
    service: Arc<BarkService>,
    prefix: Arc<str>,
}

#[derive(Debug, Clone)]
pub struct HttpTrigger {
    prefix: String,
    port: u16,
}

impl HttpTrigger {
    pub fn new(path: &str, port: u16) -> Self {
        Self {
            prefix: normalize_prefix(path),
            port,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn router(&self, service: Arc<BarkService>) -> Router {
        let state = HttpState {
            service,
            prefix: Arc::from(self.prefix.as_str()),
        };
        Router::new()
            .route("/health", get(health))
            .fallback(dispatch)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Serve on an already bound listener
    pub async fn serve(
        &self,
        listener: TcpListener,
        service: Arc<BarkService>,
        shutdown: CancellationToken,
    ) -> WoofResult<()> {
        let app = self.router(service);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
            .map_err(|e| WoofError::transport("http", e))
    }
}

#[async_trait]
impl WoofTrigger for HttpTrigger {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn run(self, service: Arc<BarkService>, shutdown: CancellationToken) -> WoofResult<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| WoofError::transport("http", format!("Failed to bind {}: {}", addr, e)))?;

        info!("HTTP trigger listening on http://{}{}", addr, self.prefix);
        info!("Health check: http://{}/health", addr);
        self.serve(listener, service, shutdown).await
    }
}

/// Leading and trailing `/`, so that `woof` becomes `/woof/`
fn normalize_prefix(path: &str) -> String {
    let mut prefix = String::with_capacity(path.len() + 2);
    if !path.starts_with('/') {
        prefix.push('/');
    }
    prefix.push_str(path);
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}

async fn health(State(state): State<HttpState>) -> Json<ServiceStatus> {
    Json(state.service.status())
}

async fn dispatch(State(state): State<HttpState>, uri: Uri) -> Response {
    let Some(cmd) = uri.path().strip_prefix(state.prefix.as_ref()) else {
        debug!("No handler for {}", uri.path());
        return StatusCode::NOT_FOUND.into_response();
    };

    match cmd {
        "on" => {
            info!("Received on request");
            state.service.woof_on();
            "OK".into_response()
        },
        "off" => {
            info!("Received off request");
            state.service.woof_off();
            "OK".into_response()
        },
        other => format!("ERROR: Unrecognized command '{}'", other).into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/"), "/");
        assert_eq!(normalize_prefix(""), "/");
        assert_eq!(normalize_prefix("/woof"), "/woof/");
        assert_eq!(normalize_prefix("woof/"), "/woof/");
        assert_eq!(HttpTrigger::new("/front/door", 80).prefix(), "/front/door/");
    }
}
