//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the host application router (health route, static assets)
//! - Install the forwarder in front of every host route and the fallback
//! - Serve with graceful shutdown

use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::ForwarderConfig;
use crate::forward::{forward_api_requests, BuildError, Forwarder};

/// The host application with the forwarder installed.
pub struct HttpServer {
    router: Router,
    forwarder: Arc<Forwarder>,
}

impl HttpServer {
    /// Create a server whose forwarder is built from `config.upstream`.
    pub fn new(config: ForwarderConfig) -> Result<Self, BuildError> {
        let forwarder = Arc::new(Forwarder::from_config(&config.upstream)?);
        Ok(Self::with_forwarder(&config, forwarder))
    }

    /// Create a server around an already built forwarder.
    pub fn with_forwarder(config: &ForwarderConfig, forwarder: Arc<Forwarder>) -> Self {
        let router = Self::build_router(config, forwarder.clone());
        Self { router, forwarder }
    }

    fn build_router(config: &ForwarderConfig, forwarder: Arc<Forwarder>) -> Router {
        let host = Router::new().route("/health", get(health));

        let host = match &config.host.static_dir {
            Some(dir) => host.fallback_service(ServeDir::new(dir)),
            None => host.fallback(not_found),
        };

        host.layer(middleware::from_fn_with_state(forwarder, forward_api_requests))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.forwarder.backend(),
            marker = self.forwarder.matcher().marker(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The composed router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn server_with_unreachable_backend() -> HttpServer {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = ForwarderConfig::default();
        config.upstream.base_url = format!("http://{addr}");
        HttpServer::new(config).unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_host_routes_pass_through() {
        let router = server_with_unreachable_backend().router();

        let response = router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");

        let response = router
            .oneshot(Request::get("/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_requests_bypass_host_routes() {
        let router = server_with_unreachable_backend().router();

        let response = router
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_string(response).await,
            r#"{"error":"Failed to reach API server"}"#
        );
    }

    #[test]
    fn test_invalid_backend_is_rejected() {
        let mut config = ForwarderConfig::default();
        config.upstream.base_url = "mailto:ops@example.com".into();
        assert!(matches!(HttpServer::new(config), Err(BuildError::Backend(_))));
    }
}
