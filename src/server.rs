//! Router assembly
//!
//! Wires handlers to their paths and wraps them in the middleware stack:
//! request IDs outermost, then HTTP tracing, CORS and the security headers.

use crate::config::ServerConfig;
use crate::handlers::{self, AppState};
use crate::middleware::request_id_middleware;
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Headers added to every response unless a handler already set them
const SECURITY_HEADERS: [(HeaderName, &str); 4] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
    (header::REFERRER_POLICY, "no-referrer"),
    (header::X_DNS_PREFETCH_CONTROL, "off"),
];

/// Build the application router
pub fn router(state: AppState) -> Router {
    let diagnostics_enabled = state.config().diagnostics.enabled;
    let cors = cors_layer(&state.config().server);

    let mut api = Router::new()
        .route("/api/chat", post(handlers::chat::handler))
        .route("/api/contact", post(handlers::contact::handler))
        .route("/api/projects", get(handlers::projects::handler))
        .route("/api/health", get(handlers::health::handler))
        .route("/metrics", get(handlers::metrics::handler));

    if diagnostics_enabled {
        api = api
            .route("/api/chat/debug", get(handlers::diagnostics::handler))
            .route("/api/debug", get(handlers::diagnostics::handler));
    }

    let mut app = api.with_state(state);
    for (name, value) in SECURITY_HEADERS {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            name,
            HeaderValue::from_static(value),
        ));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
}

/// CORS policy from `server.cors_origins`
///
/// An empty list allows any origin. Entries that are not valid header values
/// are skipped with a warning.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if config.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::fallback_only_state;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_security_headers_on_every_response() {
        let response = router(fallback_only_state())
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        for (name, value) in SECURITY_HEADERS {
            assert_eq!(response.headers()[&name], value);
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = router(fallback_only_state())
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_cors_layer_skips_invalid_origins() {
        let config = ServerConfig {
            cors_origins: vec!["https://example.dev".to_string(), "bad\norigin".to_string()],
            ..ServerConfig::default()
        };
        // Building the layer must not panic on the invalid entry
        let _ = cors_layer(&config);
    }

    #[tokio::test]
    async fn test_cors_allows_listed_origin() {
        let mut config = crate::config::Config::default();
        config.server.cors_origins = vec!["https://example.dev".to_string()];
        let state = AppState::new(
            std::sync::Arc::new(config),
            std::sync::Arc::new(crate::storage::MemoryStore::seeded()),
        )
        .unwrap();

        let response = router(state)
            .oneshot(
                Request::get("/api/health")
                    .header(header::ORIGIN, "https://example.dev")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://example.dev"
        );
    }
}
