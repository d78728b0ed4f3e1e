//! Directory API Gateway Library
//!
//! Proxies the low-code database backend to the statically generated
//! directory sites and turns backend change notifications into site rebuilds.

pub mod config;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware_layer;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod transform;

// Re-export main types and functions for external use
pub use config::{BackendConfig, Config, HostingConfig, ServerConfig};
pub use error::{ApiError, Result};
pub use state::AppState;

use axum::Router;

/// Build the main application router with all middleware and routes
pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .merge(routes::api::router())
        .merge(routes::public::router())
        .fallback(handlers::not_found);

    with_middleware(routes).with_state(state)
}

/// Request id, tracing, logging, CORS and panic recovery around `routes`
fn with_middleware(routes: Router<AppState>) -> Router<AppState> {
    use axum::middleware;
    use tower::ServiceBuilder;
    use tower_http::{
        catch_panic::CatchPanicLayer,
        request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
        trace::TraceLayer,
    };

    routes.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(
                middleware_layer::logging::logging_middleware,
            ))
            .layer(middleware::from_fn(middleware_layer::cors::cors_middleware))
            .layer(CatchPanicLayer::custom(error::panic_response)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::get,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_handler_panic_becomes_error_envelope() {
        let routes = Router::new().route(
            "/boom",
            get(|| async {
                panic!("listing store exploded");
                #[allow(unreachable_code)]
                ()
            }),
        );
        let app = with_middleware(routes).with_state(AppState::new(Config::default()).unwrap());

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "Internal server error",
                "error": "listing store exploded"
            })
        );
    }
}
