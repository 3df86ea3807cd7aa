//! HTTP surface for the Folio bookstore catalog.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use infra::errors::{AppError, AppResult};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
    routing::get,
};
use folio_config::CorsConfig;
use folio_core::api::routes::ops;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use handlers::health::{health_handler, ping_handler};

pub fn create_app(state: AppState) -> Router {
    let versioned_api = routes::create_api_router();

    // Permissive in dev, allow-list otherwise
    let cors_layer = if state.config().dev_mode {
        CorsLayer::permissive()
    } else {
        build_cors_layer(&state.config().cors)
    };

    Router::new()
        .route(ops::PING, get(ping_handler))
        .route(ops::HEALTH, get(health_handler))
        .merge(versioned_api)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();
    // An empty list admits no cross-origin callers.
    let allow_origin = AllowOrigin::list(origins);

    // Method and header lists were validated during config load.
    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
        .collect();
    let headers: Vec<HeaderName> = cors
        .allowed_headers
        .iter()
        .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok())
        .collect();

    let mut layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers));

    if cors.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    layer
}
