use axum::{
    http::{header::CONTENT_TYPE, HeaderName, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;

use appeal_store::AppealStore;
use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn AppealStore>,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn AppealStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/appeal", post(handlers::appeals::submit_appeal))
        .route("/appeals", get(handlers::appeals::list_appeals))
        .route("/appeal/{id}", get(handlers::appeals::get_appeal))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    let api = Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(protected);

    let app = match state.config.base_path() {
        "" => api,
        base => Router::new().nest(base, api),
    };

    app.layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-api-key")])
}
