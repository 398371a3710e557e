pub mod config;
pub mod handlers;
pub mod models;
pub mod notifications;
pub mod payment_codes;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use leadbridge_auth::JwtService;
use leadbridge_common::ServerConfig;

use crate::config::LifecycleConfig;
use crate::notifications::Notifier;
use crate::payment_codes::PaymentCodeGenerator;
use crate::store::MarketplaceStore;

pub use crate::services::AppState;

impl AppState {
    pub fn new(
        store: Arc<dyn MarketplaceStore>,
        jwt_service: JwtService,
        notifier: Arc<dyn Notifier>,
        payment_codes: Arc<dyn PaymentCodeGenerator>,
        lifecycle: LifecycleConfig,
    ) -> Self {
        Self {
            store,
            jwt_service,
            notifier,
            payment_codes,
            lifecycle,
        }
    }
}

/// Session cookies are sent cross-origin, so origins are listed explicitly.
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(origins)
        .allow_credentials(true)
}

pub fn build_app(state: AppState, server: &ServerConfig) -> Router {
    routes::create_routes()
        .fallback(handlers::handler_404)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(server)),
        )
        .with_state(state)
}
