//! HTTP surface: router, shared state and middleware

mod error;
mod handlers;
mod rate_limit;
mod validation;

use crate::config::Config;
use crate::db::Database;
use rate_limit::RateLimiter;
use axum::{
    http::{header, HeaderName, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        Self {
            db,
            config: Arc::new(config),
            rate_limiter,
        }
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::dashboard))
        .route("/recommendations", get(handlers::recommendations))
        .route("/historical", get(handlers::historical))
        .route("/sensor-data", get(handlers::sensor_data))
        .route("/weather-forecast", get(handlers::weather_forecast))
}

fn security_headers() -> [(HeaderName, &'static str); 5] {
    [
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::X_FRAME_OPTIONS, "DENY"),
        (header::X_XSS_PROTECTION, "1; mode=block"),
        (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
        (
            HeaderName::from_static("permissions-policy"),
            "geolocation=(), microphone=(), camera=()",
        ),
    ]
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = if state.config.server.allow_any_origin {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_routes())
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    for (name, value) in security_headers() {
        app = app.layer(SetResponseHeaderLayer::overriding(
            name,
            HeaderValue::from_static(value),
        ));
    }

    app.with_state(state)
}
