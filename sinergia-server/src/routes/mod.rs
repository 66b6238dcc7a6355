pub mod calendar;
pub mod types;

use std::time::Duration;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use sinergia_api::{DEFAULT_TTL, FetchOptions};

use crate::state::AppState;

/// Assemble the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(calendar::router())
        .merge(types::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert errors raised during request handling to HTTP responses.
///
/// Details go to the log; the response body stays generic.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "request failed");

        let body = Json(ErrorResponse {
            error: "Internal Server Error".to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Cache behavior for one request, from the `nocache` and `cacheMinutes`
/// query parameters.
pub(crate) fn fetch_options(nocache: Option<&str>, cache_minutes: Option<&str>) -> FetchOptions {
    FetchOptions {
        use_cache: nocache != Some("1"),
        ttl: cache_ttl(cache_minutes),
    }
}

/// TTL override in minutes; non-positive or non-numeric values fall back
/// to the default.
fn cache_ttl(raw: Option<&str>) -> Duration {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|minutes| *minutes > 0.0)
        .and_then(|minutes| Duration::try_from_secs_f64(minutes * 60.0).ok())
        .unwrap_or(DEFAULT_TTL)
}
