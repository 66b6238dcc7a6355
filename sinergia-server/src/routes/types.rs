//! The activity-types listing endpoint.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use sinergia_core::ActivityType;

use crate::routes::{AppError, fetch_options};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/types", get(list_types))
}

#[derive(Debug, Deserialize)]
pub struct TypesQuery {
    #[serde(rename = "cId")]
    company_id: Option<String>,
    nocache: Option<String>,
    #[serde(rename = "cacheMinutes")]
    cache_minutes: Option<String>,
}

#[derive(Serialize)]
struct TypesResponse {
    types: Vec<ActivityType>,
    #[serde(rename = "companyId")]
    company_id: String,
}

/// GET /api/types - active activity types for a company
async fn list_types(
    State(state): State<AppState>,
    Query(query): Query<TypesQuery>,
) -> Result<Response, AppError> {
    let options = fetch_options(query.nocache.as_deref(), query.cache_minutes.as_deref());
    let company_id = query
        .company_id
        .clone()
        .unwrap_or_else(|| state.config.default_company_id.clone());

    let types = state
        .client
        .list_active_activity_types(company_id.parse().ok(), &options)
        .await?;

    Ok((
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        Json(TypesResponse { types, company_id }),
    )
        .into_response())
}
