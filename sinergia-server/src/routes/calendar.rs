//! The calendar feed endpoint.

use axum::{
    Router,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use futures::future::join_all;
use serde::Deserialize;
use tracing::warn;

use sinergia_core::ics::generate_calendar;
use sinergia_core::{ScheduleMap, merge_schedules};

use crate::routes::{AppError, fetch_options};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/calendar", get(calendar_feed))
        .route("/calendar", get(calendar_feed))
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// Comma-separated activity ids; absent means all active for the company.
    id: Option<String>,
    #[serde(rename = "cId")]
    company_id: Option<String>,
    nocache: Option<String>,
    #[serde(rename = "cacheMinutes")]
    cache_minutes: Option<String>,
}

/// GET /api/calendar (also /calendar) - the iCalendar feed
async fn calendar_feed(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Response, AppError> {
    let options = fetch_options(query.nocache.as_deref(), query.cache_minutes.as_deref());
    let company_id = query
        .company_id
        .clone()
        .unwrap_or_else(|| state.config.default_company_id.clone());

    let requested = split_ids(query.id.as_deref());
    let name = calendar_name(&requested);

    // An explicit selection is fetched as-is; otherwise every activity the
    // company currently offers goes into the feed.
    let ids: Vec<String> = if requested.is_empty() {
        state
            .client
            .list_active_activity_types(company_id.parse().ok(), &options)
            .await?
            .into_iter()
            .map(|t| t.id.to_string())
            .collect()
    } else {
        requested
    };

    // One guarded fetch per activity: a failing activity drops out of the
    // feed instead of failing the whole request.
    let fetches = ids.iter().map(|id| {
        let client = &state.client;
        let company_id = &company_id;
        let options = &options;
        async move {
            match client
                .fetch_activity_schedule(id, company_id, options)
                .await
            {
                Ok(schedule) => schedule,
                Err(err) => {
                    warn!(activity_id = %id, error = %err, "dropping activity from feed");
                    ScheduleMap::new()
                }
            }
        }
    });
    let schedules = join_all(fetches).await;

    let merged = merge_schedules(schedules);
    let ics = generate_calendar(&merged, &name, Utc::now().naive_utc());

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"sinergia-calendar.ics\"",
            ),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        ics,
    )
        .into_response())
}

fn split_ids(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn calendar_name(ids: &[String]) -> String {
    match ids {
        [] => "Sinergia Life - All Activities".to_string(),
        [id] => format!("Sinergia Life - Activity {id}"),
        _ => "Sinergia Life - Selected Activities".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_name_follows_the_selection() {
        assert_eq!(calendar_name(&[]), "Sinergia Life - All Activities");
        assert_eq!(
            calendar_name(&["12".to_string()]),
            "Sinergia Life - Activity 12"
        );
        assert_eq!(
            calendar_name(&["12".to_string(), "15".to_string()]),
            "Sinergia Life - Selected Activities"
        );
    }

    #[test]
    fn split_ids_trims_and_drops_empties() {
        assert_eq!(split_ids(Some("1, 2,,3 ")), vec!["1", "2", "3"]);
        assert_eq!(split_ids(Some("")), Vec::<String>::new());
        assert_eq!(split_ids(None), Vec::<String>::new());
    }
}
