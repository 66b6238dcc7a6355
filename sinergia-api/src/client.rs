//! The Sinergia agenda API client.
//!
//! Two queries exist upstream: the category listing (all activity types for
//! a gym) and the per-activity weekly schedule. Both are plain GET/JSON and
//! go through [`SinergiaClient::fetch_json`], which consults the response
//! cache first.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, ORIGIN, REFERER, USER_AGENT};
use serde_json::Value;
use tracing::debug;
use url::Url;

use sinergia_core::{ActivityType, ScheduleMap, SinergiaError, SinergiaResult};

use crate::cache::ResponseCache;

const DEFAULT_BASE_URL: &str = "https://api-agenda.sinergialife.uy";
const DEFAULT_AUTH_TOKEN: &str = "9108b9e0-dff1-41c2-8091-8ab1544c6ccb";

// The agenda backend rejects requests that don't look like its own web UI.
const BOOKING_ORIGIN: &str = "https://agenda.sinergialife.uy";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/26.0 Safari/605.1.15";

/// Default time-to-live for cached upstream responses.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Upstream connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_token: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_token: DEFAULT_AUTH_TOKEN.to_string(),
        }
    }
}

/// Per-request cache behavior.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub use_cache: bool,
    pub ttl: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            use_cache: true,
            ttl: DEFAULT_TTL,
        }
    }
}

/// Client for the Sinergia agenda API, with an owned response cache.
pub struct SinergiaClient {
    http: reqwest::Client,
    base_url: Url,
    cache: ResponseCache,
}

impl SinergiaClient {
    pub fn new(config: ApiConfig) -> SinergiaResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|err| SinergiaError::Config(format!("invalid base url: {err}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.auth_token))
                .map_err(|err| SinergiaError::Config(format!("invalid auth token: {err}")))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(ORIGIN, HeaderValue::from_static(BOOKING_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static("https://agenda.sinergialife.uy/"));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| SinergiaError::Config(format!("http client: {err}")))?;

        Ok(SinergiaClient {
            http,
            base_url,
            cache: ResponseCache::new(),
        })
    }

    /// Fetch a JSON document, cache-first.
    ///
    /// On a cache hit no network access happens. A non-success status maps
    /// to [`SinergiaError::RequestFailed`]; transport failures map to
    /// [`SinergiaError::Network`].
    pub async fn fetch_json(&self, url: &Url, options: &FetchOptions) -> SinergiaResult<Value> {
        let key = url.as_str();

        if options.use_cache {
            if let Some(cached) = self.cache.get(key) {
                debug!(%url, "cache hit");
                return Ok(cached);
            }
            debug!(%url, "cache miss");
        }

        let started = Instant::now();
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| SinergiaError::Network {
                url: key.to_string(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinergiaError::RequestFailed {
                url: key.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(|err| SinergiaError::Network {
            url: key.to_string(),
            message: err.to_string(),
        })?;

        debug!(
            %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "upstream fetch"
        );

        if options.use_cache {
            self.cache.insert(key.to_string(), body.clone(), options.ttl);
        }

        Ok(body)
    }

    /// List the activity types that are `ACTIVE` upstream, optionally
    /// narrowed to one company. Upstream order is preserved.
    pub async fn list_active_activity_types(
        &self,
        company_id: Option<i64>,
        options: &FetchOptions,
    ) -> SinergiaResult<Vec<ActivityType>> {
        let url = self.category_listing_url()?;
        let body = self.fetch_json(&url, options).await?;

        let all = parse_activity_types(&body);
        let filtered = filter_activity_types(all, company_id);
        debug!(company_id, count = filtered.len(), "activity types");

        Ok(filtered)
    }

    /// Fetch one activity's weekly schedule. An absent or malformed
    /// `description` field degrades to an empty schedule; request failures
    /// surface to the caller.
    pub async fn fetch_activity_schedule(
        &self,
        activity_id: &str,
        company_id: &str,
        options: &FetchOptions,
    ) -> SinergiaResult<ScheduleMap> {
        let url = self.activity_schedule_url(activity_id, company_id)?;
        let body = self.fetch_json(&url, options).await?;

        let schedule = parse_schedule(&body);
        debug!(activity_id, company_id, days = schedule.len(), "activity schedule");

        Ok(schedule)
    }

    fn category_listing_url(&self) -> SinergiaResult<Url> {
        let mut url = self.join("nooauthactivity/get/")?;
        url.query_pairs_mut().append_pair("type", "cat");
        Ok(url)
    }

    fn activity_schedule_url(&self, activity_id: &str, company_id: &str) -> SinergiaResult<Url> {
        let mut url = self.join("nooauthactivity/")?;
        url.query_pairs_mut()
            .append_pair("type", "act")
            .append_pair("id", activity_id)
            .append_pair("cId", company_id);
        Ok(url)
    }

    fn join(&self, path: &str) -> SinergiaResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| SinergiaError::Config(format!("invalid url path {path}: {err}")))
    }
}

/// Read the category listing's `description` array; anything malformed
/// degrades to an empty list.
fn parse_activity_types(body: &Value) -> Vec<ActivityType> {
    body.get("description")
        .cloned()
        .and_then(|list| serde_json::from_value(list).ok())
        .unwrap_or_default()
}

/// Keep `ACTIVE` entries, then entries matching the requested company id
/// numerically. Filter-stable.
fn filter_activity_types(types: Vec<ActivityType>, company_id: Option<i64>) -> Vec<ActivityType> {
    types
        .into_iter()
        .filter(|t| t.status.is_active())
        .filter(|t| company_id.map_or(true, |wanted| t.company_id == Some(wanted)))
        .collect()
}

/// Read a schedule response's `description` map; anything malformed
/// degrades to an empty schedule.
fn parse_schedule(body: &Value) -> ScheduleMap {
    body.get("description")
        .cloned()
        .and_then(|map| serde_json::from_value(map).ok())
        .unwrap_or_default()
}
