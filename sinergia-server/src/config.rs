//! Environment-driven server configuration.

use std::env;

use sinergia_api::ApiConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_COMPANY_ID: &str = "5";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Company used when a request doesn't name one via `cId`.
    pub default_company_id: String,
    pub api: ApiConfig,
}

impl ServerConfig {
    /// Read configuration from the environment, falling back to the
    /// production defaults.
    ///
    /// Recognized variables: `PORT`, `COMPANY_ID_DEFAULT`,
    /// `SINERGIA_BASE_URL`, `SINERGIA_AUTH_TOKEN`.
    pub fn from_env() -> Self {
        let mut api = ApiConfig::default();
        if let Ok(base_url) = env::var("SINERGIA_BASE_URL") {
            api.base_url = base_url;
        }
        if let Ok(token) = env::var("SINERGIA_AUTH_TOKEN") {
            api.auth_token = token;
        }

        ServerConfig {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            default_company_id: env::var("COMPANY_ID_DEFAULT")
                .unwrap_or_else(|_| DEFAULT_COMPANY_ID.to_string()),
            api,
        }
    }
}
