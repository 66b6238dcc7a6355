use std::sync::Arc;

use sinergia_api::SinergiaClient;
use sinergia_core::SinergiaResult;

use crate::config::ServerConfig;

/// Shared application state: the upstream client (which owns the response
/// cache) and the server configuration.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<SinergiaClient>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> SinergiaResult<Self> {
        let client = SinergiaClient::new(config.api.clone())?;

        Ok(AppState {
            client: Arc::new(client),
            config: Arc::new(config),
        })
    }
}
