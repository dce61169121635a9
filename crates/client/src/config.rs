use std::time::Duration;

use dishbook_store::config::ANON_KEY_VAR;
use dishbook_store::StoreConfig;

use crate::error::ClientError;

/// Mutation API base URL used when `DISHBOOK_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Per-request timeout used when `REQUEST_TIMEOUT_SECS` is unset.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Mutation API base URL, without a trailing slash.
    pub api_url: String,
    /// Upper bound on every HTTP request.
    pub request_timeout_secs: u64,
    /// Hosted store used for reads and sign-in, when configured.
    pub store: Option<StoreConfig>,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `DISHBOOK_API_URL`     | `http://localhost:8000` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `SUPABASE_URL`         | unset (no store)        |
    /// | `SUPABASE_ANON_KEY`    | required with the URL   |
    pub fn from_env() -> Result<Self, ClientError> {
        let api_url = std::env::var("DISHBOOK_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout_secs = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                ClientError::Validation("REQUEST_TIMEOUT_SECS must be a valid u64".into())
            })?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let store = StoreConfig::from_env_optional(ANON_KEY_VAR)?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            request_timeout_secs,
            store,
        })
    }

    /// Configuration pointing at `api_url` with no store and default timeout.
    pub fn for_api(api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            store: None,
        }
    }

    /// Build a shared HTTP client carrying the configured timeout.
    pub fn http_client(&self) -> Result<reqwest::Client, ClientError> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .build()
            .map_err(ClientError::from)
    }
}
