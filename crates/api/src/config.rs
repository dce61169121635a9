use std::path::PathBuf;

use dishbook_store::config::SERVICE_ROLE_KEY_VAR;
use dishbook_store::StoreConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Without
/// `SUPABASE_URL` the server keeps dishes in memory and photos on disk.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// Directory holding photos when no hosted store is configured.
    pub image_dir: PathBuf,
    /// Base URL used to build links to locally stored photos.
    pub public_base_url: String,
    /// Hosted store, accessed with the service-role key.
    pub store: Option<StoreConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                   |
    /// |-----------------------------|---------------------------|
    /// | `HOST`                      | `0.0.0.0`                 |
    /// | `PORT`                      | `8000`                    |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`   |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                      |
    /// | `MAX_UPLOAD_BYTES`          | `10485760`                |
    /// | `IMAGE_DIR`                 | `storage/images`          |
    /// | `PUBLIC_BASE_URL`           | `http://localhost:{PORT}` |
    /// | `SUPABASE_URL`              | unset (local storage)     |
    /// | `SUPABASE_SERVICE_ROLE_KEY` | required with the URL     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "10485760".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let image_dir = PathBuf::from(
            std::env::var("IMAGE_DIR").unwrap_or_else(|_| "storage/images".into()),
        );

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let store = StoreConfig::from_env_optional(SERVICE_ROLE_KEY_VAR)
            .expect("SUPABASE_SERVICE_ROLE_KEY must be set when SUPABASE_URL is");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            image_dir,
            public_base_url,
            store,
        }
    }
}
