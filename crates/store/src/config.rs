use crate::error::StoreError;

/// Environment variable holding the store base URL.
pub const URL_VAR: &str = "SUPABASE_URL";

/// Environment variable holding the public (anon) key used by clients.
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Environment variable holding the service-role key used by the server.
pub const SERVICE_ROLE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Connection details for the hosted store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL without a trailing slash, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Key sent as `apikey` on every request.
    pub api_key: String,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Load from [`URL_VAR`] and the given key variable.
    ///
    /// | Env Var        | Required |
    /// |----------------|----------|
    /// | `SUPABASE_URL` | yes      |
    /// | `key_var`      | yes      |
    pub fn from_env(key_var: &str) -> Result<Self, StoreError> {
        let url = read_var(URL_VAR)?;
        let api_key = read_var(key_var)?;
        Ok(Self::new(url, api_key))
    }

    /// Like [`from_env`](Self::from_env) but `Ok(None)` when the store URL
    /// is not configured at all.
    pub fn from_env_optional(key_var: &str) -> Result<Option<Self>, StoreError> {
        match std::env::var(URL_VAR) {
            Ok(url) if !url.trim().is_empty() => Ok(Some(Self::new(url, read_var(key_var)?))),
            _ => Ok(None),
        }
    }

    /// Absolute URL for a path below the store root.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }
}

fn read_var(name: &str) -> Result<String, StoreError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(StoreError::Config(format!("{name} must be set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = StoreConfig::new("https://abc.supabase.co/", "key");
        assert_eq!(config.url, "https://abc.supabase.co");
        assert_eq!(
            config.endpoint("/rest/v1/dishes"),
            "https://abc.supabase.co/rest/v1/dishes"
        );
    }
}
