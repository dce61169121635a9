//! Request/response plumbing shared by the table, bucket and auth clients.

use reqwest::RequestBuilder;

use crate::config::StoreConfig;
use crate::error::StoreError;

/// Body keys inspected, in order, for a human-readable error message.
const MESSAGE_KEYS: &[&str] = &["message", "error_description", "msg", "error"];

/// Attach the `apikey` header and a bearer token. Without a user token the
/// api key itself is the bearer (service-role access).
pub(crate) fn authorize(
    request: RequestBuilder,
    config: &StoreConfig,
    token: Option<&str>,
) -> RequestBuilder {
    request
        .header("apikey", &config.api_key)
        .bearer_auth(token.unwrap_or(&config.api_key))
}

/// Returns the response unchanged on success, or a [`StoreError::Api`]
/// carrying the status and the extracted message on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(StoreError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, StoreError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

/// Assert the response has a success status code, discarding the body.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<(), StoreError> {
    ensure_success(response).await?;
    Ok(())
}

/// Pull a message out of a JSON error body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in MESSAGE_KEYS {
            if let Some(serde_json::Value::String(msg)) = map.get(*key) {
                if !msg.is_empty() {
                    return msg.clone();
                }
            }
        }
    }
    if body.trim().is_empty() {
        "<empty body>".to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_key_preferred() {
        let body = r#"{"code":"PGRST116","message":"JSON object requested"}"#;
        assert_eq!(error_message(body), "JSON object requested");
    }

    #[test]
    fn auth_error_description_used() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(error_message(body), "Invalid login credentials");
    }

    #[test]
    fn raw_body_when_not_json() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message("  "), "<empty body>");
    }
}
