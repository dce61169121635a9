use dishbook_core::error::CoreError;
use dishbook_store::StoreError;

use crate::views::Navigation;

/// Every failure a front end can observe from the dish catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// A required form field is missing. Never leaves the form controller.
    #[error("{0}")]
    Validation(String),

    /// Network failure, or a non-2xx response without a readable message.
    #[error("{0}")]
    Transport(String),

    /// A non-2xx response carrying a message from the server.
    #[error("{message}")]
    Remote {
        status: Option<u16>,
        message: String,
    },

    /// The requested dish does not exist.
    #[error("Dish not found: {0}")]
    NotFound(String),

    /// No signed-in session; protected views redirect to sign-in.
    #[error("You must sign in to continue")]
    Unauthenticated,

    /// A submission from this form is already outstanding.
    #[error("A save is already in progress")]
    InFlight,

    /// The view closed (or moved on) before the response arrived.
    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Text shown to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether the server rejected the caller's credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Remote { status: Some(401), .. })
    }

    /// Where a front end should go in response to this error, if anywhere.
    pub fn redirect(&self) -> Option<Navigation> {
        match self {
            Self::Unauthenticated => Some(Navigation::SignIn),
            _ => None,
        }
    }
}

impl From<StoreError> for ClientError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Api { status, message } => Self::Remote {
                status: Some(status),
                message,
            },
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::NotFound { id, .. } => Self::NotFound(id),
            CoreError::Unauthorized(_) => Self::Unauthenticated,
            CoreError::Internal(msg) => Self::Transport(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_api_error_becomes_remote() {
        let err = ClientError::from(StoreError::Api {
            status: 401,
            message: "JWT expired".into(),
        });
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "JWT expired");
    }

    #[test]
    fn validation_message_is_bare() {
        let err = ClientError::from(CoreError::Validation("Dish name is required".into()));
        assert_eq!(err.to_string(), "Dish name is required");
    }

    #[test]
    fn only_unauthenticated_redirects() {
        assert_eq!(ClientError::Unauthenticated.redirect(), Some(Navigation::SignIn));
        assert_eq!(ClientError::Transport("x".into()).redirect(), None);
    }
}
