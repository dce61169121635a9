//! Wiring: configuration, sign-in and the reader/writer pair.

use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use dishbook_client::{
    AuthGate, Authenticator, ClientConfig, DevAuthenticator, DishApi, DishReader, DishWriter,
    StoreAuthenticator, StoreReader,
};
use dishbook_store::{AuthApi, DishTable};

/// Email used against the bundled server when none is given.
const DEV_EMAIL: &str = "dev@localhost";

/// Everything a command needs.
pub struct Context {
    pub gate: Arc<AuthGate>,
    pub reader: Arc<dyn DishReader>,
    pub writer: Arc<dyn DishWriter>,
}

impl Context {
    /// Load configuration and sign in. With a hosted store configured,
    /// reads and sign-in go to the store and credentials are required;
    /// otherwise everything goes to the mutation API with a development
    /// session.
    pub async fn connect(
        api_url: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self> {
        let mut config = ClientConfig::from_env().context("Invalid client configuration")?;
        if let Some(url) = api_url {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        let http = config.http_client()?;
        let api = Arc::new(DishApi::with_client(http.clone(), config.api_url.clone()));

        let (authenticator, reader, email): (Arc<dyn Authenticator>, Arc<dyn DishReader>, &str) =
            match &config.store {
                Some(store) => {
                    let Some(email) = email else {
                        bail!("DISHBOOK_EMAIL is required when SUPABASE_URL is set");
                    };
                    (
                        Arc::new(StoreAuthenticator::new(AuthApi::with_client(
                            http.clone(),
                            store.clone(),
                        ))),
                        Arc::new(StoreReader::new(DishTable::with_client(http, store.clone()))),
                        email,
                    )
                }
                None => (
                    Arc::new(DevAuthenticator),
                    api.clone(),
                    email.unwrap_or(DEV_EMAIL),
                ),
            };

        let gate = Arc::new(AuthGate::new(authenticator));
        gate.on_session_expired(|| tracing::warn!("Session expired; sign in again"));
        gate.sign_in(email, password.unwrap_or_default())
            .await
            .context("Sign-in failed")?;
        tracing::debug!(api_url = %config.api_url, store = config.store.is_some(), "Connected");

        Ok(Self {
            gate,
            reader,
            writer: api,
        })
    }
}
