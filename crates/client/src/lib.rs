//! Client-side synchronization for the dish catalog.
//!
//! Front ends build one [`AuthGate`], one reader and one writer, and hand
//! them to the view controllers in [`views`]. Reads go to the hosted store
//! (or the mutation API when no store is configured); writes always go to
//! the mutation API.

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod ports;
pub mod session;
pub mod views;

pub use api::DishApi;
pub use config::ClientConfig;
pub use error::ClientError;
pub use ports::{DishPayload, DishReader, DishWriter, ImageFile, StoreReader};
pub use session::{AuthGate, AuthState, Authenticator, DevAuthenticator, Session, StoreAuthenticator};
