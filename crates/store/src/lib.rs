//! REST clients for the hosted store that holds dish records, dish photos
//! and user sessions.
//!
//! Provides the `dishes` table API, an object storage bucket and the
//! password auth API, all over [`reqwest`].

pub mod auth;
pub mod bucket;
pub mod config;
pub mod error;
mod rest;
pub mod table;

pub use auth::{AuthApi, AuthSession, AuthUser};
pub use bucket::StorageBucket;
pub use config::StoreConfig;
pub use error::StoreError;
pub use table::DishTable;
