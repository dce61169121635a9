//! Domain types and pure helpers shared by the dishbook client, the
//! mutation API server and the CLI.

pub mod dish;
pub mod error;
pub mod ingredients;
pub mod photo;
pub mod search;
pub mod storage;
pub mod types;
