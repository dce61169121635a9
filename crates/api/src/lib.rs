//! Dish mutation API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes) so
//! integration tests and the binary entrypoint can both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod images;
pub mod repository;
pub mod router;
pub mod routes;
pub mod state;
