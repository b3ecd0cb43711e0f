//! Sunin hotel API server library.
//!
//! Exposes config, state, error mapping, routes and the router builder so
//! integration tests and the binary entrypoint share one middleware stack.

pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod router;
pub mod routes;
pub mod seed;
pub mod state;
