//! HTTP API
//!
//! axum server exposing accounts, game state and leaderboards over JSON.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use handlers::AppState;
pub use server::{build_app, ApiServer};
