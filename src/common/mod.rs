//! Common types and interfaces
//!
//! Shared by the API service, the stores and the player session.

pub mod traits;
pub mod types;

pub use traits::CasinoStore;
pub use types::*;
