//! Highroller - casino backend
//!
//! HTTP/JSON API over PostgreSQL for accounts, persisted game state and
//! leaderboards, plus the payout rules of every game on the floor: three
//! slot machines, blackjack, roulette, baccarat and video poker.

pub mod achievements;
pub mod api;
pub mod client;
pub mod common;
pub mod config;
pub mod db;
pub mod errors;
pub mod games;
pub mod session;
pub mod storage;

pub use errors::{CasinoError, CasinoResult};

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "highroller=info,tower_http=info";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Calling this twice is harmless.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .try_init();
}
