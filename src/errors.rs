//! Error types for the highroller casino backend
//!
//! One root error with a sub-enum per subsystem, mirroring how the layers are
//! split: configuration, storage, game rules and the HTTP client.

use thiserror::Error;

/// Root error type for all highroller operations
#[derive(Debug, Error)]
pub enum CasinoError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Storage errors shared by every `CasinoStore` implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("No user with id {0}")]
    UnknownUser(i64),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Corrupted document: {0}")]
    CorruptedData(#[from] serde_json::Error),

    #[error("Blocking task failed: {0}")]
    Task(String),
}

/// Rule violations raised by the game engine and the player session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{game}: bet {bet} outside {min}..={max}")]
    BetOutOfRange {
        game: &'static str,
        bet: i64,
        min: i64,
        max: i64,
    },

    #[error("Paylines must be between 1 and {max}, got {lines}")]
    InvalidPaylines { lines: u32, max: u32 },

    #[error("Insufficient balance: {balance} available, {bet} required")]
    InsufficientBalance { balance: i64, bet: i64 },

    #[error("Place at least one bet")]
    NoBets,

    #[error("Unknown roulette bet: {0}")]
    UnknownBet(String),

    #[error("Hand already finished")]
    HandFinished,

    #[error("Deck exhausted")]
    DeckExhausted,
}

/// Errors surfaced by the HTTP client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    /// HTTP status of an API error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type CasinoResult<T> = Result<T, CasinoError>;
pub type ConfigResult<T> = Result<T, ConfigurationError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type RuleResult<T> = Result<T, GameError>;
pub type ClientResult<T> = Result<T, ClientError>;
