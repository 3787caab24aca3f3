//! Error taxonomy for the ledger engine and its boundary operations.

use thiserror::Error;

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient funds for {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: String,
        required: f64,
        available: f64,
    },

    #[error("unknown sender account: {0}")]
    UnknownSender(String),

    #[error("mining reward {reward} would exceed max supply {max_supply} (current supply {total_supply})")]
    SupplyExceeded {
        total_supply: f64,
        reward: f64,
        max_supply: f64,
    },

    #[error("proof-of-work search aborted after {attempts} attempts")]
    MiningAborted { attempts: u64 },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("forbidden: invalid admin key")]
    Unauthorized,

    #[error("attribute '{0}' not found")]
    UnknownAttribute(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
