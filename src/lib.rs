//! KSC ledger simulator: a single-node, proof-of-work ledger with gas fees,
//! a capped supply and a randomly drifting exchange rate.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod service;
pub mod transaction;

pub use blockchain::{Block, Blockchain};
pub use error::{LedgerError, Result};
pub use transaction::{Speed, Transaction};
