use crate::blockchain::Blockchain;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Shared application state: one ledger behind one lock, so a submission
/// can never interleave with a mine or a save.
pub struct AppState {
    pub blockchain: Mutex<Blockchain>,
    pub admin_key: Option<String>,
    /// Snapshot path, readable without taking the ledger lock.
    pub state_file: PathBuf,
}

impl AppState {
    pub fn new(blockchain: Blockchain, admin_key: Option<String>) -> Self {
        Self {
            state_file: blockchain.state_file().to_path_buf(),
            blockchain: Mutex::new(blockchain),
            admin_key,
        }
    }

    pub fn ledger(&self) -> MutexGuard<'_, Blockchain> {
        self.blockchain
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub address: String,
    pub balance: f64,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}
