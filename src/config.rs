//! Ledger parameters and server settings.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::blockchain::DEFAULT_DIFFICULTY;
use crate::error::{LedgerError, Result};

/// Account pre-funded at construction; also mines for the HTTP service.
pub const MINER_ACCOUNT: &str = "kerogscoinminer";

/// Reserved sender of block reward transactions.
pub const SYSTEM_ACCOUNT: &str = "System";

pub const DEFAULT_STATE_FILE: &str = "blockchain_state.json";

/// How balances react when a block is sealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Settlement {
    /// Senders are debited on submission and nobody is ever credited.
    #[default]
    DebitOnly,
    /// On sealing, every recipient in the block (miner included) is
    /// credited with the amount. Gas fees are burned.
    CreditOnMine,
}

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub difficulty: u32,
    pub reward: f64,
    pub max_supply: f64,
    pub gas_fee: f64,
    pub initial_balance: f64,
    pub ksc_to_eur_rate: f64,
    pub state_file: PathBuf,
    pub miner_account: String,
    /// Upper bound on PoW hashes per block; `None` searches forever.
    pub mining_limit: Option<u64>,
    pub settlement: Settlement,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            reward: 0.0001,
            max_supply: 21_000_000.0,
            gas_fee: 0.1,
            initial_balance: 100.0,
            ksc_to_eur_rate: 0.12,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            miner_account: MINER_ACCOUNT.to_string(),
            mining_limit: None,
            settlement: Settlement::DebitOnly,
        }
    }
}

impl LedgerConfig {
    /// Parameters used by the HTTP service.
    pub fn server_defaults() -> Self {
        Self {
            max_supply: 200.0,
            initial_balance: 200.0,
            gas_fee: 0.01,
            ..Self::default()
        }
    }
}

/// Process-level settings, read from the environment (`main` loads `.env` first).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Shared secret for the give operation. `None` rejects every request.
    pub admin_key: Option<String>,
    pub ledger: LedgerConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let mut ledger = LedgerConfig::server_defaults();
        if let Some(path) = var("KSC_STATE_FILE") {
            ledger.state_file = PathBuf::from(path);
        }
        if let Some(difficulty) = parsed_var("KSC_DIFFICULTY")? {
            ledger.difficulty = difficulty;
        }

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed_var("PORT")?.unwrap_or(8080),
            admin_key: var("KSC_ADMIN_KEY"),
            ledger,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: FromStr>(key: &str) -> Result<Option<T>> {
    match var(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| LedgerError::Config(format!("{key}='{raw}' is not valid"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults_override_supply_and_fees() {
        let cfg = LedgerConfig::server_defaults();
        assert_eq!(cfg.max_supply, 200.0);
        assert_eq!(cfg.initial_balance, 200.0);
        assert_eq!(cfg.gas_fee, 0.01);
        assert_eq!(cfg.reward, LedgerConfig::default().reward);
        assert_eq!(cfg.miner_account, MINER_ACCOUNT);
    }

    #[test]
    fn unparsable_values_are_config_errors() {
        // Key is unique to this test to avoid clashing with parallel tests.
        unsafe { env::set_var("KSC_TEST_BAD_PORT", "eighty") };
        let res: Result<Option<u16>> = parsed_var("KSC_TEST_BAD_PORT");
        assert!(matches!(res, Err(LedgerError::Config(_))));
        unsafe { env::remove_var("KSC_TEST_BAD_PORT") };
        assert_eq!(parsed_var::<u16>("KSC_TEST_BAD_PORT").unwrap(), None);
    }
}
