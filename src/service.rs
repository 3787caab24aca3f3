//! Boundary operations exposed to the request-routing layer.
//!
//! Status and snapshot queries read the persisted file, not the live
//! ledger, so they report what a restart would see.

use log::{info, warn};
use serde::Serialize;
use serde_json::{Value, json};
use std::path::Path;

use crate::blockchain::{Blockchain, Snapshot};
use crate::error::{LedgerError, Result};
use crate::transaction::{Transaction, parse_amount};

pub const CRYPTO_NAME: &str = "KerogsCoin";
pub const CRYPTO_SYMBOL: &str = "KSC";
pub const BLOCKCHAIN_VERSION: &str = "1.1.0";
pub const API_VERSION: &str = "1.0.0";
pub const GITHUB_VERSION: &str = "1.1.2-beta";
pub const GITHUB_REPO: &str = "https://github.com/kerogs/blockchain";

/// General status: snapshot existence, stored rate and identity constants.
pub fn status_info(state_file: &Path) -> Result<Value> {
    let (exists, crypto_value) = match Snapshot::read(state_file)? {
        Some(snapshot) => (
            true,
            snapshot
                .ksc_to_eur_rate
                .map(Value::from)
                .unwrap_or_else(|| Value::from("Not available, no blockchain data found.")),
        ),
        None => (false, Value::Null),
    };

    Ok(json!({
        "status": "API is running",
        "github_version": GITHUB_VERSION,
        "github_repo": GITHUB_REPO,
        "blockchain": {
            "version": BLOCKCHAIN_VERSION,
            "attributes": {
                "exist": exists,
                "crypto": {
                    "cryptoName": CRYPTO_NAME,
                    "cryptoSymbol": CRYPTO_SYMBOL,
                    "crypto_value": crypto_value,
                },
            },
        },
        "api": {
            "version": API_VERSION,
        },
    }))
}

/// One category of `status_info`: blockchain, api, crypto or github.
pub fn info_attribute(state_file: &Path, attr: &str) -> Result<Value> {
    let info = status_info(state_file)?;
    match attr {
        "blockchain" => Ok(info["blockchain"].clone()),
        "api" => Ok(info["api"].clone()),
        "crypto" => Ok(info["blockchain"]["attributes"]["crypto"].clone()),
        "github" => Ok(json!({ "github_repo": info["github_repo"] })),
        other => Err(LedgerError::UnknownAttribute(other.to_string())),
    }
}

/// Raw snapshot contents, or a not-found marker when no file exists.
pub fn snapshot_contents(state_file: &Path) -> Result<Value> {
    Ok(match Snapshot::read_value(state_file)? {
        Some(contents) => json!({
            "blockchain_exist": true,
            "attributes": contents,
        }),
        None => json!({
            "blockchain_exist": false,
            "attributes": "No blockchain data found.",
        }),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GiveEcho {
    pub to: String,
    pub amount: f64,
}

/// Per-step outcome of a give request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GiveOutcome {
    pub transaction: bool,
    /// Always true in a returned outcome: a failed save is an `Err` instead.
    #[serde(rename = "data")]
    pub saved: bool,
    pub mine: bool,
    pub attributes: GiveEcho,
}

/// Authenticate, transfer from the operator account to `address`,
/// save, then mine as the operator.
///
/// Authentication and amount parsing fail before the ledger is touched.
/// Snapshot I/O failures propagate.
pub fn give(
    ledger: &mut Blockchain,
    admin_key: Option<&str>,
    operator: &str,
    presented_key: &str,
    address: &str,
    raw_amount: &str,
) -> Result<GiveOutcome> {
    if admin_key != Some(presented_key) {
        warn!("give rejected: invalid admin key");
        return Err(LedgerError::Unauthorized);
    }
    let amount = parse_amount(raw_amount)?;

    let transaction = ledger.add_transaction(Transaction::new(operator, address, amount));
    ledger.save_state()?;
    let mine = ledger.mine_pending_transactions(operator);

    info!("give {amount} -> {address}: transaction={transaction} mine={mine}");
    Ok(GiveOutcome {
        transaction,
        saved: true,
        mine,
        attributes: GiveEcho {
            to: address.to_string(),
            amount,
        },
    })
}
