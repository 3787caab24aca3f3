use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::{AMOUNT_FEE_RATE, FAST_SURCHARGE};
use crate::error::{LedgerError, Result};

/// Fee-speed tier of a transaction. Unknown tiers are kept verbatim and
/// priced like `normal`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Speed {
    #[default]
    Normal,
    Medium,
    Fast,
    Other(String),
}

impl Speed {
    pub fn as_str(&self) -> &str {
        match self {
            Speed::Normal => "normal",
            Speed::Medium => "medium",
            Speed::Fast => "fast",
            Speed::Other(s) => s,
        }
    }

    /// Speed-dependent part of the gas fee.
    pub fn surcharge(&self) -> f64 {
        match self {
            Speed::Fast => FAST_SURCHARGE,
            _ => 0.0,
        }
    }
}

impl From<String> for Speed {
    fn from(s: String) -> Self {
        match s.as_str() {
            "normal" => Speed::Normal,
            "medium" => Speed::Medium,
            "fast" => Speed::Fast,
            _ => Speed::Other(s),
        }
    }
}

impl From<&str> for Speed {
    fn from(s: &str) -> Self {
        Speed::from(s.to_string())
    }
}

impl From<Speed> for String {
    fn from(speed: Speed) -> Self {
        speed.as_str().to_string()
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An intent to move `amount` from `sender` to `recipient`.
///
/// Account existence and balance are checked on submission, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(default)]
    pub speed: Speed,
}

impl Transaction {
    /// Build a `normal` speed transaction.
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: f64) -> Self {
        Self::with_speed(sender, recipient, amount, Speed::Normal)
    }

    pub fn with_speed(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: f64,
        speed: impl Into<Speed>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
            speed: speed.into(),
        }
    }

    /// Gas fee: `base + amount * 0.1% + speed surcharge`. Never cached.
    pub fn gas_fee(&self, base_gas_fee: f64) -> f64 {
        base_gas_fee + self.amount * AMOUNT_FEE_RATE + self.speed.surcharge()
    }

    /// Amount plus gas, i.e. what the sender must hold to submit.
    pub fn total_required(&self, base_gas_fee: f64) -> f64 {
        self.amount + self.gas_fee(base_gas_fee)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {} KSC (speed: {})",
            self.sender, self.recipient, self.amount, self.speed
        )
    }
}

/// Parse an external amount into the canonical numeric type.
/// Rejects empty, non-numeric, non-finite and negative input.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| LedgerError::InvalidAmount(format!("'{raw}' is not a number")))?;
    check_amount(value)
}

/// Reject non-finite and negative amounts.
pub(crate) fn check_amount(value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(LedgerError::InvalidAmount(format!("{value} is not finite")));
    }
    if value < 0.0 {
        return Err(LedgerError::InvalidAmount(format!("{value} is negative")));
    }
    Ok(value)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

// Older snapshots carry string amounts for some transactions.
fn deserialize_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) => check_amount(n),
        RawAmount::Text(s) => parse_amount(&s),
    };
    parsed.map_err(serde::de::Error::custom)
}
