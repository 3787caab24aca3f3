use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use super::GENESIS_PREVIOUS_HASH;
use crate::transaction::Transaction;

/// A batch of transactions linked to its predecessor by hash.
/// The hash itself is never stored; it is recomputed from the fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
    pub reward: f64,
    pub timestamp: f64, // Unix seconds (UTC), microsecond precision
    pub nonce: u64,
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self::new(0, Vec::new(), GENESIS_PREVIOUS_HASH.to_string(), 0.0)
    }

    /// Create a new block (not mined yet). Call `mine()` to perform PoW.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        previous_hash: String,
        reward: f64,
    ) -> Self {
        Self::new_with_timestamp(index, transactions, previous_hash, reward, now_secs(), 0)
    }

    pub fn new_with_timestamp(
        index: u64,
        transactions: Vec<Transaction>,
        previous_hash: String,
        reward: f64,
        timestamp: f64,
        nonce: u64,
    ) -> Self {
        Self {
            index,
            transactions,
            previous_hash,
            reward,
            timestamp,
            nonce,
        }
    }

    /// SHA-256 over the key-sorted JSON encoding of every field,
    /// current nonce included. Stable across restarts for equal fields.
    pub fn compute_hash(&self) -> String {
        // serde_json maps are BTreeMaps, so keys come out sorted.
        let preimage = json!({
            "index": self.index,
            "transactions": self.transactions,
            "previous_hash": self.previous_hash,
            "reward": self.reward,
            "timestamp": self.timestamp,
            "nonce": self.nonce,
        });
        let mut hasher = Sha256::new();
        hasher.update(preimage.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Proof-of-Work: bump the nonce until the hash starts with
    /// `difficulty` zero hex digits. With `limit = Some(n)` the search
    /// gives up after `n` hashes and returns `None`, leaving the nonce
    /// where it stopped.
    pub fn mine(&mut self, difficulty: u32, limit: Option<u64>) -> Option<String> {
        let mut attempts: u64 = 0;
        loop {
            let hash = self.compute_hash();
            attempts += 1;
            if meets_difficulty(&hash, difficulty) {
                debug!(
                    "PoW - block #{} sealed after {} attempts (nonce={})",
                    self.index, attempts, self.nonce
                );
                return Some(hash);
            }
            if limit.is_some_and(|max| attempts >= max) {
                debug!(
                    "PoW - block #{} gave up after {} attempts",
                    self.index, attempts
                );
                return None;
            }
            self.nonce = self.nonce.wrapping_add(1);
        }
    }

    /// Whether the block's current hash satisfies `difficulty`.
    /// (Does NOT validate chain linkage.)
    pub fn is_valid(&self, difficulty: u32) -> bool {
        meets_difficulty(&self.compute_hash(), difficulty)
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let needed = difficulty as usize;
    hash.len() >= needed && hash.bytes().take(needed).all(|c| c == b'0')
}

fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
