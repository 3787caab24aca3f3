use log::{info, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::rate::{self, RateAdjustment};
use super::snapshot::{Snapshot, SnapshotRef};
use super::{Block, GENESIS_PREVIOUS_HASH};
use crate::config::{LedgerConfig, SYSTEM_ACCOUNT, Settlement};
use crate::error::{LedgerError, Result};
use crate::transaction::{Transaction, check_amount};

/// Single-node ledger: chain, balances, pending queue and exchange rate.
///
/// One instance owns all of its state; callers sharing it across threads
/// must wrap the whole value in a lock.
pub struct Blockchain {
    pub chain: Vec<Block>,
    pub pending_transactions: Vec<Transaction>,
    pub accounts: BTreeMap<String, f64>,
    pub difficulty: u32,
    pub reward: f64,
    pub max_supply: f64,
    pub total_supply: f64,
    pub gas_fee: f64,
    pub ksc_to_eur_rate: f64,
    pub state_file: PathBuf,
    miner_account: String,
    mining_limit: Option<u64>,
    settlement: Settlement,
    rng: Box<dyn RngCore + Send>,
}

impl Blockchain {
    /// Initialize a ledger with a pre-funded miner and a genesis block.
    pub fn new(config: LedgerConfig) -> Self {
        let mut bc = Self {
            chain: Vec::new(),
            pending_transactions: Vec::new(),
            accounts: BTreeMap::from([(config.miner_account.clone(), config.initial_balance)]),
            difficulty: config.difficulty,
            reward: config.reward,
            max_supply: config.max_supply,
            total_supply: 0.0,
            gas_fee: config.gas_fee,
            ksc_to_eur_rate: config.ksc_to_eur_rate,
            state_file: config.state_file,
            miner_account: config.miner_account,
            mining_limit: config.mining_limit,
            settlement: config.settlement,
            rng: Box::new(StdRng::from_entropy()),
        };
        bc.create_genesis_block();
        bc
    }

    /// Replace the randomness source driving the rate oscillator.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Append the genesis block, unless a chain already exists.
    pub fn create_genesis_block(&mut self) {
        if self.chain.is_empty() {
            self.chain.push(Block::genesis());
            info!("Genesis block created.");
        } else {
            warn!("Genesis block skipped: blockchain already exists.");
        }
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> Option<&Block> {
        self.chain.last()
    }

    /// Index the next mined block will receive.
    pub fn get_next_block_index(&self) -> u64 {
        self.chain.len() as u64
    }

    /// Balance of `address`, 0 for unknown accounts. Never creates one.
    pub fn get_balance(&self, address: &str) -> f64 {
        self.accounts.get(address).copied().unwrap_or(0.0)
    }

    /// Validate and enqueue `tx`, debiting the sender by amount + gas
    /// right away. Returns the gas fee charged.
    pub fn try_add_transaction(&mut self, tx: Transaction) -> Result<f64> {
        check_amount(tx.amount)?;
        let gas_fee = tx.gas_fee(self.gas_fee);
        let required = tx.amount + gas_fee;

        let Some(balance) = self.accounts.get_mut(&tx.sender) else {
            return Err(LedgerError::UnknownSender(tx.sender));
        };
        if *balance < required {
            return Err(LedgerError::InsufficientFunds {
                account: tx.sender,
                required,
                available: *balance,
            });
        }

        *balance -= required;
        info!("Transaction added: {tx} (gas {gas_fee})");
        self.pending_transactions.push(tx);
        Ok(gas_fee)
    }

    /// Submit `tx`; `false` (with a logged reason) if the sender cannot pay.
    pub fn add_transaction(&mut self, tx: Transaction) -> bool {
        match self.try_add_transaction(tx) {
            Ok(_) => true,
            Err(e) => {
                warn!("Transaction rejected: {e}");
                false
            }
        }
    }

    /// Seal the pending queue plus a reward transaction into a new block.
    ///
    /// The supply cap is checked before anything changes. The rate is
    /// adjusted before the PoW search; if a bounded search gives up, the
    /// chain, supply and queue are left as they were.
    pub fn try_mine(&mut self, miner_address: &str) -> Result<&Block> {
        if self.total_supply + self.reward > self.max_supply {
            return Err(LedgerError::SupplyExceeded {
                total_supply: self.total_supply,
                reward: self.reward,
                max_supply: self.max_supply,
            });
        }

        let mut transactions = self.pending_transactions.clone();
        transactions.push(Transaction::new(SYSTEM_ACCOUNT, miner_address, self.reward));

        self.adjust_ksc_to_eur_rate(transactions.len());

        let previous_hash = self
            .last_block()
            .map(Block::compute_hash)
            .unwrap_or_else(|| GENESIS_PREVIOUS_HASH.to_string());
        let mut block = Block::new(
            self.get_next_block_index(),
            transactions,
            previous_hash,
            self.reward,
        );

        let Some(hash) = block.mine(self.difficulty, self.mining_limit) else {
            return Err(LedgerError::MiningAborted {
                attempts: self.mining_limit.unwrap_or(u64::MAX),
            });
        };

        if self.settlement == Settlement::CreditOnMine {
            for tx in &block.transactions {
                *self.accounts.entry(tx.recipient.clone()).or_insert(0.0) += tx.amount;
            }
        }

        info!(
            "Block #{} mined (hash={}, nonce={}, txs={})",
            block.index,
            hash,
            block.nonce,
            block.transactions.len()
        );
        self.chain.push(block);
        self.total_supply += self.reward;
        self.pending_transactions.clear();
        Ok(&self.chain[self.chain.len() - 1])
    }

    /// Mine the pending queue for `miner_address`; `false` on rejection.
    pub fn mine_pending_transactions(&mut self, miner_address: &str) -> bool {
        match self.try_mine(miner_address) {
            Ok(_) => true,
            Err(e) => {
                warn!("Mining rejected: {e}");
                false
            }
        }
    }

    /// Move the exchange rate once. `pending_len` is the queue depth
    /// including the reward transaction about to be sealed.
    pub fn adjust_ksc_to_eur_rate(&mut self, pending_len: usize) -> RateAdjustment {
        let adj = rate::adjust_rate(self.ksc_to_eur_rate, pending_len, &mut self.rng);
        self.ksc_to_eur_rate = adj.new_rate;
        info!(
            "Adjusted KSC to EUR rate: {:.4} (change: {:.2}%)",
            adj.new_rate,
            adj.total_delta * 100.0
        );
        adj
    }

    /// Convert `ksc_value` to EUR. With `rate_per_k` (KSC per 1000 EUR)
    /// the effective rate is `1000 / rate_per_k`, otherwise the stored one.
    pub fn ksc_to_eur(&self, ksc_value: f64, rate_per_k: Option<f64>) -> f64 {
        let rate = match rate_per_k {
            Some(per_k) => 1000.0 / per_k,
            None => self.ksc_to_eur_rate,
        };
        let eur = ksc_value * rate;
        info!("{ksc_value} KSC = {eur:.2} EUR at {rate:.4} EUR per KSC");
        eur
    }

    /// Persist rate, accounts, chain and pending queue to `state_file`.
    pub fn save_state(&self) -> Result<()> {
        SnapshotRef {
            ksc_to_eur_rate: self.ksc_to_eur_rate,
            accounts: &self.accounts,
            chain: &self.chain,
            pending_transactions: &self.pending_transactions,
        }
        .write(&self.state_file)?;
        info!("State saved to {}.", self.state_file.display());
        Ok(())
    }

    /// Restore from `state_file`. Absent keys keep the in-memory values;
    /// an absent file falls back to genesis bootstrap.
    pub fn load_state(&mut self) -> Result<()> {
        let Some(snapshot) = Snapshot::read(&self.state_file)? else {
            warn!("No previous state found. Starting fresh.");
            self.create_genesis_block();
            return Ok(());
        };

        if let Some(rate) = snapshot.ksc_to_eur_rate {
            self.ksc_to_eur_rate = rate;
        }
        if let Some(accounts) = snapshot.accounts {
            self.accounts = accounts;
        }
        if let Some(chain) = snapshot.chain {
            self.chain = chain;
        }
        if let Some(pending) = snapshot.pending_transactions {
            self.pending_transactions = pending;
        }
        if self.chain.is_empty() {
            self.create_genesis_block();
        }
        self.total_supply = self.minted_supply();
        if !self.is_valid_chain() {
            warn!(
                "Restored chain from {} failed validation (genesis, linkage or PoW)",
                self.state_file.display()
            );
        }

        info!(
            "Blockchain state loaded. Total blocks: {} (supply {})",
            self.chain.len(),
            self.total_supply
        );
        Ok(())
    }

    /// Sum of rewards over every mined (non-genesis) block.
    pub fn minted_supply(&self) -> f64 {
        self.chain
            .iter()
            .filter(|b| !b.is_genesis())
            .map(|b| b.reward)
            .sum()
    }

    /// Validate the entire chain: genesis shape, indices, linkage and PoW.
    pub fn is_valid_chain(&self) -> bool {
        let Some(genesis) = self.chain.first() else {
            return false;
        };
        if genesis.index != 0
            || genesis.previous_hash != GENESIS_PREVIOUS_HASH
            || !genesis.transactions.is_empty()
        {
            return false;
        }

        self.chain.windows(2).all(|pair| {
            let (prev, current) = (&pair[0], &pair[1]);
            current.index == prev.index + 1
                && current.previous_hash == prev.compute_hash()
                && current.is_valid(self.difficulty)
        })
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: u32) {
        // Affects future blocks only.
        self.difficulty = difficulty;
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Account pre-funded at construction.
    pub fn miner_account(&self) -> &str {
        &self.miner_account
    }
}
