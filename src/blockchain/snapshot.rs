//! Whole-ledger snapshot file.
//!
//! Saving overwrites the file through a temporary sibling plus rename;
//! loading tolerates missing keys so older files stay readable.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::Block;
use crate::error::Result;
use crate::transaction::Transaction;

/// Snapshot as read back from disk. Absent keys are `None`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ksc_to_eur_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_transactions: Option<Vec<Transaction>>,
}

/// Borrowed view used when writing, so saving never clones the chain.
#[derive(Serialize)]
pub struct SnapshotRef<'a> {
    pub ksc_to_eur_rate: f64,
    pub accounts: &'a BTreeMap<String, f64>,
    pub chain: &'a [Block],
    pub pending_transactions: &'a [Transaction],
}

impl Snapshot {
    /// Read a snapshot. A missing file is `Ok(None)`, not an error.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            debug!("snapshot {} not found", path.display());
            return Ok(None);
        }
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        Ok(Some(snapshot))
    }

    /// Raw JSON contents, for read-only queries that echo the file back.
    pub fn read_value(path: &Path) -> Result<Option<serde_json::Value>> {
        if !path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(path)?);
        Ok(Some(serde_json::from_reader(reader)?))
    }
}

impl SnapshotRef<'_> {
    /// Write to `<path>.tmp`, then rename over `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        let tmp = tmp_path(path);
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        debug!(
            "snapshot written to {} ({} blocks, {} pending)",
            path.display(),
            self.chain.len(),
            self.pending_transactions.len()
        );
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
