pub mod block;
pub mod model;
pub mod rate;
pub mod snapshot;

pub use block::Block;
pub use model::Blockchain;
pub use rate::RateAdjustment;
pub use snapshot::Snapshot;

/// Default Proof-of-Work difficulty (number of leading zeros).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Previous-hash of the genesis block: 64 zero hex digits.
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";
