pub mod model;

pub use model::{Speed, Transaction, parse_amount};
pub(crate) use model::check_amount;

/// Share of the amount charged as gas (0.1%).
pub const AMOUNT_FEE_RATE: f64 = 0.001;

/// Extra gas paid by `fast` transactions.
pub const FAST_SURCHARGE: f64 = 0.002;
