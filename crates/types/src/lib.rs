mod base;
pub mod bellatrix;
mod bid_payload;
mod blinded;
mod builder_bid;
pub mod capella;
pub mod consensus;
pub mod construct;
pub mod deneb;
mod error;
pub mod extract;
pub mod fields;
mod fork;
mod primitives;
pub mod serde_ext;
#[cfg(test)]
mod test_utils;
pub mod utils;
mod versioned;

pub use base::*;
pub use bid_payload::*;
pub use blinded::*;
pub use builder_bid::*;
pub use construct::*;
pub use error::*;
pub use extract::*;
pub use fields::{
    compute_transactions_root, compute_withdrawals_root, Transaction, Transactions, Withdrawal,
    Withdrawals, EMPTY_WITHDRAWALS_ROOT,
};
pub use fork::*;
pub use primitives::*;
pub use versioned::*;
