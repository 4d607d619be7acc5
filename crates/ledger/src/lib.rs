//! `gudang-ledger` — the stock ledger core.
//!
//! Holds the per-(warehouse, product) balance rows, the append-only stock
//! history, and the two components every transaction workflow goes through:
//! the [`MutationEngine`] (the single write path, serialized per pair) and
//! the [`AvailabilityChecker`] (advisory read path).

pub mod availability;
pub mod balance;
pub mod engine;
pub mod history;
pub mod memory;
pub mod store;

pub use availability::{AvailabilityChecker, StockInfo};
pub use balance::StockBalance;
pub use engine::{
    ConsumeRequest, EarmarkRequest, LedgerError, LedgerResult, MutationEngine, MutationRequest,
};
pub use history::{HistoryDraft, StockHistory};
pub use memory::InMemoryLedgerStore;
pub use store::{BalanceTxn, LedgerStore, StoreError};
