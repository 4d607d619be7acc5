//! `gudang-inbound` — supplier receipts into a warehouse.
//!
//! Thin wrapper over the mutation engine: validate the masters and the
//! receipt date, credit the warehouse, persist the receipt record.

pub mod receipt;
pub mod workflow;

pub use receipt::InboundReceipt;
pub use workflow::{InboundWorkflow, ReceiptRepository, ReceiveInbound};
