//! `gudang-transfer` — inter-warehouse stock transfers ("mutations").
//!
//! Two-phase: dispatch debits the source immediately and leaves the record
//! `pending`; the destination is credited only on receive (with the actual
//! received quantity), or the source is restored on reject.

pub mod mutation;
pub mod workflow;

pub use mutation::{StockTransfer, TransferStatus};
pub use workflow::{
    DispatchTransfer, ReceiveTransfer, RejectTransfer, TransferRepository, TransferWorkflow,
};
