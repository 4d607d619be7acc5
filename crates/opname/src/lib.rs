//! `gudang-opname` — physical stock counts and their reconciliation.
//!
//! An opname snapshots the system quantity at count time, classifies the
//! difference (lebih / kurang / sama), and on approval applies exactly one
//! signed adjustment to the ledger — the only movement allowed past the
//! no-negative-stock floor.

pub mod count;
pub mod workflow;

pub use count::{DifferenceType, Opname, OpnameStatus};
pub use workflow::{ApproveOpname, OpnameRepository, OpnameWorkflow, RecordCount};
