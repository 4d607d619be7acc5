//! `gudang-outbound` — stock issues to customers.
//!
//! Direct issue deducts immediately; the two-phase path earmarks stock
//! first (`reserved`) and either consumes the earmark on commit or returns
//! it on cancel. The engine's floor check stays the final oversell guard
//! in every path.

pub mod issue;
pub mod workflow;

pub use issue::{IssueStatus, OutboundIssue};
pub use workflow::{
    CancelReservation, CommitReservation, IssueOutbound, IssueRepository, OutboundWorkflow,
    ReserveOutbound,
};
