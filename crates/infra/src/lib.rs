//! Infrastructure layer: record repositories, document codes, archival
//! guards, and the cross-crate integration tests for the whole ledger.

pub mod archival;
pub mod codes;
pub mod repos;

#[cfg(test)]
mod integration_tests;

pub use archival::Archival;
pub use codes::CodeSequencer;
pub use repos::{
    InMemoryIssueRepository, InMemoryOpnameRepository, InMemoryReceiptRepository,
    InMemoryRepository, InMemoryTransferRepository,
};
