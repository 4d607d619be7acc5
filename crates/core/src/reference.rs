//! Ledger reference vocabulary.
//!
//! Every stock history row points back at the transaction that caused it via
//! a (type, id, code) triple. The id is the causing record's integer id; the
//! code is its human-readable document code (e.g. `TRF-000001`).

use serde::{Deserialize, Serialize};

/// Kind of transaction a history row originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    Inbound,
    Outbound,
    TransferOut,
    TransferIn,
    Adjustment,
    Reservation,
    Release,
}

impl ReferenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceType::Inbound => "inbound",
            ReferenceType::Outbound => "outbound",
            ReferenceType::TransferOut => "transfer_out",
            ReferenceType::TransferIn => "transfer_in",
            ReferenceType::Adjustment => "adjustment",
            ReferenceType::Reservation => "reservation",
            ReferenceType::Release => "release",
        }
    }

    /// Only adjustments may drive the on-hand quantity below zero
    /// (transiently, during a count reconciliation).
    pub fn relaxes_floor(self) -> bool {
        matches!(self, ReferenceType::Adjustment)
    }

    /// Earmark movements change the reserved split, not the on-hand
    /// quantity; they are excluded when reconstructing on-hand from history.
    pub fn is_earmark(self) -> bool {
        matches!(self, ReferenceType::Reservation | ReferenceType::Release)
    }
}

impl core::fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link from a history row back to the causing transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference_type: ReferenceType,
    pub reference_id: i64,
    pub code: String,
}

impl Reference {
    pub fn new(reference_type: ReferenceType, reference_id: i64, code: impl Into<String>) -> Self {
        Self {
            reference_type,
            reference_id,
            code: code.into(),
        }
    }
}
