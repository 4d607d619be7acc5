use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gudang_core::{ActorId, HistoryId, ProductId, Reference, ReferenceType, StockId, WarehouseId};

/// One committed entry in the append-only stock audit trail.
///
/// Immutable once written. For on-hand movements, `previous_qty`/`new_qty`
/// record the on-hand quantity around the change; for earmark movements
/// (`reservation`/`release`) they record the reserved quantity instead, so
/// the earmark trail is auditable without perturbing the on-hand ledger sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockHistory {
    pub id: HistoryId,
    pub stock_id: StockId,
    /// Denormalized from the owning balance for query convenience.
    pub warehouse_id: WarehouseId,
    pub product_id: ProductId,
    pub previous_qty: Decimal,
    pub new_qty: Decimal,
    pub change_qty: Decimal,
    pub reference_type: ReferenceType,
    pub reference_id: i64,
    pub reference_code: String,
    pub notes: Option<String>,
    pub created_by: ActorId,
    pub created_at: DateTime<Utc>,
}

impl StockHistory {
    /// Whether this row moves on-hand quantity (vs. the reserved split).
    pub fn moves_on_hand(&self) -> bool {
        !self.reference_type.is_earmark()
    }
}

/// A history entry staged inside a balance transaction, before the store
/// assigns its id and denormalized columns at commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryDraft {
    pub previous_qty: Decimal,
    pub new_qty: Decimal,
    pub change_qty: Decimal,
    pub reference: Reference,
    pub notes: Option<String>,
    pub created_by: ActorId,
    pub created_at: DateTime<Utc>,
}
