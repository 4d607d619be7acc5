use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gudang_core::qty;
use gudang_core::{
    ActorId, DomainError, DomainResult, Entity, ProductId, ReceiptId, SupplierId, WarehouseId,
};

/// A goods receipt from a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundReceipt {
    id: ReceiptId,
    code: String,
    supplier_id: SupplierId,
    warehouse_id: WarehouseId,
    product_id: ProductId,
    quantity: Decimal,
    /// When the goods physically arrived; may not lie in the future.
    receipt_date: DateTime<Utc>,
    notes: Option<String>,
    received_by: ActorId,
    created_at: DateTime<Utc>,
}

impl InboundReceipt {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ReceiptId,
        code: impl Into<String>,
        supplier_id: SupplierId,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        quantity: Decimal,
        receipt_date: DateTime<Utc>,
        notes: Option<String>,
        received_by: ActorId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        qty::ensure_positive(quantity, "receipt quantity")?;
        if receipt_date > now {
            return Err(DomainError::conflict(format!(
                "receipt date {receipt_date} lies in the future"
            )));
        }

        Ok(Self {
            id,
            code: code.into(),
            supplier_id,
            warehouse_id,
            product_id,
            quantity,
            receipt_date,
            notes,
            received_by,
            created_at: now,
        })
    }

    pub fn id_typed(&self) -> ReceiptId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.supplier_id
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn receipt_date(&self) -> DateTime<Utc> {
        self.receipt_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn received_by(&self) -> ActorId {
        self.received_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for InboundReceipt {
    type Id = ReceiptId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
