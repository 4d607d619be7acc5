use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gudang_core::qty;
use gudang_core::{ActorId, DomainError, DomainResult, Entity, ProductId, TransferId, WarehouseId};

/// Transfer lifecycle. `received` and `rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Pending,
    Received,
    Rejected,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Received => "received",
            TransferStatus::Rejected => "rejected",
        }
    }
}

/// An inter-warehouse transfer record.
///
/// Stock is held at neither warehouse while pending: dispatch already
/// debited the source, and the destination is credited only on receive.
/// Damaged units on receive are shrinkage — they come back nowhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTransfer {
    id: TransferId,
    code: String,
    from_warehouse: WarehouseId,
    to_warehouse: WarehouseId,
    product_id: ProductId,
    quantity: Decimal,
    status: TransferStatus,
    received_qty: Option<Decimal>,
    damaged_qty: Option<Decimal>,
    requested_by: ActorId,
    processed_by: Option<ActorId>,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

impl StockTransfer {
    /// Validate and create a pending transfer.
    pub fn dispatch(
        id: TransferId,
        code: impl Into<String>,
        from_warehouse: WarehouseId,
        to_warehouse: WarehouseId,
        product_id: ProductId,
        quantity: Decimal,
        requested_by: ActorId,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if from_warehouse == to_warehouse {
            return Err(DomainError::conflict(
                "transfer source and destination are the same warehouse",
            ));
        }
        qty::ensure_positive(quantity, "transfer quantity")?;

        Ok(Self {
            id,
            code: code.into(),
            from_warehouse,
            to_warehouse,
            product_id,
            quantity,
            status: TransferStatus::Pending,
            received_qty: None,
            damaged_qty: None,
            requested_by,
            processed_by: None,
            created_at: at,
            processed_at: None,
        })
    }

    fn ensure_pending(&self, attempted: &str) -> DomainResult<()> {
        if self.status != TransferStatus::Pending {
            return Err(DomainError::invalid_transition(format!(
                "cannot {attempted} transfer {}: status is {}, expected pending",
                self.id,
                self.status.as_str()
            )));
        }
        Ok(())
    }

    /// `pending → received`. The received quantity may fall short of the
    /// dispatched quantity (shrinkage); received + damaged may not exceed
    /// it.
    pub fn receive(
        &mut self,
        received_qty: Decimal,
        damaged_qty: Decimal,
        actor: ActorId,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_pending("receive")?;
        qty::ensure_non_negative(received_qty, "received quantity")?;
        qty::ensure_non_negative(damaged_qty, "damaged quantity")?;
        if received_qty + damaged_qty > self.quantity {
            return Err(DomainError::invalid_quantity(format!(
                "received {} + damaged {} exceeds dispatched quantity {}",
                received_qty, damaged_qty, self.quantity
            )));
        }

        self.status = TransferStatus::Received;
        self.received_qty = Some(received_qty);
        self.damaged_qty = Some(damaged_qty);
        self.processed_by = Some(actor);
        self.processed_at = Some(at);
        Ok(())
    }

    /// `pending → rejected`. The caller compensates the source debit.
    pub fn reject(&mut self, actor: ActorId, at: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_pending("reject")?;
        self.status = TransferStatus::Rejected;
        self.processed_by = Some(actor);
        self.processed_at = Some(at);
        Ok(())
    }

    pub fn id_typed(&self) -> TransferId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn from_warehouse(&self) -> WarehouseId {
        self.from_warehouse
    }

    pub fn to_warehouse(&self) -> WarehouseId {
        self.to_warehouse
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn status(&self) -> TransferStatus {
        self.status
    }

    pub fn received_qty(&self) -> Option<Decimal> {
        self.received_qty
    }

    pub fn damaged_qty(&self) -> Option<Decimal> {
        self.damaged_qty
    }

    pub fn requested_by(&self) -> ActorId {
        self.requested_by
    }

    pub fn processed_by(&self) -> Option<ActorId> {
        self.processed_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }
}

impl Entity for StockTransfer {
    type Id = TransferId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
