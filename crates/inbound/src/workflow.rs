//! Inbound receipt orchestration.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gudang_core::{
    ActorId, ProductId, ReceiptId, Reference, ReferenceType, SupplierId, WarehouseId,
};
use gudang_ledger::{LedgerResult, LedgerStore, MutationEngine, MutationRequest, StockBalance};
use gudang_masters::Directory;

use crate::receipt::InboundReceipt;

/// Storage seam for receipt records. Receipts have no state machine, so a
/// plain insert/get interface suffices.
pub trait ReceiptRepository: Send + Sync {
    fn allocate_id(&self) -> ReceiptId;
    fn insert(&self, receipt: InboundReceipt);
    fn get(&self, id: ReceiptId) -> Option<InboundReceipt>;
}

impl<R> ReceiptRepository for Arc<R>
where
    R: ReceiptRepository + ?Sized,
{
    fn allocate_id(&self) -> ReceiptId {
        (**self).allocate_id()
    }

    fn insert(&self, receipt: InboundReceipt) {
        (**self).insert(receipt)
    }

    fn get(&self, id: ReceiptId) -> Option<InboundReceipt> {
        (**self).get(id)
    }
}

/// Command: receive goods from a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveInbound {
    pub code: String,
    pub supplier_id: SupplierId,
    pub warehouse_id: WarehouseId,
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub receipt_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub actor_id: ActorId,
}

/// Inbound workflow: masters validation, one `inbound` credit, one record.
#[derive(Debug, Clone)]
pub struct InboundWorkflow<S, D, R> {
    engine: MutationEngine<S, D>,
    directory: D,
    repo: R,
}

impl<S, D, R> InboundWorkflow<S, D, R>
where
    S: LedgerStore + Clone,
    D: Directory + Clone,
    R: ReceiptRepository,
{
    pub fn new(store: S, directory: D, repo: R) -> Self {
        Self {
            engine: MutationEngine::new(store, directory.clone()),
            directory,
            repo,
        }
    }

    pub fn receive(&self, cmd: ReceiveInbound) -> LedgerResult<(InboundReceipt, StockBalance)> {
        self.directory.ensure_active_supplier(cmd.supplier_id)?;
        self.directory.ensure_active_warehouse(cmd.warehouse_id)?;
        self.directory.ensure_active_product(cmd.product_id)?;

        let id = self.repo.allocate_id();
        let receipt = InboundReceipt::new(
            id,
            cmd.code,
            cmd.supplier_id,
            cmd.warehouse_id,
            cmd.product_id,
            cmd.quantity,
            cmd.receipt_date,
            cmd.notes.clone(),
            cmd.actor_id,
            Utc::now(),
        )?;

        let balance = self.engine.apply(MutationRequest {
            warehouse_id: cmd.warehouse_id,
            product_id: cmd.product_id,
            delta_qty: cmd.quantity,
            reference: Reference::new(ReferenceType::Inbound, id.value(), receipt.code()),
            notes: cmd.notes,
            actor_id: cmd.actor_id,
        })?;
        self.repo.insert(receipt.clone());

        tracing::info!(
            receipt_id = id.value(),
            code = receipt.code(),
            warehouse_id = cmd.warehouse_id.value(),
            qty = %cmd.quantity,
            "inbound receipt posted"
        );
        Ok((receipt, balance))
    }

    pub fn get(&self, id: ReceiptId) -> Option<InboundReceipt> {
        self.repo.get(id)
    }
}
