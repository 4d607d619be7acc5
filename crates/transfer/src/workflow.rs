//! Transfer orchestration over the mutation engine.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gudang_core::{ActorId, DomainError, ProductId, Reference, ReferenceType, TransferId, WarehouseId};
use gudang_ledger::{
    AvailabilityChecker, LedgerResult, LedgerStore, MutationEngine, MutationRequest,
};
use gudang_masters::Directory;

use crate::mutation::StockTransfer;

/// Storage seam for transfer records.
///
/// `with_transfer` must run its closure on an exclusive working copy of the
/// record and commit it only on `Ok`, so a failed leg (e.g. a rejected
/// engine movement) leaves the record untouched.
pub trait TransferRepository: Send + Sync {
    fn allocate_id(&self) -> TransferId;
    fn insert(&self, transfer: StockTransfer);
    fn get(&self, id: TransferId) -> Option<StockTransfer>;

    fn with_transfer<T, F>(&self, id: TransferId, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut StockTransfer) -> LedgerResult<T>;
}

impl<R> TransferRepository for Arc<R>
where
    R: TransferRepository + ?Sized,
{
    fn allocate_id(&self) -> TransferId {
        (**self).allocate_id()
    }

    fn insert(&self, transfer: StockTransfer) {
        (**self).insert(transfer)
    }

    fn get(&self, id: TransferId) -> Option<StockTransfer> {
        (**self).get(id)
    }

    fn with_transfer<T, F>(&self, id: TransferId, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut StockTransfer) -> LedgerResult<T>,
    {
        (**self).with_transfer(id, f)
    }
}

/// Command: create a transfer and debit the source warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchTransfer {
    pub code: String,
    pub from_warehouse: WarehouseId,
    pub to_warehouse: WarehouseId,
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub notes: Option<String>,
    pub actor_id: ActorId,
}

/// Command: credit the destination with what actually arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveTransfer {
    pub transfer_id: TransferId,
    pub received_qty: Decimal,
    pub damaged_qty: Decimal,
    pub notes: Option<String>,
    pub actor_id: ActorId,
}

/// Command: refuse the transfer and restore the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectTransfer {
    pub transfer_id: TransferId,
    pub notes: Option<String>,
    pub actor_id: ActorId,
}

/// Two-phase transfer workflow: dispatch, then receive or reject.
#[derive(Debug, Clone)]
pub struct TransferWorkflow<S, D, R> {
    engine: MutationEngine<S, D>,
    availability: AvailabilityChecker<S, D>,
    directory: D,
    repo: R,
}

impl<S, D, R> TransferWorkflow<S, D, R>
where
    S: LedgerStore + Clone,
    D: Directory + Clone,
    R: TransferRepository,
{
    pub fn new(store: S, directory: D, repo: R) -> Self {
        Self {
            engine: MutationEngine::new(store.clone(), directory.clone()),
            availability: AvailabilityChecker::new(store, directory.clone()),
            directory,
            repo,
        }
    }

    /// Dispatch: validate, debit the source (`transfer_out`), persist the
    /// pending record. The destination is not credited yet.
    pub fn dispatch(&self, cmd: DispatchTransfer) -> LedgerResult<StockTransfer> {
        self.directory.ensure_active_warehouse(cmd.from_warehouse)?;
        self.directory.ensure_active_warehouse(cmd.to_warehouse)?;
        self.directory.ensure_active_product(cmd.product_id)?;

        let id = self.repo.allocate_id();
        let transfer = StockTransfer::dispatch(
            id,
            cmd.code,
            cmd.from_warehouse,
            cmd.to_warehouse,
            cmd.product_id,
            cmd.quantity,
            cmd.actor_id,
            Utc::now(),
        )?;

        // Advisory sufficiency check; the engine floor stays authoritative
        // under races.
        let info = self
            .availability
            .info(cmd.from_warehouse, cmd.product_id)?;
        if info.available < cmd.quantity {
            return Err(DomainError::insufficient_stock(info.available, cmd.quantity).into());
        }

        self.engine.apply(MutationRequest {
            warehouse_id: cmd.from_warehouse,
            product_id: cmd.product_id,
            delta_qty: -cmd.quantity,
            reference: Reference::new(ReferenceType::TransferOut, id.value(), transfer.code()),
            notes: cmd.notes,
            actor_id: cmd.actor_id,
        })?;
        self.repo.insert(transfer.clone());

        tracing::info!(
            transfer_id = id.value(),
            code = transfer.code(),
            from = cmd.from_warehouse.value(),
            to = cmd.to_warehouse.value(),
            qty = %cmd.quantity,
            "transfer dispatched"
        );
        Ok(transfer)
    }

    /// Receive: `pending → received`, crediting the destination with the
    /// received quantity (not the dispatched one). Damaged units are
    /// shrinkage and come back nowhere.
    pub fn receive(&self, cmd: ReceiveTransfer) -> LedgerResult<StockTransfer> {
        let updated = self.repo.with_transfer(cmd.transfer_id, |transfer| {
            transfer.receive(cmd.received_qty, cmd.damaged_qty, cmd.actor_id, Utc::now())?;

            // A total loss (received 0) moves no stock at the destination.
            if cmd.received_qty > Decimal::ZERO {
                self.engine.apply(MutationRequest {
                    warehouse_id: transfer.to_warehouse(),
                    product_id: transfer.product_id(),
                    delta_qty: cmd.received_qty,
                    reference: Reference::new(
                        ReferenceType::TransferIn,
                        transfer.id_typed().value(),
                        transfer.code(),
                    ),
                    notes: cmd.notes.clone(),
                    actor_id: cmd.actor_id,
                })?;
            }
            Ok(transfer.clone())
        })?;

        tracing::info!(
            transfer_id = cmd.transfer_id.value(),
            received = %cmd.received_qty,
            damaged = %cmd.damaged_qty,
            "transfer received"
        );
        Ok(updated)
    }

    /// Reject: `pending → rejected`, restoring the held quantity at the
    /// source with a compensating `transfer_out` credit.
    pub fn reject(&self, cmd: RejectTransfer) -> LedgerResult<StockTransfer> {
        let updated = self.repo.with_transfer(cmd.transfer_id, |transfer| {
            transfer.reject(cmd.actor_id, Utc::now())?;

            self.engine.apply(MutationRequest {
                warehouse_id: transfer.from_warehouse(),
                product_id: transfer.product_id(),
                delta_qty: transfer.quantity(),
                reference: Reference::new(
                    ReferenceType::TransferOut,
                    transfer.id_typed().value(),
                    transfer.code(),
                ),
                notes: cmd
                    .notes
                    .clone()
                    .or_else(|| Some("transfer rejected; stock returned to source".to_string())),
                actor_id: cmd.actor_id,
            })?;
            Ok(transfer.clone())
        })?;

        tracing::info!(transfer_id = cmd.transfer_id.value(), "transfer rejected");
        Ok(updated)
    }

    pub fn get(&self, id: TransferId) -> Option<StockTransfer> {
        self.repo.get(id)
    }
}
