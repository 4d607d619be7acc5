//! The stock mutation engine: the single write path into the ledger.
//!
//! Every balance change in the system — inbound, outbound, transfer legs,
//! opname adjustments, earmarks — goes through one of the entry points
//! here. The engine locks the (warehouse, product) balance row, enforces
//! the stock floor, and persists the new balance together with exactly one
//! audit row per movement, atomically.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gudang_core::qty;
use gudang_core::{
    ActorId, DomainError, ProductId, Reference, ReferenceType, WarehouseId,
};
use gudang_masters::Directory;

use crate::balance::StockBalance;
use crate::history::HistoryDraft;
use crate::store::{LedgerStore, StoreError};

/// Failure of a ledger operation: either a deterministic domain outcome or
/// an infrastructure fault from the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    /// Domain errors are final; store faults may be retried at
    /// workflow-call granularity (the whole operation rolled back, so a
    /// retry cannot double-apply).
    pub fn is_retryable(&self) -> bool {
        match self {
            LedgerError::Domain(_) => false,
            LedgerError::Store(e) => e.is_retryable(),
        }
    }
}

/// Input to [`MutationEngine::apply`]: one signed on-hand movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRequest {
    pub warehouse_id: WarehouseId,
    pub product_id: ProductId,
    /// Signed delta; positive receives stock, negative issues it.
    pub delta_qty: Decimal,
    pub reference: Reference,
    pub notes: Option<String>,
    pub actor_id: ActorId,
}

/// Input to [`MutationEngine::reserve`] / [`MutationEngine::release`]:
/// an earmark movement over the reserved split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarmarkRequest {
    pub warehouse_id: WarehouseId,
    pub product_id: ProductId,
    /// Always positive; the direction comes from the entry point.
    pub qty: Decimal,
    pub reference_id: i64,
    pub reference_code: String,
    pub notes: Option<String>,
    pub actor_id: ActorId,
}

/// Input to [`MutationEngine::consume_reserved`]: turn an earmark into an
/// actual on-hand deduction in one critical section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeRequest {
    pub warehouse_id: WarehouseId,
    pub product_id: ProductId,
    pub qty: Decimal,
    /// Reference for the on-hand movement (e.g. the outbound issue); the
    /// paired release row reuses its id and code.
    pub reference: Reference,
    pub notes: Option<String>,
    pub actor_id: ActorId,
}

/// The single entry point that mutates stock balances.
#[derive(Debug, Clone)]
pub struct MutationEngine<S, D> {
    store: S,
    directory: D,
}

impl<S, D> MutationEngine<S, D> {
    pub fn new(store: S, directory: D) -> Self {
        Self { store, directory }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }
}

impl<S, D> MutationEngine<S, D>
where
    S: LedgerStore,
    D: Directory,
{
    /// Apply one signed on-hand movement.
    ///
    /// Locks the pair's balance row (creating a zero row on first touch),
    /// rejects any non-adjustment movement that would leave available
    /// stock negative, then commits the new balance plus one history row
    /// atomically. Archived warehouses/products are tolerated — history
    /// and compensating movements may reference them; workflows are the
    /// ones that demand active master data.
    pub fn apply(&self, req: MutationRequest) -> LedgerResult<StockBalance> {
        if req.reference.reference_type.is_earmark() {
            return Err(DomainError::conflict(
                "earmark movements go through reserve/release, not apply",
            )
            .into());
        }
        qty::ensure_nonzero(req.delta_qty, "delta_qty")?;
        self.directory.ensure_warehouse(req.warehouse_id)?;
        self.directory.ensure_product(req.product_id)?;

        let relaxed = req.reference.reference_type.relaxes_floor();
        let result = self
            .store
            .with_balance(req.warehouse_id, req.product_id, |txn| {
                let previous = txn.balance().quantity;
                let reserved = txn.balance().reserved_qty;
                let new_qty = previous + req.delta_qty;

                if !relaxed && new_qty - reserved < Decimal::ZERO {
                    return Err(DomainError::insufficient_stock(
                        previous - reserved,
                        req.delta_qty.abs(),
                    ));
                }

                let now = Utc::now();
                txn.write(new_qty, reserved, now, req.actor_id);
                txn.append(HistoryDraft {
                    previous_qty: previous,
                    new_qty,
                    change_qty: req.delta_qty,
                    reference: req.reference.clone(),
                    notes: req.notes.clone(),
                    created_by: req.actor_id,
                    created_at: now,
                });
                Ok(txn.balance().clone())
            });

        match &result {
            Ok(balance) => tracing::info!(
                warehouse_id = req.warehouse_id.value(),
                product_id = req.product_id.value(),
                reference = %req.reference.reference_type,
                reference_code = %req.reference.code,
                delta = %req.delta_qty,
                new_qty = %balance.quantity,
                "stock mutation applied"
            ),
            Err(LedgerError::Domain(DomainError::InsufficientStock { available, requested })) => {
                tracing::warn!(
                    warehouse_id = req.warehouse_id.value(),
                    product_id = req.product_id.value(),
                    reference = %req.reference.reference_type,
                    available = %available,
                    requested = %requested,
                    "stock mutation rejected"
                )
            }
            Err(_) => {}
        }
        result
    }

    /// Earmark available stock for pending work.
    ///
    /// Raises `reserved_qty` without touching the on-hand quantity; fails
    /// with `InsufficientStock` if the available split cannot cover it.
    pub fn reserve(&self, req: EarmarkRequest) -> LedgerResult<StockBalance> {
        qty::ensure_positive(req.qty, "reserve quantity")?;
        self.directory.ensure_warehouse(req.warehouse_id)?;
        self.directory.ensure_product(req.product_id)?;

        self.store
            .with_balance(req.warehouse_id, req.product_id, |txn| {
                let quantity = txn.balance().quantity;
                let reserved = txn.balance().reserved_qty;
                let available = quantity - reserved;
                if available < req.qty {
                    return Err(DomainError::insufficient_stock(available, req.qty));
                }

                let new_reserved = reserved + req.qty;
                let now = Utc::now();
                txn.write(quantity, new_reserved, now, req.actor_id);
                txn.append(HistoryDraft {
                    previous_qty: reserved,
                    new_qty: new_reserved,
                    change_qty: req.qty,
                    reference: Reference::new(
                        ReferenceType::Reservation,
                        req.reference_id,
                        req.reference_code.clone(),
                    ),
                    notes: req.notes.clone(),
                    created_by: req.actor_id,
                    created_at: now,
                });
                Ok(txn.balance().clone())
            })
    }

    /// Undo an earmark without issuing stock.
    pub fn release(&self, req: EarmarkRequest) -> LedgerResult<StockBalance> {
        qty::ensure_positive(req.qty, "release quantity")?;
        self.directory.ensure_warehouse(req.warehouse_id)?;
        self.directory.ensure_product(req.product_id)?;

        self.store
            .with_balance(req.warehouse_id, req.product_id, |txn| {
                let quantity = txn.balance().quantity;
                let reserved = txn.balance().reserved_qty;
                if reserved < req.qty {
                    return Err(DomainError::conflict(format!(
                        "release of {} exceeds reserved quantity {}",
                        req.qty, reserved
                    )));
                }

                let new_reserved = reserved - req.qty;
                let now = Utc::now();
                txn.write(quantity, new_reserved, now, req.actor_id);
                txn.append(HistoryDraft {
                    previous_qty: reserved,
                    new_qty: new_reserved,
                    change_qty: -req.qty,
                    reference: Reference::new(
                        ReferenceType::Release,
                        req.reference_id,
                        req.reference_code.clone(),
                    ),
                    notes: req.notes.clone(),
                    created_by: req.actor_id,
                    created_at: now,
                });
                Ok(txn.balance().clone())
            })
    }

    /// Consume previously earmarked stock: release the earmark and apply
    /// the on-hand deduction in one critical section, so available stock
    /// never dips negative between the two movements. Appends two history
    /// rows (a `release` and the on-hand movement), in that order.
    pub fn consume_reserved(&self, req: ConsumeRequest) -> LedgerResult<StockBalance> {
        if req.reference.reference_type.is_earmark() {
            return Err(DomainError::conflict(
                "consume_reserved takes the on-hand movement reference, not an earmark",
            )
            .into());
        }
        qty::ensure_positive(req.qty, "consume quantity")?;
        self.directory.ensure_warehouse(req.warehouse_id)?;
        self.directory.ensure_product(req.product_id)?;

        self.store
            .with_balance(req.warehouse_id, req.product_id, |txn| {
                let quantity = txn.balance().quantity;
                let reserved = txn.balance().reserved_qty;
                if reserved < req.qty {
                    return Err(DomainError::conflict(format!(
                        "consume of {} exceeds reserved quantity {}",
                        req.qty, reserved
                    )));
                }
                let new_qty = quantity - req.qty;
                if new_qty < Decimal::ZERO {
                    // Reachable only after an adjustment drove on-hand
                    // below the earmarked level.
                    return Err(DomainError::insufficient_stock(quantity, req.qty));
                }

                let new_reserved = reserved - req.qty;
                let now = Utc::now();
                txn.write(new_qty, new_reserved, now, req.actor_id);
                txn.append(HistoryDraft {
                    previous_qty: reserved,
                    new_qty: new_reserved,
                    change_qty: -req.qty,
                    reference: Reference::new(
                        ReferenceType::Release,
                        req.reference.reference_id,
                        req.reference.code.clone(),
                    ),
                    notes: req.notes.clone(),
                    created_by: req.actor_id,
                    created_at: now,
                });
                txn.append(HistoryDraft {
                    previous_qty: quantity,
                    new_qty,
                    change_qty: -req.qty,
                    reference: req.reference.clone(),
                    notes: req.notes.clone(),
                    created_by: req.actor_id,
                    created_at: now,
                });
                Ok(txn.balance().clone())
            })
    }
}
