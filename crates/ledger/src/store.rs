//! Ledger storage contract.
//!
//! The store owns the balance rows and the append-only history log, and it
//! is where the serialization guarantee lives: [`LedgerStore::with_balance`]
//! runs its closure under an exclusive per-(warehouse, product) lock — the
//! in-process equivalent of `SELECT … FOR UPDATE` — and commits the staged
//! balance write plus history appends atomically, only when the closure
//! succeeds.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use gudang_core::{ActorId, DomainResult, ProductId, ReferenceType, WarehouseId};

use crate::balance::StockBalance;
use crate::engine::LedgerError;
use crate::history::{HistoryDraft, StockHistory};

/// Infrastructure failure inside the store.
///
/// Distinct from [`gudang_core::DomainError`]: these are not business
/// outcomes and (where retryable) the caller should retry the whole
/// workflow operation — retrying cannot double-apply because nothing was
/// committed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A lock was poisoned by a panicking writer.
    #[error("ledger lock poisoned: {0}")]
    LockPoisoned(String),

    /// Lock acquisition exceeded the store's bound.
    #[error("ledger lock timeout: {0}")]
    Timeout(String),
}

impl StoreError {
    pub fn lock_poisoned(what: impl Into<String>) -> Self {
        Self::LockPoisoned(what.into())
    }

    pub fn timeout(what: impl Into<String>) -> Self {
        Self::Timeout(what.into())
    }

    /// Timeouts are safe to retry at workflow-call granularity; a poisoned
    /// lock means a writer panicked mid-flight and needs investigation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Timeout(_))
    }
}

/// Exclusive, staged view of one balance row.
///
/// Handed to the `with_balance` closure by the store. All writes go through
/// [`BalanceTxn::write`]/[`BalanceTxn::append`] and are committed together
/// iff the closure returns `Ok` — a crash or failure can never leave a
/// balance update without its history row, or vice versa.
#[derive(Debug)]
pub struct BalanceTxn<'a> {
    balance: &'a mut StockBalance,
    drafts: &'a mut Vec<HistoryDraft>,
}

impl<'a> BalanceTxn<'a> {
    pub fn new(balance: &'a mut StockBalance, drafts: &'a mut Vec<HistoryDraft>) -> Self {
        Self { balance, drafts }
    }

    /// Current (staged) state of the locked row.
    pub fn balance(&self) -> &StockBalance {
        self.balance
    }

    /// Stage new quantity/reserved values on the locked row.
    pub fn write(
        &mut self,
        quantity: Decimal,
        reserved_qty: Decimal,
        at: DateTime<Utc>,
        actor: ActorId,
    ) {
        self.balance.quantity = quantity;
        self.balance.reserved_qty = reserved_qty;
        self.balance.last_updated = at;
        self.balance.updated_by = actor;
    }

    /// Stage a history entry to be appended at commit.
    pub fn append(&mut self, draft: HistoryDraft) {
        self.drafts.push(draft);
    }
}

/// Storage seam for the ledger core.
///
/// Implementations must guarantee:
/// - `with_balance` serializes closures per (warehouse, product) pair and
///   creates the zero row on first touch;
/// - staged writes commit atomically on `Ok`, and are discarded wholesale
///   on `Err` (all-or-nothing per call);
/// - for one pair, the order of committed history rows is the true commit
///   order of `with_balance` calls.
pub trait LedgerStore: Send + Sync {
    fn with_balance<T, F>(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        f: F,
    ) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut BalanceTxn<'_>) -> DomainResult<T>;

    /// Read-only snapshot; `None` for a never-touched pair.
    fn balance(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
    ) -> Result<Option<StockBalance>, StoreError>;

    /// History rows for a pair, in commit order.
    fn history_for_pair(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
    ) -> Result<Vec<StockHistory>, StoreError>;

    /// History rows caused by a given transaction (idempotency checks).
    fn history_for_reference(
        &self,
        reference_type: ReferenceType,
        reference_id: i64,
    ) -> Result<Vec<StockHistory>, StoreError>;

    /// Referential guard: does any balance in this warehouse still hold
    /// on-hand or reserved stock?
    fn has_live_stock_in_warehouse(&self, warehouse_id: WarehouseId) -> Result<bool, StoreError>;

    /// Referential guard: does any balance of this product still hold
    /// on-hand or reserved stock?
    fn has_live_stock_of_product(&self, product_id: ProductId) -> Result<bool, StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn with_balance<T, F>(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        f: F,
    ) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut BalanceTxn<'_>) -> DomainResult<T>,
    {
        (**self).with_balance(warehouse_id, product_id, f)
    }

    fn balance(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
    ) -> Result<Option<StockBalance>, StoreError> {
        (**self).balance(warehouse_id, product_id)
    }

    fn history_for_pair(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
    ) -> Result<Vec<StockHistory>, StoreError> {
        (**self).history_for_pair(warehouse_id, product_id)
    }

    fn history_for_reference(
        &self,
        reference_type: ReferenceType,
        reference_id: i64,
    ) -> Result<Vec<StockHistory>, StoreError> {
        (**self).history_for_reference(reference_type, reference_id)
    }

    fn has_live_stock_in_warehouse(&self, warehouse_id: WarehouseId) -> Result<bool, StoreError> {
        (**self).has_live_stock_in_warehouse(warehouse_id)
    }

    fn has_live_stock_of_product(&self, product_id: ProductId) -> Result<bool, StoreError> {
        (**self).has_live_stock_of_product(product_id)
    }
}
