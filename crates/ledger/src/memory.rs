//! In-memory ledger store.
//!
//! Intended for tests/dev. The per-pair lock registry is the "lock for
//! update" realization: every read-modify-write of one (warehouse, product)
//! balance goes through that pair's mutex, so concurrent mutations are
//! fully serialized while distinct pairs proceed independently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;

use gudang_core::{DomainResult, HistoryId, ProductId, ReferenceType, StockId, WarehouseId};

use crate::balance::StockBalance;
use crate::engine::LedgerError;
use crate::history::{HistoryDraft, StockHistory};
use crate::store::{BalanceTxn, LedgerStore, StoreError};

type PairKey = (WarehouseId, ProductId);

#[derive(Debug)]
pub struct InMemoryLedgerStore {
    cells: RwLock<HashMap<PairKey, Arc<Mutex<StockBalance>>>>,
    history: RwLock<Vec<StockHistory>>,
    next_stock_id: AtomicI64,
    next_history_id: AtomicI64,
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self {
            cells: RwLock::new(HashMap::new()),
            history: RwLock::new(Vec::new()),
            next_stock_id: AtomicI64::new(1),
            next_history_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the pair's lock cell, registering a zero row on first touch.
    fn cell(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
    ) -> Result<Arc<Mutex<StockBalance>>, StoreError> {
        let key = (warehouse_id, product_id);

        if let Some(cell) = self
            .cells
            .read()
            .map_err(|_| StoreError::lock_poisoned("balance registry"))?
            .get(&key)
        {
            return Ok(cell.clone());
        }

        let mut map = self
            .cells
            .write()
            .map_err(|_| StoreError::lock_poisoned("balance registry"))?;
        let cell = map.entry(key).or_insert_with(|| {
            let id = StockId::new(self.next_stock_id.fetch_add(1, Ordering::SeqCst));
            Arc::new(Mutex::new(StockBalance::opening(
                id,
                warehouse_id,
                product_id,
                Utc::now(),
            )))
        });
        Ok(cell.clone())
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn with_balance<T, F>(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        f: F,
    ) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut BalanceTxn<'_>) -> DomainResult<T>,
    {
        let cell = self.cell(warehouse_id, product_id)?;
        let mut guard = cell
            .lock()
            .map_err(|_| StoreError::lock_poisoned("balance row"))?;

        // Stage on a working copy; nothing is visible until commit.
        let mut working = guard.clone();
        let mut drafts: Vec<HistoryDraft> = Vec::new();
        let out = f(&mut BalanceTxn::new(&mut working, &mut drafts))?;

        // Commit: balance write-back plus history appends, still under the
        // pair lock, so per-pair history order is true commit order.
        let stock_id = working.id;
        *guard = working;

        if !drafts.is_empty() {
            let mut log = self
                .history
                .write()
                .map_err(|_| StoreError::lock_poisoned("history log"))?;
            for draft in drafts {
                let id = HistoryId::new(self.next_history_id.fetch_add(1, Ordering::SeqCst));
                log.push(StockHistory {
                    id,
                    stock_id,
                    warehouse_id,
                    product_id,
                    previous_qty: draft.previous_qty,
                    new_qty: draft.new_qty,
                    change_qty: draft.change_qty,
                    reference_type: draft.reference.reference_type,
                    reference_id: draft.reference.reference_id,
                    reference_code: draft.reference.code,
                    notes: draft.notes,
                    created_by: draft.created_by,
                    created_at: draft.created_at,
                });
            }
        }

        Ok(out)
    }

    fn balance(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
    ) -> Result<Option<StockBalance>, StoreError> {
        let map = self
            .cells
            .read()
            .map_err(|_| StoreError::lock_poisoned("balance registry"))?;
        match map.get(&(warehouse_id, product_id)) {
            Some(cell) => {
                let guard = cell
                    .lock()
                    .map_err(|_| StoreError::lock_poisoned("balance row"))?;
                Ok(Some(guard.clone()))
            }
            None => Ok(None),
        }
    }

    fn history_for_pair(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
    ) -> Result<Vec<StockHistory>, StoreError> {
        let log = self
            .history
            .read()
            .map_err(|_| StoreError::lock_poisoned("history log"))?;
        Ok(log
            .iter()
            .filter(|h| h.warehouse_id == warehouse_id && h.product_id == product_id)
            .cloned()
            .collect())
    }

    fn history_for_reference(
        &self,
        reference_type: ReferenceType,
        reference_id: i64,
    ) -> Result<Vec<StockHistory>, StoreError> {
        let log = self
            .history
            .read()
            .map_err(|_| StoreError::lock_poisoned("history log"))?;
        Ok(log
            .iter()
            .filter(|h| h.reference_type == reference_type && h.reference_id == reference_id)
            .cloned()
            .collect())
    }

    fn has_live_stock_in_warehouse(&self, warehouse_id: WarehouseId) -> Result<bool, StoreError> {
        let map = self
            .cells
            .read()
            .map_err(|_| StoreError::lock_poisoned("balance registry"))?;
        for ((wid, _), cell) in map.iter() {
            if *wid != warehouse_id {
                continue;
            }
            let guard = cell
                .lock()
                .map_err(|_| StoreError::lock_poisoned("balance row"))?;
            if !guard.quantity.is_zero() || !guard.reserved_qty.is_zero() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn has_live_stock_of_product(&self, product_id: ProductId) -> Result<bool, StoreError> {
        let map = self
            .cells
            .read()
            .map_err(|_| StoreError::lock_poisoned("balance registry"))?;
        for ((_, pid), cell) in map.iter() {
            if *pid != product_id {
                continue;
            }
            let guard = cell
                .lock()
                .map_err(|_| StoreError::lock_poisoned("balance row"))?;
            if !guard.quantity.is_zero() || !guard.reserved_qty.is_zero() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gudang_core::{ActorId, DomainError, Reference};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn pair() -> (WarehouseId, ProductId) {
        (WarehouseId::new(1), ProductId::new(1))
    }

    #[test]
    fn first_touch_creates_zero_row() {
        let store = InMemoryLedgerStore::new();
        let (wid, pid) = pair();
        assert!(store.balance(wid, pid).unwrap().is_none());

        store
            .with_balance(wid, pid, |txn| {
                assert!(txn.balance().quantity.is_zero());
                Ok(())
            })
            .unwrap();

        let row = store.balance(wid, pid).unwrap().unwrap();
        assert_eq!(row.quantity, Decimal::ZERO);
        assert_eq!(row.id, StockId::new(1));
    }

    #[test]
    fn failed_closure_commits_nothing() {
        let store = InMemoryLedgerStore::new();
        let (wid, pid) = pair();
        let now = Utc::now();

        let result: Result<(), LedgerError> = store.with_balance(wid, pid, |txn| {
            txn.write(dec!(5), Decimal::ZERO, now, ActorId::new(1));
            txn.append(HistoryDraft {
                previous_qty: Decimal::ZERO,
                new_qty: dec!(5),
                change_qty: dec!(5),
                reference: Reference::new(ReferenceType::Inbound, 1, "INB-000001"),
                notes: None,
                created_by: ActorId::new(1),
                created_at: now,
            });
            Err(DomainError::conflict("boom"))
        });

        assert!(result.is_err());
        assert!(store.balance(wid, pid).unwrap().unwrap().quantity.is_zero());
        assert!(store.history_for_pair(wid, pid).unwrap().is_empty());
    }

    #[test]
    fn live_stock_guard_sees_reserved_only_rows() {
        let store = InMemoryLedgerStore::new();
        let (wid, pid) = pair();
        let now = Utc::now();

        store
            .with_balance(wid, pid, |txn| {
                txn.write(Decimal::ZERO, dec!(3), now, ActorId::new(1));
                Ok(())
            })
            .unwrap();

        assert!(store.has_live_stock_in_warehouse(wid).unwrap());
        assert!(store.has_live_stock_of_product(pid).unwrap());
        assert!(!store
            .has_live_stock_in_warehouse(WarehouseId::new(99))
            .unwrap());
    }
}
