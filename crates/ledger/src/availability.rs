//! Read-only availability queries.
//!
//! Workflows consult the checker before committing an outbound-reducing
//! operation. The check is advisory: between check and apply another
//! transaction may take the stock, and the engine's floor check remains
//! the final authority.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gudang_core::qty;
use gudang_core::{ProductId, WarehouseId};
use gudang_masters::Directory;

use crate::engine::LedgerResult;
use crate::store::LedgerStore;

/// Snapshot of one pair's stock position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub current: Decimal,
    pub reserved: Decimal,
    pub available: Decimal,
    /// Whether any stock is available at all.
    pub is_available: bool,
}

impl StockInfo {
    fn zero() -> Self {
        Self {
            current: Decimal::ZERO,
            reserved: Decimal::ZERO,
            available: Decimal::ZERO,
            is_available: false,
        }
    }
}

/// Read path over the balance store. Never mutates state.
#[derive(Debug, Clone)]
pub struct AvailabilityChecker<S, D> {
    store: S,
    directory: D,
}

impl<S, D> AvailabilityChecker<S, D> {
    pub fn new(store: S, directory: D) -> Self {
        Self { store, directory }
    }
}

impl<S, D> AvailabilityChecker<S, D>
where
    S: LedgerStore,
    D: Directory,
{
    /// Can `requested_qty` be issued from this pair right now?
    ///
    /// A pair with no balance row is simply empty stock (`false`), not an
    /// error; unknown warehouse/product is `NotFound`.
    pub fn is_available(
        &self,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        requested_qty: Decimal,
    ) -> LedgerResult<bool> {
        qty::ensure_positive(requested_qty, "requested quantity")?;
        self.directory.ensure_warehouse(warehouse_id)?;
        self.directory.ensure_product(product_id)?;

        let balance = self.store.balance(warehouse_id, product_id)?;
        Ok(balance
            .map(|b| b.available_qty() >= requested_qty)
            .unwrap_or(false))
    }

    /// Full stock position for a pair; zeros for a never-touched pair.
    pub fn info(&self, warehouse_id: WarehouseId, product_id: ProductId) -> LedgerResult<StockInfo> {
        self.directory.ensure_warehouse(warehouse_id)?;
        self.directory.ensure_product(product_id)?;

        let info = match self.store.balance(warehouse_id, product_id)? {
            Some(b) => {
                let available = b.available_qty();
                StockInfo {
                    current: b.quantity,
                    reserved: b.reserved_qty,
                    available,
                    is_available: available > Decimal::ZERO,
                }
            }
            None => StockInfo::zero(),
        };
        Ok(info)
    }
}
