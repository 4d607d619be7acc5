//! Master data archival with referential guards.
//!
//! Masters are never hard-deleted. Archival is refused while the ledger
//! still holds live stock (on-hand or reserved) referencing the entity;
//! archived entities remain resolvable for history.

use std::sync::Arc;

use gudang_core::{DomainError, ProductId, WarehouseId};
use gudang_ledger::{LedgerResult, LedgerStore};
use gudang_masters::{Directory, InMemoryDirectory, Product, Warehouse};

/// Archival service over the in-memory directory.
#[derive(Debug, Clone)]
pub struct Archival<S> {
    directory: Arc<InMemoryDirectory>,
    ledger: S,
}

impl<S> Archival<S>
where
    S: LedgerStore,
{
    pub fn new(directory: Arc<InMemoryDirectory>, ledger: S) -> Self {
        Self { directory, ledger }
    }

    /// Archive a warehouse, refused while it still holds stock.
    pub fn archive_warehouse(&self, id: WarehouseId) -> LedgerResult<Warehouse> {
        let mut warehouse = self
            .directory
            .warehouse(id)
            .ok_or_else(|| DomainError::not_found(format!("warehouse {id}")))?;

        if self.ledger.has_live_stock_in_warehouse(id)? {
            return Err(DomainError::conflict(format!(
                "warehouse {id} still holds stock and cannot be archived"
            ))
            .into());
        }

        warehouse.archive()?;
        self.directory.upsert_warehouse(warehouse.clone());
        tracing::info!(warehouse_id = id.value(), "warehouse archived");
        Ok(warehouse)
    }

    /// Archive a product, refused while any warehouse still stocks it.
    pub fn archive_product(&self, id: ProductId) -> LedgerResult<Product> {
        let mut product = self
            .directory
            .product(id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))?;

        if self.ledger.has_live_stock_of_product(id)? {
            return Err(DomainError::conflict(format!(
                "product {id} still has stock and cannot be archived"
            ))
            .into());
        }

        product.archive()?;
        self.directory.upsert_product(product.clone());
        tracing::info!(product_id = id.value(), "product archived");
        Ok(product)
    }
}
