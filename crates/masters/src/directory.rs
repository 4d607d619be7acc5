//! Read-only master data lookups.
//!
//! The ledger core validates that referenced warehouses and products exist
//! before touching a balance; workflows additionally require *active*
//! entities. Both go through the [`Directory`] trait so the lookup backend
//! stays swappable.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use gudang_core::{CustomerId, DomainError, DomainResult, ProductId, SupplierId, WarehouseId};

use crate::party::{Customer, Supplier};
use crate::product::Product;
use crate::warehouse::Warehouse;

/// Master data lookup interface.
///
/// The `ensure_*` helpers tolerate archived entities (history and
/// compensating movements may reference them); the `ensure_active_*`
/// helpers are for workflows opening *new* transactions.
pub trait Directory: Send + Sync {
    fn warehouse(&self, id: WarehouseId) -> Option<Warehouse>;
    fn product(&self, id: ProductId) -> Option<Product>;
    fn supplier(&self, id: SupplierId) -> Option<Supplier>;
    fn customer(&self, id: CustomerId) -> Option<Customer>;

    fn ensure_warehouse(&self, id: WarehouseId) -> DomainResult<Warehouse> {
        self.warehouse(id)
            .ok_or_else(|| DomainError::not_found(format!("warehouse {id}")))
    }

    fn ensure_product(&self, id: ProductId) -> DomainResult<Product> {
        self.product(id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }

    fn ensure_active_warehouse(&self, id: WarehouseId) -> DomainResult<Warehouse> {
        let warehouse = self.ensure_warehouse(id)?;
        if !warehouse.is_active() {
            return Err(DomainError::conflict(format!("warehouse {id} is archived")));
        }
        Ok(warehouse)
    }

    fn ensure_active_product(&self, id: ProductId) -> DomainResult<Product> {
        let product = self.ensure_product(id)?;
        if !product.is_active() {
            return Err(DomainError::conflict(format!("product {id} is archived")));
        }
        Ok(product)
    }

    fn ensure_active_supplier(&self, id: SupplierId) -> DomainResult<Supplier> {
        let supplier = self
            .supplier(id)
            .ok_or_else(|| DomainError::not_found(format!("supplier {id}")))?;
        if !supplier.is_active() {
            return Err(DomainError::conflict(format!("supplier {id} is archived")));
        }
        Ok(supplier)
    }

    fn ensure_active_customer(&self, id: CustomerId) -> DomainResult<Customer> {
        let customer = self
            .customer(id)
            .ok_or_else(|| DomainError::not_found(format!("customer {id}")))?;
        if !customer.is_active() {
            return Err(DomainError::conflict(format!("customer {id} is archived")));
        }
        Ok(customer)
    }
}

impl<D> Directory for Arc<D>
where
    D: Directory + ?Sized,
{
    fn warehouse(&self, id: WarehouseId) -> Option<Warehouse> {
        (**self).warehouse(id)
    }

    fn product(&self, id: ProductId) -> Option<Product> {
        (**self).product(id)
    }

    fn supplier(&self, id: SupplierId) -> Option<Supplier> {
        (**self).supplier(id)
    }

    fn customer(&self, id: CustomerId) -> Option<Customer> {
        (**self).customer(id)
    }
}

/// In-memory master registry for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    warehouses: RwLock<HashMap<WarehouseId, Warehouse>>,
    products: RwLock<HashMap<ProductId, Product>>,
    suppliers: RwLock<HashMap<SupplierId, Supplier>>,
    customers: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_warehouse(&self, warehouse: Warehouse) {
        if let Ok(mut map) = self.warehouses.write() {
            map.insert(warehouse.id_typed(), warehouse);
        }
    }

    pub fn upsert_product(&self, product: Product) {
        if let Ok(mut map) = self.products.write() {
            map.insert(product.id_typed(), product);
        }
    }

    pub fn upsert_supplier(&self, supplier: Supplier) {
        if let Ok(mut map) = self.suppliers.write() {
            map.insert(supplier.id_typed(), supplier);
        }
    }

    pub fn upsert_customer(&self, customer: Customer) {
        if let Ok(mut map) = self.customers.write() {
            map.insert(customer.id_typed(), customer);
        }
    }
}

impl Directory for InMemoryDirectory {
    fn warehouse(&self, id: WarehouseId) -> Option<Warehouse> {
        self.warehouses.read().ok()?.get(&id).cloned()
    }

    fn product(&self, id: ProductId) -> Option<Product> {
        self.products.read().ok()?.get(&id).cloned()
    }

    fn supplier(&self, id: SupplierId) -> Option<Supplier> {
        self.suppliers.read().ok()?.get(&id).cloned()
    }

    fn customer(&self, id: CustomerId) -> Option<Customer> {
        self.customers.read().ok()?.get(&id).cloned()
    }
}
