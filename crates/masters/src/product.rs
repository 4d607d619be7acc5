use serde::{Deserialize, Serialize};

use gudang_core::{DomainError, DomainResult, Entity, LifecycleStatus, ProductId};

/// Master entity: Product (a stock-keeping unit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    sku: String,
    name: String,
    /// Unit of measure, e.g. "pcs", "kg".
    unit: String,
    status: LifecycleStatus,
}

impl Product {
    pub fn new(
        id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
    ) -> DomainResult<Self> {
        let sku = sku.into();
        let name = name.into();
        if sku.trim().is_empty() {
            return Err(DomainError::conflict("product sku cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::conflict("product name cannot be empty"));
        }
        Ok(Self {
            id,
            sku,
            name,
            unit: unit.into(),
            status: LifecycleStatus::Active,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn status(&self) -> LifecycleStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Archive this product. The referential guard (no live stock) is the
    /// caller's responsibility.
    pub fn archive(&mut self) -> DomainResult<()> {
        if self.status == LifecycleStatus::Archived {
            return Err(DomainError::conflict(format!(
                "product {} is already archived",
                self.id
            )));
        }
        self.status = LifecycleStatus::Archived;
        Ok(())
    }

    pub fn activate(&mut self) {
        self.status = LifecycleStatus::Active;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_is_active() {
        let p = Product::new(ProductId::new(7), "SKU-7", "Beras 5kg", "sak").unwrap();
        assert!(p.is_active());
        assert_eq!(p.unit(), "sak");
    }
}
