use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gudang_core::{ActorId, ProductId, StockId, WarehouseId};

/// Current stock position for one (warehouse, product) pair.
///
/// The authoritative current-state projection: `quantity` is total on hand,
/// `reserved_qty` the portion earmarked for pending outbound work, and
/// available stock is the derived difference. Rows are created lazily on
/// first mutation and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockBalance {
    pub id: StockId,
    pub warehouse_id: WarehouseId,
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub reserved_qty: Decimal,
    pub last_updated: DateTime<Utc>,
    pub updated_by: ActorId,
}

impl StockBalance {
    /// Fresh zero row for a pair touched for the first time.
    pub fn opening(
        id: StockId,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            warehouse_id,
            product_id,
            quantity: Decimal::ZERO,
            reserved_qty: Decimal::ZERO,
            last_updated: at,
            updated_by: ActorId::SYSTEM,
        }
    }

    /// Derived: quantity not earmarked for pending work.
    pub fn available_qty(&self) -> Decimal {
        self.quantity - self.reserved_qty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn available_is_quantity_minus_reserved() {
        let mut balance = StockBalance::opening(
            StockId::new(1),
            WarehouseId::new(1),
            ProductId::new(1),
            Utc::now(),
        );
        balance.quantity = dec!(70);
        balance.reserved_qty = dec!(20);
        assert_eq!(balance.available_qty(), dec!(50));
    }
}
