use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gudang_core::qty;
use gudang_core::{ActorId, DomainError, DomainResult, Entity, OpnameId, ProductId, WarehouseId};

/// Classification of a count against the system quantity.
///
/// Serialized with the domain's Indonesian vocabulary: `lebih` (surplus),
/// `kurang` (shortage), `sama` (exact match).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifferenceType {
    #[serde(rename = "lebih")]
    Surplus,
    #[serde(rename = "kurang")]
    Shortage,
    #[serde(rename = "sama")]
    Exact,
}

impl DifferenceType {
    pub fn from_difference(difference: Decimal) -> Self {
        if difference > Decimal::ZERO {
            DifferenceType::Surplus
        } else if difference < Decimal::ZERO {
            DifferenceType::Shortage
        } else {
            DifferenceType::Exact
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifferenceType::Surplus => "lebih",
            DifferenceType::Shortage => "kurang",
            DifferenceType::Exact => "sama",
        }
    }
}

/// Opname lifecycle. `approved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpnameStatus {
    Draft,
    Approved,
}

/// A physical count awaiting (or past) reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opname {
    id: OpnameId,
    code: String,
    warehouse_id: WarehouseId,
    product_id: ProductId,
    counted_qty: Decimal,
    /// System quantity snapshotted when the count was recorded.
    system_qty: Decimal,
    difference_qty: Decimal,
    difference_type: DifferenceType,
    status: OpnameStatus,
    notes: Option<String>,
    counted_by: ActorId,
    approved_by: Option<ActorId>,
    counted_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
}

impl Opname {
    /// Record a draft count against a snapshot of the system quantity.
    pub fn draft(
        id: OpnameId,
        code: impl Into<String>,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        counted_qty: Decimal,
        system_qty: Decimal,
        notes: Option<String>,
        counted_by: ActorId,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        qty::ensure_non_negative(counted_qty, "counted quantity")?;

        let difference_qty = counted_qty - system_qty;
        Ok(Self {
            id,
            code: code.into(),
            warehouse_id,
            product_id,
            counted_qty,
            system_qty,
            difference_qty,
            difference_type: DifferenceType::from_difference(difference_qty),
            status: OpnameStatus::Draft,
            notes,
            counted_by,
            approved_by: None,
            counted_at: at,
            approved_at: None,
        })
    }

    /// `draft → approved`. A second approval is an idempotency violation,
    /// not a state-machine one — the count was already applied.
    pub fn approve(&mut self, actor: ActorId, at: DateTime<Utc>) -> DomainResult<()> {
        if self.status == OpnameStatus::Approved {
            return Err(DomainError::already_processed(format!(
                "opname {} ({}) is already approved",
                self.id, self.code
            )));
        }
        self.status = OpnameStatus::Approved;
        self.approved_by = Some(actor);
        self.approved_at = Some(at);
        Ok(())
    }

    /// Signed correction to land the balance on the counted quantity:
    /// positive for surplus, negative for shortage, zero for an exact
    /// match (which needs no ledger movement).
    pub fn adjustment_delta(&self) -> Decimal {
        self.difference_qty
    }

    pub fn id_typed(&self) -> OpnameId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn counted_qty(&self) -> Decimal {
        self.counted_qty
    }

    pub fn system_qty(&self) -> Decimal {
        self.system_qty
    }

    pub fn difference_qty(&self) -> Decimal {
        self.difference_qty
    }

    pub fn difference_type(&self) -> DifferenceType {
        self.difference_type
    }

    pub fn status(&self) -> OpnameStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn counted_by(&self) -> ActorId {
        self.counted_by
    }

    pub fn approved_by(&self) -> Option<ActorId> {
        self.approved_by
    }

    pub fn counted_at(&self) -> DateTime<Utc> {
        self.counted_at
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }
}

impl Entity for Opname {
    type Id = OpnameId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft(counted: Decimal, system: Decimal) -> Opname {
        Opname::draft(
            OpnameId::new(1),
            "OPN-000001",
            WarehouseId::new(1),
            ProductId::new(1),
            counted,
            system,
            None,
            ActorId::new(3),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn surplus_count_is_lebih() {
        let o = draft(dec!(75), dec!(70));
        assert_eq!(o.difference_type(), DifferenceType::Surplus);
        assert_eq!(o.difference_qty(), dec!(5));
        assert_eq!(o.difference_type().as_str(), "lebih");
    }

    #[test]
    fn shortage_count_is_kurang() {
        let o = draft(dec!(60), dec!(70));
        assert_eq!(o.difference_type(), DifferenceType::Shortage);
        assert_eq!(o.adjustment_delta(), dec!(-10));
    }

    #[test]
    fn matching_count_is_sama() {
        let o = draft(dec!(70), dec!(70));
        assert_eq!(o.difference_type(), DifferenceType::Exact);
        assert!(o.adjustment_delta().is_zero());
    }

    #[test]
    fn negative_count_is_rejected() {
        let err = Opname::draft(
            OpnameId::new(1),
            "OPN-000001",
            WarehouseId::new(1),
            ProductId::new(1),
            dec!(-1),
            dec!(70),
            None,
            ActorId::new(3),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity(_)));
    }

    #[test]
    fn double_approval_is_already_processed() {
        let mut o = draft(dec!(75), dec!(70));
        o.approve(ActorId::new(4), Utc::now()).unwrap();
        let err = o.approve(ActorId::new(4), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::AlreadyProcessed(_)));
    }
}
