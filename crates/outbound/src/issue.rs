use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gudang_core::qty;
use gudang_core::{
    ActorId, CustomerId, DomainError, DomainResult, Entity, IssueId, ProductId, WarehouseId,
};

/// Issue lifecycle. A direct issue is born `issued`; the two-phase path
/// goes `reserved → issued | cancelled`. `issued` and `cancelled` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Reserved,
    Issued,
    Cancelled,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Reserved => "reserved",
            IssueStatus::Issued => "issued",
            IssueStatus::Cancelled => "cancelled",
        }
    }
}

/// An outbound issue to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundIssue {
    id: IssueId,
    code: String,
    customer_id: CustomerId,
    warehouse_id: WarehouseId,
    product_id: ProductId,
    quantity: Decimal,
    status: IssueStatus,
    notes: Option<String>,
    issued_by: ActorId,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

impl OutboundIssue {
    #[allow(clippy::too_many_arguments)]
    fn build(
        id: IssueId,
        code: impl Into<String>,
        customer_id: CustomerId,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        quantity: Decimal,
        status: IssueStatus,
        notes: Option<String>,
        issued_by: ActorId,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        qty::ensure_positive(quantity, "issue quantity")?;
        Ok(Self {
            id,
            code: code.into(),
            customer_id,
            warehouse_id,
            product_id,
            quantity,
            status,
            notes,
            issued_by,
            created_at: at,
            processed_at: None,
        })
    }

    /// A direct issue: stock already deducted.
    #[allow(clippy::too_many_arguments)]
    pub fn issued(
        id: IssueId,
        code: impl Into<String>,
        customer_id: CustomerId,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        quantity: Decimal,
        notes: Option<String>,
        issued_by: ActorId,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut issue = Self::build(
            id,
            code,
            customer_id,
            warehouse_id,
            product_id,
            quantity,
            IssueStatus::Issued,
            notes,
            issued_by,
            at,
        )?;
        issue.processed_at = Some(at);
        Ok(issue)
    }

    /// A pending issue backed by an earmark on the balance.
    #[allow(clippy::too_many_arguments)]
    pub fn reserved(
        id: IssueId,
        code: impl Into<String>,
        customer_id: CustomerId,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        quantity: Decimal,
        notes: Option<String>,
        issued_by: ActorId,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Self::build(
            id,
            code,
            customer_id,
            warehouse_id,
            product_id,
            quantity,
            IssueStatus::Reserved,
            notes,
            issued_by,
            at,
        )
    }

    fn ensure_reserved(&self, attempted: &str) -> DomainResult<()> {
        if self.status != IssueStatus::Reserved {
            return Err(DomainError::invalid_transition(format!(
                "cannot {attempted} issue {}: status is {}, expected reserved",
                self.id,
                self.status.as_str()
            )));
        }
        Ok(())
    }

    /// `reserved → issued`. The caller consumes the earmark.
    pub fn commit(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_reserved("commit")?;
        self.status = IssueStatus::Issued;
        self.processed_at = Some(at);
        Ok(())
    }

    /// `reserved → cancelled`. The caller releases the earmark.
    pub fn cancel(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_reserved("cancel")?;
        self.status = IssueStatus::Cancelled;
        self.processed_at = Some(at);
        Ok(())
    }

    pub fn id_typed(&self) -> IssueId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn status(&self) -> IssueStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn issued_by(&self) -> ActorId {
        self.issued_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }
}

impl Entity for OutboundIssue {
    type Id = IssueId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn reserved() -> OutboundIssue {
        OutboundIssue::reserved(
            IssueId::new(1),
            "OUT-000001",
            CustomerId::new(1),
            WarehouseId::new(1),
            ProductId::new(1),
            dec!(5),
            None,
            ActorId::new(2),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn reservation_commits_once() {
        let mut issue = reserved();
        issue.commit(Utc::now()).unwrap();
        assert_eq!(issue.status(), IssueStatus::Issued);

        let err = issue.commit(Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition(_)));
    }

    #[test]
    fn cancelled_reservation_cannot_commit() {
        let mut issue = reserved();
        issue.cancel(Utc::now()).unwrap();
        assert!(issue.commit(Utc::now()).is_err());
    }

    #[test]
    fn direct_issue_is_terminal() {
        let issue = OutboundIssue::issued(
            IssueId::new(2),
            "OUT-000002",
            CustomerId::new(1),
            WarehouseId::new(1),
            ProductId::new(1),
            dec!(3),
            None,
            ActorId::new(2),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(issue.status(), IssueStatus::Issued);
        assert!(issue.processed_at().is_some());
    }
}
