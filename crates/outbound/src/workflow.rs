//! Outbound orchestration: direct issue and the two-phase reserve path.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gudang_core::{
    ActorId, CustomerId, DomainError, IssueId, ProductId, Reference, ReferenceType, WarehouseId,
};
use gudang_ledger::{
    AvailabilityChecker, ConsumeRequest, EarmarkRequest, LedgerResult, LedgerStore,
    MutationEngine, MutationRequest, StockBalance,
};
use gudang_masters::Directory;

use crate::issue::OutboundIssue;

/// Storage seam for issue records. `with_issue` stages on a working copy,
/// committing only on `Ok`.
pub trait IssueRepository: Send + Sync {
    fn allocate_id(&self) -> IssueId;
    fn insert(&self, issue: OutboundIssue);
    fn get(&self, id: IssueId) -> Option<OutboundIssue>;

    fn with_issue<T, F>(&self, id: IssueId, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut OutboundIssue) -> LedgerResult<T>;
}

impl<R> IssueRepository for Arc<R>
where
    R: IssueRepository + ?Sized,
{
    fn allocate_id(&self) -> IssueId {
        (**self).allocate_id()
    }

    fn insert(&self, issue: OutboundIssue) {
        (**self).insert(issue)
    }

    fn get(&self, id: IssueId) -> Option<OutboundIssue> {
        (**self).get(id)
    }

    fn with_issue<T, F>(&self, id: IssueId, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut OutboundIssue) -> LedgerResult<T>,
    {
        (**self).with_issue(id, f)
    }
}

/// Command: issue stock to a customer immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueOutbound {
    pub code: String,
    pub customer_id: CustomerId,
    pub warehouse_id: WarehouseId,
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub notes: Option<String>,
    pub actor_id: ActorId,
}

/// Command: earmark stock for a pending issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveOutbound {
    pub code: String,
    pub customer_id: CustomerId,
    pub warehouse_id: WarehouseId,
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub notes: Option<String>,
    pub actor_id: ActorId,
}

/// Command: turn a reservation into the actual deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReservation {
    pub issue_id: IssueId,
    pub notes: Option<String>,
    pub actor_id: ActorId,
}

/// Command: give a reservation back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelReservation {
    pub issue_id: IssueId,
    pub notes: Option<String>,
    pub actor_id: ActorId,
}

/// Outbound workflow.
#[derive(Debug, Clone)]
pub struct OutboundWorkflow<S, D, R> {
    engine: MutationEngine<S, D>,
    availability: AvailabilityChecker<S, D>,
    directory: D,
    repo: R,
}

impl<S, D, R> OutboundWorkflow<S, D, R>
where
    S: LedgerStore + Clone,
    D: Directory + Clone,
    R: IssueRepository,
{
    pub fn new(store: S, directory: D, repo: R) -> Self {
        Self {
            engine: MutationEngine::new(store.clone(), directory.clone()),
            availability: AvailabilityChecker::new(store, directory.clone()),
            directory,
            repo,
        }
    }

    fn ensure_masters(&self, cmd_customer: CustomerId, wid: WarehouseId, pid: ProductId) -> LedgerResult<()> {
        self.directory.ensure_active_customer(cmd_customer)?;
        self.directory.ensure_active_warehouse(wid)?;
        self.directory.ensure_active_product(pid)?;
        Ok(())
    }

    /// Direct issue: advisory availability check, then the authoritative
    /// `outbound` deduction.
    pub fn issue(&self, cmd: IssueOutbound) -> LedgerResult<(OutboundIssue, StockBalance)> {
        self.ensure_masters(cmd.customer_id, cmd.warehouse_id, cmd.product_id)?;

        let info = self.availability.info(cmd.warehouse_id, cmd.product_id)?;
        if info.available < cmd.quantity {
            return Err(DomainError::insufficient_stock(info.available, cmd.quantity).into());
        }

        let id = self.repo.allocate_id();
        let issue = OutboundIssue::issued(
            id,
            cmd.code,
            cmd.customer_id,
            cmd.warehouse_id,
            cmd.product_id,
            cmd.quantity,
            cmd.notes.clone(),
            cmd.actor_id,
            Utc::now(),
        )?;

        let balance = self.engine.apply(MutationRequest {
            warehouse_id: cmd.warehouse_id,
            product_id: cmd.product_id,
            delta_qty: -cmd.quantity,
            reference: Reference::new(ReferenceType::Outbound, id.value(), issue.code()),
            notes: cmd.notes,
            actor_id: cmd.actor_id,
        })?;
        self.repo.insert(issue.clone());

        tracing::info!(
            issue_id = id.value(),
            code = issue.code(),
            warehouse_id = cmd.warehouse_id.value(),
            qty = %cmd.quantity,
            "outbound issue posted"
        );
        Ok((issue, balance))
    }

    /// Two-phase, step one: earmark the stock without issuing it.
    pub fn reserve(&self, cmd: ReserveOutbound) -> LedgerResult<OutboundIssue> {
        self.ensure_masters(cmd.customer_id, cmd.warehouse_id, cmd.product_id)?;

        let id = self.repo.allocate_id();
        let issue = OutboundIssue::reserved(
            id,
            cmd.code,
            cmd.customer_id,
            cmd.warehouse_id,
            cmd.product_id,
            cmd.quantity,
            cmd.notes.clone(),
            cmd.actor_id,
            Utc::now(),
        )?;

        self.engine.reserve(EarmarkRequest {
            warehouse_id: cmd.warehouse_id,
            product_id: cmd.product_id,
            qty: cmd.quantity,
            reference_id: id.value(),
            reference_code: issue.code().to_string(),
            notes: cmd.notes,
            actor_id: cmd.actor_id,
        })?;
        self.repo.insert(issue.clone());

        tracing::info!(
            issue_id = id.value(),
            code = issue.code(),
            qty = %cmd.quantity,
            "outbound reservation placed"
        );
        Ok(issue)
    }

    /// Two-phase, step two: consume the earmark and deduct on-hand stock
    /// in one critical section.
    pub fn commit_reserved(&self, cmd: CommitReservation) -> LedgerResult<OutboundIssue> {
        let updated = self.repo.with_issue(cmd.issue_id, |issue| {
            issue.commit(Utc::now())?;

            self.engine.consume_reserved(ConsumeRequest {
                warehouse_id: issue.warehouse_id(),
                product_id: issue.product_id(),
                qty: issue.quantity(),
                reference: Reference::new(
                    ReferenceType::Outbound,
                    issue.id_typed().value(),
                    issue.code(),
                ),
                notes: cmd.notes.clone(),
                actor_id: cmd.actor_id,
            })?;
            Ok(issue.clone())
        })?;

        tracing::info!(issue_id = cmd.issue_id.value(), "outbound reservation committed");
        Ok(updated)
    }

    /// Give a reservation back without issuing.
    pub fn cancel_reservation(&self, cmd: CancelReservation) -> LedgerResult<OutboundIssue> {
        let updated = self.repo.with_issue(cmd.issue_id, |issue| {
            issue.cancel(Utc::now())?;

            self.engine.release(EarmarkRequest {
                warehouse_id: issue.warehouse_id(),
                product_id: issue.product_id(),
                qty: issue.quantity(),
                reference_id: issue.id_typed().value(),
                reference_code: issue.code().to_string(),
                notes: cmd.notes.clone(),
                actor_id: cmd.actor_id,
            })?;
            Ok(issue.clone())
        })?;

        tracing::info!(issue_id = cmd.issue_id.value(), "outbound reservation cancelled");
        Ok(updated)
    }

    pub fn get(&self, id: IssueId) -> Option<OutboundIssue> {
        self.repo.get(id)
    }
}
