//! Opname orchestration: snapshot on record, exactly-once adjustment on
//! approval.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gudang_core::{ActorId, DomainError, OpnameId, ProductId, Reference, ReferenceType, WarehouseId};
use gudang_ledger::{LedgerResult, LedgerStore, MutationEngine, MutationRequest};
use gudang_masters::Directory;

use crate::count::Opname;

/// Storage seam for opname records. Same contract as the other record
/// repositories: `with_opname` stages on a working copy, committing only on
/// `Ok`.
pub trait OpnameRepository: Send + Sync {
    fn allocate_id(&self) -> OpnameId;
    fn insert(&self, opname: Opname);
    fn get(&self, id: OpnameId) -> Option<Opname>;

    fn with_opname<T, F>(&self, id: OpnameId, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut Opname) -> LedgerResult<T>;
}

impl<R> OpnameRepository for Arc<R>
where
    R: OpnameRepository + ?Sized,
{
    fn allocate_id(&self) -> OpnameId {
        (**self).allocate_id()
    }

    fn insert(&self, opname: Opname) {
        (**self).insert(opname)
    }

    fn get(&self, id: OpnameId) -> Option<Opname> {
        (**self).get(id)
    }

    fn with_opname<T, F>(&self, id: OpnameId, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut Opname) -> LedgerResult<T>,
    {
        (**self).with_opname(id, f)
    }
}

/// Command: record a physical count as a draft opname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCount {
    pub code: String,
    pub warehouse_id: WarehouseId,
    pub product_id: ProductId,
    pub counted_qty: Decimal,
    pub notes: Option<String>,
    pub actor_id: ActorId,
}

/// Command: approve a draft opname, applying its adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveOpname {
    pub opname_id: OpnameId,
    pub notes: Option<String>,
    pub actor_id: ActorId,
}

/// Physical-count workflow.
#[derive(Debug, Clone)]
pub struct OpnameWorkflow<S, D, R> {
    engine: MutationEngine<S, D>,
    store: S,
    directory: D,
    repo: R,
}

impl<S, D, R> OpnameWorkflow<S, D, R>
where
    S: LedgerStore + Clone,
    D: Directory + Clone,
    R: OpnameRepository,
{
    pub fn new(store: S, directory: D, repo: R) -> Self {
        Self {
            engine: MutationEngine::new(store.clone(), directory.clone()),
            store,
            directory,
            repo,
        }
    }

    /// Record a count. The system quantity is snapshotted here, at record
    /// time — the difference is measured against what the ledger said when
    /// the shelves were counted, not at approval time.
    pub fn record(&self, cmd: RecordCount) -> LedgerResult<Opname> {
        self.directory.ensure_active_warehouse(cmd.warehouse_id)?;
        self.directory.ensure_active_product(cmd.product_id)?;

        let system_qty = self
            .store
            .balance(cmd.warehouse_id, cmd.product_id)?
            .map(|b| b.quantity)
            .unwrap_or(Decimal::ZERO);

        let id = self.repo.allocate_id();
        let opname = Opname::draft(
            id,
            cmd.code,
            cmd.warehouse_id,
            cmd.product_id,
            cmd.counted_qty,
            system_qty,
            cmd.notes,
            cmd.actor_id,
            Utc::now(),
        )?;
        self.repo.insert(opname.clone());

        tracing::info!(
            opname_id = id.value(),
            code = opname.code(),
            counted = %opname.counted_qty(),
            system = %opname.system_qty(),
            difference = opname.difference_type().as_str(),
            "opname recorded"
        );
        Ok(opname)
    }

    /// Approve a draft opname.
    ///
    /// The sequence — status check, duplicate-adjustment check, ledger
    /// movement, status write — runs under the record lock and commits
    /// all-or-nothing: a balance updated with the status left `draft` is
    /// never observable.
    pub fn approve(&self, cmd: ApproveOpname) -> LedgerResult<Opname> {
        let updated = self.repo.with_opname(cmd.opname_id, |opname| {
            opname.approve(cmd.actor_id, Utc::now())?;

            // Defense in depth: even if a status write was ever lost, an
            // adjustment row referencing this opname means it was applied.
            let prior = self
                .store
                .history_for_reference(ReferenceType::Adjustment, cmd.opname_id.value())?;
            if !prior.is_empty() {
                return Err(DomainError::already_processed(format!(
                    "opname {} already has an adjustment entry",
                    cmd.opname_id
                ))
                .into());
            }

            // An exact match reconciles to itself; no movement.
            let delta = opname.adjustment_delta();
            if !delta.is_zero() {
                self.engine.apply(MutationRequest {
                    warehouse_id: opname.warehouse_id(),
                    product_id: opname.product_id(),
                    delta_qty: delta,
                    reference: Reference::new(
                        ReferenceType::Adjustment,
                        cmd.opname_id.value(),
                        opname.code(),
                    ),
                    notes: cmd.notes.clone(),
                    actor_id: cmd.actor_id,
                })?;
            }
            Ok(opname.clone())
        })?;

        tracing::info!(
            opname_id = cmd.opname_id.value(),
            adjustment = %updated.adjustment_delta(),
            "opname approved"
        );
        Ok(updated)
    }

    pub fn get(&self, id: OpnameId) -> Option<Opname> {
        self.repo.get(id)
    }
}
