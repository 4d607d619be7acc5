//! In-memory record repositories for tests/dev.
//!
//! One generic keyed store plus thin typed wrappers implementing each
//! workflow's repository trait. Mutations run on a working copy under the
//! map's write lock and commit only on `Ok`, matching the contract the
//! workflow crates rely on for all-or-nothing calls.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use gudang_core::{DomainError, IssueId, OpnameId, ReceiptId, TransferId};
use gudang_inbound::{InboundReceipt, ReceiptRepository};
use gudang_ledger::{LedgerError, LedgerResult, StoreError};
use gudang_opname::{Opname, OpnameRepository};
use gudang_outbound::{IssueRepository, OutboundIssue};
use gudang_transfer::{StockTransfer, TransferRepository};

/// Generic in-memory keyed store with auto-increment id allocation.
#[derive(Debug)]
pub struct InMemoryRepository<K, V> {
    entity: &'static str,
    records: RwLock<HashMap<K, V>>,
    next_id: AtomicI64,
}

impl<K, V> InMemoryRepository<K, V>
where
    K: Eq + Hash + Copy + core::fmt::Display,
    V: Clone,
{
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            records: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn next_raw_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    pub fn put(&self, key: K, value: V) {
        if let Ok(mut map) = self.records.write() {
            map.insert(key, value);
        }
    }

    pub fn fetch(&self, key: K) -> Option<V> {
        self.records.read().ok()?.get(&key).cloned()
    }

    /// Run `f` against an exclusive working copy of the record; commit the
    /// copy only on `Ok`.
    pub fn mutate<T, F>(&self, key: K, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut V) -> LedgerResult<T>,
    {
        let mut map = self
            .records
            .write()
            .map_err(|_| StoreError::lock_poisoned(self.entity))?;
        let record = map
            .get_mut(&key)
            .ok_or_else(|| LedgerError::from(DomainError::not_found(format!("{} {key}", self.entity))))?;

        let mut working = record.clone();
        let out = f(&mut working)?;
        *record = working;
        Ok(out)
    }
}

/// In-memory transfer record store.
#[derive(Debug)]
pub struct InMemoryTransferRepository(InMemoryRepository<TransferId, StockTransfer>);

impl InMemoryTransferRepository {
    pub fn new() -> Self {
        Self(InMemoryRepository::new("transfer"))
    }
}

impl Default for InMemoryTransferRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferRepository for InMemoryTransferRepository {
    fn allocate_id(&self) -> TransferId {
        TransferId::new(self.0.next_raw_id())
    }

    fn insert(&self, transfer: StockTransfer) {
        self.0.put(transfer.id_typed(), transfer);
    }

    fn get(&self, id: TransferId) -> Option<StockTransfer> {
        self.0.fetch(id)
    }

    fn with_transfer<T, F>(&self, id: TransferId, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut StockTransfer) -> LedgerResult<T>,
    {
        self.0.mutate(id, f)
    }
}

/// In-memory opname record store.
#[derive(Debug)]
pub struct InMemoryOpnameRepository(InMemoryRepository<OpnameId, Opname>);

impl InMemoryOpnameRepository {
    pub fn new() -> Self {
        Self(InMemoryRepository::new("opname"))
    }
}

impl Default for InMemoryOpnameRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl OpnameRepository for InMemoryOpnameRepository {
    fn allocate_id(&self) -> OpnameId {
        OpnameId::new(self.0.next_raw_id())
    }

    fn insert(&self, opname: Opname) {
        self.0.put(opname.id_typed(), opname);
    }

    fn get(&self, id: OpnameId) -> Option<Opname> {
        self.0.fetch(id)
    }

    fn with_opname<T, F>(&self, id: OpnameId, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut Opname) -> LedgerResult<T>,
    {
        self.0.mutate(id, f)
    }
}

/// In-memory inbound receipt store.
#[derive(Debug)]
pub struct InMemoryReceiptRepository(InMemoryRepository<ReceiptId, InboundReceipt>);

impl InMemoryReceiptRepository {
    pub fn new() -> Self {
        Self(InMemoryRepository::new("inbound receipt"))
    }
}

impl Default for InMemoryReceiptRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptRepository for InMemoryReceiptRepository {
    fn allocate_id(&self) -> ReceiptId {
        ReceiptId::new(self.0.next_raw_id())
    }

    fn insert(&self, receipt: InboundReceipt) {
        self.0.put(receipt.id_typed(), receipt);
    }

    fn get(&self, id: ReceiptId) -> Option<InboundReceipt> {
        self.0.fetch(id)
    }
}

/// In-memory outbound issue store.
#[derive(Debug)]
pub struct InMemoryIssueRepository(InMemoryRepository<IssueId, OutboundIssue>);

impl InMemoryIssueRepository {
    pub fn new() -> Self {
        Self(InMemoryRepository::new("outbound issue"))
    }
}

impl Default for InMemoryIssueRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl IssueRepository for InMemoryIssueRepository {
    fn allocate_id(&self) -> IssueId {
        IssueId::new(self.0.next_raw_id())
    }

    fn insert(&self, issue: OutboundIssue) {
        self.0.put(issue.id_typed(), issue);
    }

    fn get(&self, id: IssueId) -> Option<OutboundIssue> {
        self.0.fetch(id)
    }

    fn with_issue<T, F>(&self, id: IssueId, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut OutboundIssue) -> LedgerResult<T>,
    {
        self.0.mutate(id, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gudang_core::{ActorId, ProductId, WarehouseId};
    use rust_decimal_macros::dec;

    #[test]
    fn mutate_discards_the_working_copy_on_error() {
        let repo = InMemoryTransferRepository::new();
        let id = repo.allocate_id();
        let transfer = StockTransfer::dispatch(
            id,
            "TRF-000001",
            WarehouseId::new(1),
            WarehouseId::new(2),
            ProductId::new(1),
            dec!(20),
            ActorId::new(1),
            Utc::now(),
        )
        .unwrap();
        repo.insert(transfer);

        let result: LedgerResult<()> = repo.with_transfer(id, |t| {
            t.reject(ActorId::new(1), Utc::now())?;
            Err(DomainError::conflict("downstream failure").into())
        });
        assert!(result.is_err());

        // Failed closure: the staged reject never became visible.
        let stored = repo.get(id).unwrap();
        assert_eq!(stored.status(), gudang_transfer::TransferStatus::Pending);
    }

    #[test]
    fn mutate_missing_record_is_not_found() {
        let repo = InMemoryOpnameRepository::new();
        let err = repo
            .with_opname(OpnameId::new(404), |_| Ok(()))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Domain(DomainError::NotFound(_))
        ));
    }
}
