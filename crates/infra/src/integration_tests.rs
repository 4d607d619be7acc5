//! Integration tests for the full ledger pipeline.
//!
//! Tests: Workflow → MutationEngine → LedgerStore → StockHistory
//!
//! Verifies:
//! - The four workflows drive the engine to the right balances
//! - Rejected operations leave zero trace (all-or-nothing)
//! - Concurrent mutations of one pair serialize with no lost updates
//! - The balance is always reconstructible from history

use std::sync::Arc;
use std::thread;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use gudang_core::{
    ActorId, CustomerId, DomainError, ProductId, Reference, ReferenceType, SupplierId,
    WarehouseId,
};
use gudang_inbound::{InboundWorkflow, ReceiveInbound};
use gudang_ledger::{
    AvailabilityChecker, InMemoryLedgerStore, LedgerError, LedgerStore, MutationEngine,
    MutationRequest,
};
use gudang_masters::{ContactInfo, InMemoryDirectory, Party, Product, Warehouse};
use gudang_opname::{ApproveOpname, DifferenceType, OpnameStatus, OpnameWorkflow, RecordCount};
use gudang_outbound::{
    CancelReservation, CommitReservation, IssueOutbound, IssueStatus, OutboundWorkflow,
    ReserveOutbound,
};
use gudang_transfer::{
    DispatchTransfer, ReceiveTransfer, RejectTransfer, TransferStatus, TransferWorkflow,
};

use crate::archival::Archival;
use crate::codes::CodeSequencer;
use crate::repos::{
    InMemoryIssueRepository, InMemoryOpnameRepository, InMemoryReceiptRepository,
    InMemoryTransferRepository,
};

type Store = Arc<InMemoryLedgerStore>;
type Dir = Arc<InMemoryDirectory>;

const WH_A: WarehouseId = WarehouseId::new(1);
const WH_B: WarehouseId = WarehouseId::new(2);
const PRODUCT: ProductId = ProductId::new(1);
const SUPPLIER: SupplierId = SupplierId::new(1);
const CUSTOMER: CustomerId = CustomerId::new(1);
const ACTOR: ActorId = ActorId::new(42);

struct World {
    store: Store,
    directory: Dir,
    codes: CodeSequencer,
    engine: MutationEngine<Store, Dir>,
    checker: AvailabilityChecker<Store, Dir>,
    inbound: InboundWorkflow<Store, Dir, Arc<InMemoryReceiptRepository>>,
    outbound: OutboundWorkflow<Store, Dir, Arc<InMemoryIssueRepository>>,
    transfer: TransferWorkflow<Store, Dir, Arc<InMemoryTransferRepository>>,
    opname: OpnameWorkflow<Store, Dir, Arc<InMemoryOpnameRepository>>,
}

impl World {
    fn new() -> Self {
        let store: Store = Arc::new(InMemoryLedgerStore::new());
        let directory: Dir = Arc::new(InMemoryDirectory::new());

        directory.upsert_warehouse(Warehouse::new(WH_A, "WH-A", "Gudang Pusat", None).unwrap());
        directory
            .upsert_warehouse(Warehouse::new(WH_B, "WH-B", "Gudang Cabang", None).unwrap());
        directory.upsert_product(Product::new(PRODUCT, "SKU-1", "Beras 5kg", "sak").unwrap());
        directory.upsert_supplier(
            Party::new(SUPPLIER, "CV Sumber Rejeki", ContactInfo::default()).unwrap(),
        );
        directory
            .upsert_customer(Party::new(CUSTOMER, "Toko Makmur", ContactInfo::default()).unwrap());

        Self {
            engine: MutationEngine::new(store.clone(), directory.clone()),
            checker: AvailabilityChecker::new(store.clone(), directory.clone()),
            inbound: InboundWorkflow::new(
                store.clone(),
                directory.clone(),
                Arc::new(InMemoryReceiptRepository::new()),
            ),
            outbound: OutboundWorkflow::new(
                store.clone(),
                directory.clone(),
                Arc::new(InMemoryIssueRepository::new()),
            ),
            transfer: TransferWorkflow::new(
                store.clone(),
                directory.clone(),
                Arc::new(InMemoryTransferRepository::new()),
            ),
            opname: OpnameWorkflow::new(
                store.clone(),
                directory.clone(),
                Arc::new(InMemoryOpnameRepository::new()),
            ),
            codes: CodeSequencer::new(),
            store,
            directory,
        }
    }

    fn stock_in(&self, warehouse_id: WarehouseId, qty: Decimal) {
        self.inbound
            .receive(ReceiveInbound {
                code: self.codes.next("INB"),
                supplier_id: SUPPLIER,
                warehouse_id,
                product_id: PRODUCT,
                quantity: qty,
                receipt_date: Utc::now(),
                notes: None,
                actor_id: ACTOR,
            })
            .unwrap();
    }

    fn issue_out(&self, warehouse_id: WarehouseId, qty: Decimal) -> Result<(), LedgerError> {
        self.outbound
            .issue(IssueOutbound {
                code: self.codes.next("OUT"),
                customer_id: CUSTOMER,
                warehouse_id,
                product_id: PRODUCT,
                quantity: qty,
                notes: None,
                actor_id: ACTOR,
            })
            .map(|_| ())
    }

    fn quantity(&self, warehouse_id: WarehouseId) -> Decimal {
        self.checker.info(warehouse_id, PRODUCT).unwrap().current
    }

    fn on_hand_from_history(&self, warehouse_id: WarehouseId) -> Decimal {
        self.store
            .history_for_pair(warehouse_id, PRODUCT)
            .unwrap()
            .iter()
            .filter(|h| h.moves_on_hand())
            .map(|h| h.change_qty)
            .sum()
    }
}

#[test]
fn inbound_then_outbound_then_oversell_rejected() {
    let world = World::new();

    world.stock_in(WH_A, dec!(100));
    assert_eq!(world.quantity(WH_A), dec!(100));

    let history = world.store.history_for_pair(WH_A, PRODUCT).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].previous_qty, Decimal::ZERO);
    assert_eq!(history[0].new_qty, dec!(100));
    assert_eq!(history[0].reference_type, ReferenceType::Inbound);

    world.issue_out(WH_A, dec!(30)).unwrap();
    assert_eq!(world.quantity(WH_A), dec!(70));

    let err = world.issue_out(WH_A, dec!(80)).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Domain(DomainError::InsufficientStock { .. })
    ));
    assert_eq!(world.quantity(WH_A), dec!(70));
    // The rejection left no trace in the audit trail.
    assert_eq!(world.store.history_for_pair(WH_A, PRODUCT).unwrap().len(), 2);
}

#[test]
fn transfer_receive_credits_the_received_quantity() {
    let world = World::new();
    world.stock_in(WH_A, dec!(70));

    let transfer = world
        .transfer
        .dispatch(DispatchTransfer {
            code: world.codes.next("TRF"),
            from_warehouse: WH_A,
            to_warehouse: WH_B,
            product_id: PRODUCT,
            quantity: dec!(20),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();
    assert_eq!(transfer.status(), TransferStatus::Pending);
    assert_eq!(world.quantity(WH_A), dec!(50));
    assert_eq!(world.quantity(WH_B), Decimal::ZERO);

    let received = world
        .transfer
        .receive(ReceiveTransfer {
            transfer_id: transfer.id_typed(),
            received_qty: dec!(18),
            damaged_qty: dec!(2),
            notes: Some("2 sak rusak dalam perjalanan".to_string()),
            actor_id: ACTOR,
        })
        .unwrap();

    assert_eq!(received.status(), TransferStatus::Received);
    assert_eq!(received.received_qty(), Some(dec!(18)));
    // Destination gets what arrived, not what was sent.
    assert_eq!(world.quantity(WH_B), dec!(18));

    // Terminal: a second receive is an invalid transition.
    let err = world
        .transfer
        .receive(ReceiveTransfer {
            transfer_id: transfer.id_typed(),
            received_qty: dec!(18),
            damaged_qty: dec!(2),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Domain(DomainError::InvalidStateTransition(_))
    ));
}

#[test]
fn transfer_reject_restores_the_source() {
    let world = World::new();
    world.stock_in(WH_A, dec!(70));

    let transfer = world
        .transfer
        .dispatch(DispatchTransfer {
            code: world.codes.next("TRF"),
            from_warehouse: WH_A,
            to_warehouse: WH_B,
            product_id: PRODUCT,
            quantity: dec!(20),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();
    assert_eq!(world.quantity(WH_A), dec!(50));

    let rejected = world
        .transfer
        .reject(RejectTransfer {
            transfer_id: transfer.id_typed(),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();

    assert_eq!(rejected.status(), TransferStatus::Rejected);
    assert_eq!(world.quantity(WH_A), dec!(70));
    assert_eq!(world.quantity(WH_B), Decimal::ZERO);

    // Both transfer legs are on record for the source: -20 and +20.
    let transfer_rows: Vec<_> = world
        .store
        .history_for_pair(WH_A, PRODUCT)
        .unwrap()
        .into_iter()
        .filter(|h| h.reference_type == ReferenceType::TransferOut)
        .collect();
    assert_eq!(transfer_rows.len(), 2);
    assert_eq!(transfer_rows[0].change_qty, dec!(-20));
    assert_eq!(transfer_rows[1].change_qty, dec!(20));
}

#[test]
fn transfer_dispatch_beyond_available_is_rejected() {
    let world = World::new();
    world.stock_in(WH_A, dec!(70));

    let err = world
        .transfer
        .dispatch(DispatchTransfer {
            code: world.codes.next("TRF"),
            from_warehouse: WH_A,
            to_warehouse: WH_B,
            product_id: PRODUCT,
            quantity: dec!(100),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Domain(DomainError::InsufficientStock { .. })
    ));
    assert_eq!(world.quantity(WH_A), dec!(70));
}

#[test]
fn transfer_total_loss_moves_nothing_at_the_destination() {
    let world = World::new();
    world.stock_in(WH_A, dec!(20));

    let transfer = world
        .transfer
        .dispatch(DispatchTransfer {
            code: world.codes.next("TRF"),
            from_warehouse: WH_A,
            to_warehouse: WH_B,
            product_id: PRODUCT,
            quantity: dec!(20),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();

    let received = world
        .transfer
        .receive(ReceiveTransfer {
            transfer_id: transfer.id_typed(),
            received_qty: Decimal::ZERO,
            damaged_qty: dec!(20),
            notes: Some("seluruh kiriman rusak".to_string()),
            actor_id: ACTOR,
        })
        .unwrap();

    assert_eq!(received.status(), TransferStatus::Received);
    assert_eq!(world.quantity(WH_B), Decimal::ZERO);
    assert!(world
        .store
        .history_for_pair(WH_B, PRODUCT)
        .unwrap()
        .is_empty());
}

#[test]
fn opname_surplus_adjusts_up_to_the_counted_quantity() {
    let world = World::new();
    world.stock_in(WH_A, dec!(70));

    let opname = world
        .opname
        .record(RecordCount {
            code: world.codes.next("OPN"),
            warehouse_id: WH_A,
            product_id: PRODUCT,
            counted_qty: dec!(75),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();

    assert_eq!(opname.system_qty(), dec!(70));
    assert_eq!(opname.difference_qty(), dec!(5));
    assert_eq!(opname.difference_type(), DifferenceType::Surplus);
    assert_eq!(opname.status(), OpnameStatus::Draft);

    let approved = world
        .opname
        .approve(ApproveOpname {
            opname_id: opname.id_typed(),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();

    assert_eq!(approved.status(), OpnameStatus::Approved);
    assert_eq!(world.quantity(WH_A), dec!(75));

    let adjustments = world
        .store
        .history_for_reference(ReferenceType::Adjustment, opname.id_typed().value())
        .unwrap();
    assert_eq!(adjustments.len(), 1);
    assert_eq!(adjustments[0].change_qty, dec!(5));
}

#[test]
fn opname_double_approval_is_rejected_with_one_adjustment_row() {
    let world = World::new();
    world.stock_in(WH_A, dec!(70));

    let opname = world
        .opname
        .record(RecordCount {
            code: world.codes.next("OPN"),
            warehouse_id: WH_A,
            product_id: PRODUCT,
            counted_qty: dec!(60),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();
    assert_eq!(opname.difference_type(), DifferenceType::Shortage);

    let approve = ApproveOpname {
        opname_id: opname.id_typed(),
        notes: None,
        actor_id: ACTOR,
    };
    world.opname.approve(approve.clone()).unwrap();
    assert_eq!(world.quantity(WH_A), dec!(60));

    let err = world.opname.approve(approve).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Domain(DomainError::AlreadyProcessed(_))
    ));

    // Exactly one adjustment ever reached the ledger.
    assert_eq!(
        world
            .store
            .history_for_reference(ReferenceType::Adjustment, opname.id_typed().value())
            .unwrap()
            .len(),
        1
    );
    assert_eq!(world.quantity(WH_A), dec!(60));
}

#[test]
fn opname_exact_match_needs_no_movement_but_still_approves_once() {
    let world = World::new();
    world.stock_in(WH_A, dec!(70));

    let opname = world
        .opname
        .record(RecordCount {
            code: world.codes.next("OPN"),
            warehouse_id: WH_A,
            product_id: PRODUCT,
            counted_qty: dec!(70),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();
    assert_eq!(opname.difference_type(), DifferenceType::Exact);

    let approve = ApproveOpname {
        opname_id: opname.id_typed(),
        notes: None,
        actor_id: ACTOR,
    };
    world.opname.approve(approve.clone()).unwrap();
    assert_eq!(world.quantity(WH_A), dec!(70));
    assert!(world
        .store
        .history_for_reference(ReferenceType::Adjustment, opname.id_typed().value())
        .unwrap()
        .is_empty());

    let err = world.opname.approve(approve).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Domain(DomainError::AlreadyProcessed(_))
    ));
}

#[test]
fn concurrent_increments_lose_nothing() {
    let world = World::new();
    let threads: usize = 8;
    let per_thread: usize = 5;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let engine = world.engine.clone();
            thread::spawn(move || {
                for i in 0..per_thread {
                    engine
                        .apply(MutationRequest {
                            warehouse_id: WH_A,
                            product_id: PRODUCT,
                            delta_qty: Decimal::ONE,
                            reference: Reference::new(
                                ReferenceType::Inbound,
                                (t * per_thread + i) as i64,
                                format!("INB-{t:02}{i:04}"),
                            ),
                            notes: None,
                            actor_id: ACTOR,
                        })
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let expected = Decimal::from((threads * per_thread) as i64);
    assert_eq!(world.quantity(WH_A), expected);

    let history = world.store.history_for_pair(WH_A, PRODUCT).unwrap();
    assert_eq!(history.len(), threads * per_thread);
    // Committed rows chain exactly: each previous_qty is the prior new_qty.
    for pair in history.windows(2) {
        assert_eq!(pair[1].previous_qty, pair[0].new_qty);
    }
    assert_eq!(world.on_hand_from_history(WH_A), expected);
}

#[test]
fn concurrent_oversell_lets_exactly_one_through() {
    let world = World::new();
    world.stock_in(WH_A, dec!(70));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let outbound = world.outbound.clone();
            let codes_code = world.codes.next("OUT");
            thread::spawn(move || {
                outbound
                    .issue(IssueOutbound {
                        code: codes_code,
                        customer_id: CUSTOMER,
                        warehouse_id: WH_A,
                        product_id: PRODUCT,
                        quantity: dec!(40),
                        notes: None,
                        actor_id: ACTOR,
                    })
                    .is_ok()
            })
        })
        .collect();
    let outcomes: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    assert_eq!(world.quantity(WH_A), dec!(30));
    assert_eq!(world.on_hand_from_history(WH_A), dec!(30));
}

#[test]
fn reservation_flow_earmarks_then_consumes() {
    let world = World::new();
    world.stock_in(WH_A, dec!(50));

    // Reserve, then think better of it.
    let cancelled = world
        .outbound
        .reserve(ReserveOutbound {
            code: world.codes.next("OUT"),
            customer_id: CUSTOMER,
            warehouse_id: WH_A,
            product_id: PRODUCT,
            quantity: dec!(20),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();
    let info = world.checker.info(WH_A, PRODUCT).unwrap();
    assert_eq!(info.current, dec!(50));
    assert_eq!(info.reserved, dec!(20));
    assert_eq!(info.available, dec!(30));

    world
        .outbound
        .cancel_reservation(CancelReservation {
            issue_id: cancelled.id_typed(),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();
    assert_eq!(world.checker.info(WH_A, PRODUCT).unwrap().available, dec!(50));

    // Reserve again and follow through.
    let issue = world
        .outbound
        .reserve(ReserveOutbound {
            code: world.codes.next("OUT"),
            customer_id: CUSTOMER,
            warehouse_id: WH_A,
            product_id: PRODUCT,
            quantity: dec!(20),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();
    let committed = world
        .outbound
        .commit_reserved(CommitReservation {
            issue_id: issue.id_typed(),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();

    assert_eq!(committed.status(), IssueStatus::Issued);
    let info = world.checker.info(WH_A, PRODUCT).unwrap();
    assert_eq!(info.current, dec!(30));
    assert_eq!(info.reserved, Decimal::ZERO);
    assert_eq!(info.available, dec!(30));

    // Committing again is an invalid transition; the balance is untouched.
    let err = world
        .outbound
        .commit_reserved(CommitReservation {
            issue_id: issue.id_typed(),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Domain(DomainError::InvalidStateTransition(_))
    ));
    assert_eq!(world.quantity(WH_A), dec!(30));
}

#[test]
fn ledger_reconstructs_after_mixed_workflows() {
    let world = World::new();

    world.stock_in(WH_A, dec!(100));
    world.issue_out(WH_A, dec!(30)).unwrap();

    let transfer = world
        .transfer
        .dispatch(DispatchTransfer {
            code: world.codes.next("TRF"),
            from_warehouse: WH_A,
            to_warehouse: WH_B,
            product_id: PRODUCT,
            quantity: dec!(25),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();
    world
        .transfer
        .receive(ReceiveTransfer {
            transfer_id: transfer.id_typed(),
            received_qty: dec!(24),
            damaged_qty: dec!(1),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();

    let opname = world
        .opname
        .record(RecordCount {
            code: world.codes.next("OPN"),
            warehouse_id: WH_A,
            product_id: PRODUCT,
            counted_qty: dec!(44),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();
    world
        .opname
        .approve(ApproveOpname {
            opname_id: opname.id_typed(),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap();

    for warehouse_id in [WH_A, WH_B] {
        let info = world.checker.info(warehouse_id, PRODUCT).unwrap();
        assert_eq!(info.available, info.current - info.reserved);
        assert_eq!(world.on_hand_from_history(warehouse_id), info.current);
    }
    assert_eq!(world.quantity(WH_A), dec!(44));
    assert_eq!(world.quantity(WH_B), dec!(24));
}

#[test]
fn archival_is_guarded_by_live_stock() {
    let world = World::new();
    let archival = Archival::new(world.directory.clone(), world.store.clone());

    world.stock_in(WH_B, dec!(10));
    let err = archival.archive_warehouse(WH_B).unwrap_err();
    assert!(matches!(err, LedgerError::Domain(DomainError::Conflict(_))));

    world.issue_out(WH_B, dec!(10)).unwrap();
    let archived = archival.archive_warehouse(WH_B).unwrap();
    assert!(!archived.is_active());

    // New business against an archived warehouse is refused...
    let err = world
        .transfer
        .dispatch(DispatchTransfer {
            code: world.codes.next("TRF"),
            from_warehouse: WH_A,
            to_warehouse: WH_B,
            product_id: PRODUCT,
            quantity: dec!(1),
            notes: None,
            actor_id: ACTOR,
        })
        .unwrap_err();
    assert!(matches!(err, LedgerError::Domain(DomainError::Conflict(_))));

    // ...but the engine still resolves it for historical/compensating moves.
    world
        .engine
        .apply(MutationRequest {
            warehouse_id: WH_B,
            product_id: PRODUCT,
            delta_qty: Decimal::ONE,
            reference: Reference::new(ReferenceType::Inbound, 999, "INB-999999"),
            notes: None,
            actor_id: ActorId::SYSTEM,
        })
        .unwrap();
}
