use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;

use gudang_core::{ActorId, ProductId, Reference, ReferenceType, WarehouseId};
use gudang_ledger::{InMemoryLedgerStore, MutationEngine, MutationRequest};
use gudang_masters::{InMemoryDirectory, Product, Warehouse};

/// Naive CRUD simulation: direct key-value updates (no locking per pair,
/// no history, no floor check).
#[derive(Debug, Clone)]
struct NaiveCrudStore {
    inner: Arc<RwLock<HashMap<(i64, i64), Decimal>>>,
}

impl NaiveCrudStore {
    fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn adjust(&self, warehouse: i64, product: i64, delta: Decimal) {
        let mut map = self.inner.write().unwrap();
        *map.entry((warehouse, product)).or_insert(Decimal::ZERO) += delta;
    }
}

fn setup_engine() -> MutationEngine<Arc<InMemoryLedgerStore>, Arc<InMemoryDirectory>> {
    let store = Arc::new(InMemoryLedgerStore::new());
    let directory = Arc::new(InMemoryDirectory::new());
    for w in 1..=8i64 {
        directory.upsert_warehouse(
            Warehouse::new(WarehouseId::new(w), format!("WH-{w:02}"), format!("Gudang {w}"), None)
                .unwrap(),
        );
    }
    directory.upsert_product(
        Product::new(ProductId::new(1), "SKU-1", "Beras 5kg", "sak").unwrap(),
    );
    MutationEngine::new(store, directory)
}

fn request(warehouse: i64, sequence: i64) -> MutationRequest {
    MutationRequest {
        warehouse_id: WarehouseId::new(warehouse),
        product_id: ProductId::new(1),
        delta_qty: Decimal::ONE,
        reference: Reference::new(ReferenceType::Inbound, sequence, format!("INB-{sequence:06}")),
        notes: None,
        actor_id: ActorId::SYSTEM,
    }
}

fn bench_mutation_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutation_latency");

    group.bench_function("naive_crud_adjust", |b| {
        let store = NaiveCrudStore::new();
        b.iter(|| {
            store.adjust(black_box(1), black_box(1), Decimal::ONE);
        });
    });

    group.bench_function("engine_apply", |b| {
        let engine = setup_engine();
        let mut sequence = 0i64;
        b.iter(|| {
            sequence += 1;
            engine.apply(black_box(request(1, sequence))).unwrap();
        });
    });

    group.finish();
}

fn bench_apply_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_throughput");

    for warehouses in [1i64, 4, 8] {
        group.throughput(Throughput::Elements(100));
        group.bench_with_input(
            BenchmarkId::new("movements_across_pairs", warehouses),
            &warehouses,
            |b, &warehouses| {
                let engine = setup_engine();
                let mut sequence = 0i64;
                b.iter(|| {
                    for i in 0..100i64 {
                        sequence += 1;
                        engine
                            .apply(request(i % warehouses + 1, sequence))
                            .unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_mutation_latency, bench_apply_throughput);
criterion_main!(benches);
