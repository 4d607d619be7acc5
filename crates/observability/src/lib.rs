//! `gudang-observability` — process-wide logging/tracing setup.
//!
//! The ledger emits structured events at every commit and rejection point
//! (`warehouse_id`, `product_id`, `reference`, quantities as fields); this
//! crate is where a process turns them into output.

pub mod tracing;

pub fn init() {
    tracing::init();
}
