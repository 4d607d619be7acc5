//! Document code generation.
//!
//! Every workflow record carries a human-readable code (`TRF-000001`,
//! `OPN-000001`, …) that ends up in history rows as the reference code.
//! The sequencer hands out gapless per-prefix sequences.

use std::collections::HashMap;
use std::sync::RwLock;

/// Thread-safe per-prefix code sequencer.
#[derive(Debug, Default)]
pub struct CodeSequencer {
    counters: RwLock<HashMap<String, u64>>,
}

impl CodeSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next code for a prefix, e.g. `next("TRF")` → `TRF-000001`.
    pub fn next(&self, prefix: &str) -> String {
        let mut counters = match self.counters.write() {
            Ok(c) => c,
            // A poisoned counter map only affects code aesthetics, not
            // ledger correctness; fall back to the poisoned value.
            Err(poisoned) => poisoned.into_inner(),
        };
        let counter = counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{prefix}-{:06}", counter)
    }
}
