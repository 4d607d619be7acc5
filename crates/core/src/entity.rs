//! Entity trait: identity + continuity across state changes.

use serde::{Deserialize, Serialize};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Lifecycle state of a master entity.
///
/// Master records (warehouses, products, parties) are never hard-deleted:
/// archival keeps historical ledger rows resolvable. An archived entity may
/// still appear in history, but cannot participate in new transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    Active,
    Archived,
}

impl LifecycleStatus {
    pub fn is_active(self) -> bool {
        self == LifecycleStatus::Active
    }
}
