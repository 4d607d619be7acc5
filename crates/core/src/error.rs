//! Domain error model.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (missing
/// entities, malformed quantities, state-machine violations). Infrastructure
/// concerns (lock timeouts, poisoned locks) belong to the store layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced warehouse, product, party, or transaction does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A quantity is zero, negative where a positive value is required, or
    /// otherwise malformed.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A non-adjustment movement would drive the on-hand quantity negative.
    #[error("insufficient stock: available {available}, requested {requested}")]
    InsufficientStock {
        available: Decimal,
        requested: Decimal,
    },

    /// A workflow operation was attempted on an entity outside the required
    /// source state (e.g. receiving an already-received transfer).
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Idempotency violation (e.g. an opname approved twice).
    #[error("already processed: {0}")]
    AlreadyProcessed(String),

    /// A business-rule conflict not covered above (e.g. transfer source
    /// equals destination, archival blocked by dependents).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn insufficient_stock(available: Decimal, requested: Decimal) -> Self {
        Self::InsufficientStock {
            available,
            requested,
        }
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    pub fn already_processed(msg: impl Into<String>) -> Self {
        Self::AlreadyProcessed(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
