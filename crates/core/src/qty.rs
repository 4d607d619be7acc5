//! Quantity validation guards.
//!
//! Quantities are exact decimals (`rust_decimal::Decimal`); these helpers
//! centralize the malformed-quantity checks every workflow performs before
//! touching the ledger.

use rust_decimal::Decimal;

use crate::error::{DomainError, DomainResult};

/// Reject a quantity that is not strictly positive.
pub fn ensure_positive(qty: Decimal, what: &str) -> DomainResult<()> {
    if qty <= Decimal::ZERO {
        return Err(DomainError::invalid_quantity(format!(
            "{what} must be positive (got {qty})"
        )));
    }
    Ok(())
}

/// Reject a zero quantity (signed deltas may be negative).
pub fn ensure_nonzero(qty: Decimal, what: &str) -> DomainResult<()> {
    if qty.is_zero() {
        return Err(DomainError::invalid_quantity(format!("{what} must be nonzero")));
    }
    Ok(())
}

/// Reject a negative quantity (zero allowed).
pub fn ensure_non_negative(qty: Decimal, what: &str) -> DomainResult<()> {
    if qty < Decimal::ZERO {
        return Err(DomainError::invalid_quantity(format!(
            "{what} cannot be negative (got {qty})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn positive_guard() {
        assert!(ensure_positive(dec!(0.5), "qty").is_ok());
        assert!(ensure_positive(Decimal::ZERO, "qty").is_err());
        assert!(ensure_positive(dec!(-1), "qty").is_err());
    }

    #[test]
    fn nonzero_guard_allows_negative() {
        assert!(ensure_nonzero(dec!(-3), "delta").is_ok());
        assert!(ensure_nonzero(Decimal::ZERO, "delta").is_err());
    }

    #[test]
    fn non_negative_guard_allows_zero() {
        assert!(ensure_non_negative(Decimal::ZERO, "counted").is_ok());
        assert!(ensure_non_negative(dec!(-0.01), "counted").is_err());
    }
}
