//! Reconciliation of small differences between a reported total and the sum of its parts.

use rust_decimal::Decimal;

/// Residuals smaller than this are display noise and never posted.
pub fn precision_floor() -> Decimal {
    Decimal::new(5, 4)
}

/// The correction to post so that `computed` plus the correction equals `expected`.
///
/// Returns `None` when the residual is below [`precision_floor`], or when it exceeds `tolerance`.
/// A residual over tolerance is left for the ledger's own validation to flag as an unbalanced
/// transaction.
pub fn reconcile(expected: Decimal, computed: Decimal, tolerance: Decimal) -> Option<Decimal> {
    let residual = expected - computed;
    let magnitude = residual.abs();
    if magnitude < precision_floor() {
        return None;
    }
    if magnitude > tolerance.abs() {
        log::warn!(
            "rounding residual {} exceeds tolerance {}, leaving it unreconciled",
            residual,
            tolerance
        );
        return None;
    }
    Some(residual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn floor() {
        assert_eq!(precision_floor(), dec!(0.0005));
    }

    #[test]
    fn noise_below_floor() {
        assert_eq!(reconcile(dec!(100.00), dec!(99.9996), dec!(0.04)), None);
        assert_eq!(reconcile(dec!(100.00), dec!(100.00), dec!(0.04)), None);
    }

    #[test]
    fn inside_band() {
        assert_eq!(reconcile(dec!(100.00), dec!(99.996), dec!(0.04)), Some(dec!(0.004)));
        assert_eq!(reconcile(dec!(100.00), dec!(99.95), dec!(0.05)), Some(dec!(0.05)));
        assert_eq!(reconcile(dec!(100.00), dec!(100.03), dec!(0.05)), Some(dec!(-0.03)));
        assert_eq!(reconcile(dec!(100.00), dec!(99.9995), dec!(0.04)), Some(dec!(0.0005)));
    }

    #[test]
    fn beyond_tolerance() {
        assert_eq!(reconcile(dec!(100.00), dec!(99.95), dec!(0.04)), None);
        assert_eq!(reconcile(dec!(100.00), dec!(90.00), dec!(0.11)), None);
    }
}
