//! Percent ⇄ amount projections for discounts and down payments.
//!
//! The amount is the single source of truth. A percent input is converted to
//! a whole-Rupiah amount once, and the percent reported back is always
//! re-derived from that amount, so the two views cannot drift apart.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::KprSimError;
use crate::types::{Money, Percent};
use crate::KprSimResult;

const HUNDRED: Decimal = dec!(100);

/// A discount or down payment, entered either as an amount or as a percent
/// of its base (price for discounts, net price for down payments).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    Amount(Money),
    Percent(Percent),
}

impl Default for Adjustment {
    fn default() -> Self {
        Adjustment::Amount(Decimal::ZERO)
    }
}

/// An adjustment resolved against its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAdjustment {
    pub amount: Money,
    pub percent: Percent,
}

/// Whole-Rupiah amount for `percent` of `base`, rounded half away from zero.
pub fn amount_from_percent(base: Money, percent: Percent) -> Money {
    (base * percent / HUNDRED).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Percent of `base` represented by `amount`; zero when the base is not positive.
pub fn percent_from_amount(base: Money, amount: Money) -> Percent {
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    amount / base * HUNDRED
}

/// Resolve an adjustment against `base`, clamping into `[0, base]`.
///
/// Negative amounts or percents are rejected. Percents above 100 and amounts
/// above the base are clamped, with a warning pushed for the caller.
pub fn resolve_adjustment(
    field: &str,
    base: Money,
    adjustment: Adjustment,
    warnings: &mut Vec<String>,
) -> KprSimResult<ResolvedAdjustment> {
    let base = base.max(Decimal::ZERO);

    let amount = match adjustment {
        Adjustment::Amount(amount) => {
            if amount < Decimal::ZERO {
                return Err(KprSimError::InvalidInput {
                    field: field.into(),
                    reason: "Amount must not be negative".into(),
                });
            }
            if amount > base {
                warnings.push(format!(
                    "{field} amount {amount} exceeds its base {base}; clamped to {base}"
                ));
                base
            } else {
                amount
            }
        }
        Adjustment::Percent(percent) => {
            if percent < Decimal::ZERO {
                return Err(KprSimError::InvalidInput {
                    field: field.into(),
                    reason: "Percent must not be negative".into(),
                });
            }
            let clamped = if percent > HUNDRED {
                warnings.push(format!("{field} percent {percent} exceeds 100; clamped to 100"));
                HUNDRED
            } else {
                percent
            };
            amount_from_percent(base, clamped)
        }
    };

    Ok(ResolvedAdjustment {
        amount,
        percent: percent_from_amount(base, amount),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_to_amount() {
        let mut warnings = Vec::new();
        let r = resolve_adjustment(
            "discount",
            dec!(100000000),
            Adjustment::Percent(dec!(10)),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(r.amount, dec!(10000000));
        assert_eq!(r.percent, dec!(10));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_amount_to_percent() {
        let mut warnings = Vec::new();
        let r = resolve_adjustment(
            "discount",
            dec!(100000000),
            Adjustment::Amount(dec!(5000000)),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(r.amount, dec!(5000000));
        assert_eq!(r.percent, dec!(5));
    }

    #[test]
    fn test_fractional_percent_rounds_to_whole_rupiah() {
        // 2.5% of 999,999 = 24,999.975 -> 25,000
        assert_eq!(amount_from_percent(dec!(999999), dec!(2.5)), dec!(25000));
        // exact midpoint rounds away from zero: 50% of 3 = 1.5 -> 2
        assert_eq!(amount_from_percent(dec!(3), dec!(50)), dec!(2));
    }

    #[test]
    fn test_zero_base_has_zero_percent() {
        let mut warnings = Vec::new();
        let r = resolve_adjustment(
            "down_payment",
            Decimal::ZERO,
            Adjustment::Percent(dec!(20)),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(r.amount, Decimal::ZERO);
        assert_eq!(r.percent, Decimal::ZERO);
    }

    #[test]
    fn test_amount_above_base_is_clamped() {
        let mut warnings = Vec::new();
        let r = resolve_adjustment(
            "discount",
            dec!(1000),
            Adjustment::Amount(dec!(1500)),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(r.amount, dec!(1000));
        assert_eq!(r.percent, dec!(100));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_percent_above_hundred_is_clamped() {
        let mut warnings = Vec::new();
        let r = resolve_adjustment(
            "down_payment",
            dec!(1000),
            Adjustment::Percent(dec!(120)),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(r.amount, dec!(1000));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut warnings = Vec::new();
        assert!(resolve_adjustment(
            "discount",
            dec!(1000),
            Adjustment::Amount(dec!(-1)),
            &mut warnings
        )
        .is_err());
        assert!(resolve_adjustment(
            "discount",
            dec!(1000),
            Adjustment::Percent(dec!(-1)),
            &mut warnings
        )
        .is_err());
    }

    #[test]
    fn test_adjustment_deserializes_tagged() {
        let a: Adjustment = serde_json::from_str(r#"{"percent": 10}"#).unwrap();
        assert_eq!(a, Adjustment::Percent(dec!(10)));
        let b: Adjustment = serde_json::from_str(r#"{"amount": "5000000"}"#).unwrap();
        assert_eq!(b, Adjustment::Amount(dec!(5000000)));
    }
}
