use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::KprSimError;
use crate::pricing::adjustment::{resolve_adjustment, Adjustment};
use crate::types::*;
use crate::KprSimResult;

/// Optional fees financed on top of the loan amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingFees {
    #[serde(default)]
    pub admin_fee: Money,
    #[serde(default)]
    pub insurance_fee: Money,
}

/// Price-side inputs of a simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingInput {
    /// Price list (OTR) before any discount
    pub price_before_discount: Money,
    #[serde(default)]
    pub discount: Adjustment,
    /// Down payment, measured against the net price
    #[serde(default)]
    pub down_payment: Adjustment,
    /// Booking fee (UTJ), credited against the down payment
    #[serde(default)]
    pub booking_fee: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<FinancingFees>,
}

/// Every quantity derived from the price-side inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub price_before_discount: Money,
    pub discount_amount: Money,
    pub discount_percent: Percent,
    pub net_price: Money,
    pub down_payment_amount: Money,
    pub down_payment_percent: Percent,
    pub booking_fee: Money,
    pub remaining_down_payment: Money,
    /// Plafond: net price less down payment
    pub loan_amount: Money,
    pub admin_fee: Money,
    pub insurance_fee: Money,
    pub total_fees: Money,
    /// Loan amount plus financed fees
    pub principal_to_finance: Money,
}

/// Derive the price breakdown, returning clamping notices alongside it.
pub(crate) fn compute_breakdown(
    input: &PricingInput,
) -> KprSimResult<(PriceBreakdown, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();

    if input.price_before_discount <= Decimal::ZERO {
        return Err(KprSimError::InvalidPrice(input.price_before_discount));
    }
    if input.booking_fee < Decimal::ZERO {
        return Err(KprSimError::InvalidInput {
            field: "booking_fee".into(),
            reason: "Booking fee must not be negative".into(),
        });
    }

    let fees = input.fees.unwrap_or_default();
    if fees.admin_fee < Decimal::ZERO {
        return Err(KprSimError::InvalidInput {
            field: "admin_fee".into(),
            reason: "Admin fee must not be negative".into(),
        });
    }
    if fees.insurance_fee < Decimal::ZERO {
        return Err(KprSimError::InvalidInput {
            field: "insurance_fee".into(),
            reason: "Insurance fee must not be negative".into(),
        });
    }

    let price = input.price_before_discount;
    let discount = resolve_adjustment("discount", price, input.discount, &mut warnings)?;
    let net_price = (price - discount.amount).max(Decimal::ZERO);

    let down_payment =
        resolve_adjustment("down_payment", net_price, input.down_payment, &mut warnings)?;
    let loan_amount = (net_price - down_payment.amount).max(Decimal::ZERO);

    if input.booking_fee > down_payment.amount {
        warnings.push(format!(
            "Booking fee {} exceeds down payment {}; remaining down payment is zero",
            input.booking_fee, down_payment.amount
        ));
    }
    let remaining_down_payment = (down_payment.amount - input.booking_fee).max(Decimal::ZERO);

    let total_fees = fees.admin_fee + fees.insurance_fee;
    let principal_to_finance = loan_amount + total_fees;

    Ok((
        PriceBreakdown {
            price_before_discount: price,
            discount_amount: discount.amount,
            discount_percent: discount.percent,
            net_price,
            down_payment_amount: down_payment.amount,
            down_payment_percent: down_payment.percent,
            booking_fee: input.booking_fee,
            remaining_down_payment,
            loan_amount,
            admin_fee: fees.admin_fee,
            insurance_fee: fees.insurance_fee,
            total_fees,
            principal_to_finance,
        },
        warnings,
    ))
}

/// Net price, plafond and remaining down payment for a unit.
pub fn calculate_price_breakdown(
    input: &PricingInput,
) -> KprSimResult<ComputationOutput<PriceBreakdown>> {
    let start = Instant::now();
    let (breakdown, warnings) = compute_breakdown(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Unit Price Breakdown",
        &serde_json::json!({
            "price_before_discount": input.price_before_discount.to_string(),
            "discount": input.discount,
            "down_payment": input.down_payment,
            "booking_fee": input.booking_fee.to_string(),
        }),
        warnings,
        elapsed,
        breakdown,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn unit_input() -> PricingInput {
        PricingInput {
            price_before_discount: dec!(500000000),
            discount: Adjustment::Amount(Decimal::ZERO),
            down_payment: Adjustment::Amount(dec!(100000000)),
            booking_fee: Decimal::ZERO,
            fees: None,
        }
    }

    #[test]
    fn test_simple_breakdown() {
        let (b, warnings) = compute_breakdown(&unit_input()).unwrap();
        assert_eq!(b.net_price, dec!(500000000));
        assert_eq!(b.loan_amount, dec!(400000000));
        assert_eq!(b.principal_to_finance, dec!(400000000));
        assert_eq!(b.down_payment_percent, dec!(20));
        assert_eq!(b.remaining_down_payment, dec!(100000000));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_discount_then_down_payment_percent_on_net_price() {
        let mut input = unit_input();
        input.price_before_discount = dec!(100000000);
        input.discount = Adjustment::Percent(dec!(10));
        input.down_payment = Adjustment::Percent(dec!(20));

        let (b, _) = compute_breakdown(&input).unwrap();
        assert_eq!(b.discount_amount, dec!(10000000));
        assert_eq!(b.net_price, dec!(90000000));
        // DP percent applies to the net price, not the list price
        assert_eq!(b.down_payment_amount, dec!(18000000));
        assert_eq!(b.loan_amount, dec!(72000000));
    }

    #[test]
    fn test_booking_fee_reduces_remaining_down_payment() {
        let mut input = unit_input();
        input.booking_fee = dec!(10000000);
        let (b, _) = compute_breakdown(&input).unwrap();
        assert_eq!(b.remaining_down_payment, dec!(90000000));
        // booking fee never touches the principal
        assert_eq!(b.principal_to_finance, dec!(400000000));
    }

    #[test]
    fn test_booking_fee_above_down_payment_floors_at_zero() {
        let mut input = unit_input();
        input.down_payment = Adjustment::Amount(dec!(5000000));
        input.booking_fee = dec!(10000000);
        let (b, warnings) = compute_breakdown(&input).unwrap();
        assert_eq!(b.remaining_down_payment, Decimal::ZERO);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_fees_are_financed() {
        let mut input = unit_input();
        input.fees = Some(FinancingFees {
            admin_fee: dec!(2500000),
            insurance_fee: dec!(7500000),
        });
        let (b, _) = compute_breakdown(&input).unwrap();
        assert_eq!(b.total_fees, dec!(10000000));
        assert_eq!(b.loan_amount, dec!(400000000));
        assert_eq!(b.principal_to_finance, dec!(410000000));
    }

    #[test]
    fn test_full_discount_leaves_nothing_to_finance() {
        let mut input = unit_input();
        input.discount = Adjustment::Percent(dec!(100));
        let (b, _) = compute_breakdown(&input).unwrap();
        assert_eq!(b.net_price, Decimal::ZERO);
        assert_eq!(b.down_payment_amount, Decimal::ZERO);
        assert_eq!(b.down_payment_percent, Decimal::ZERO);
        assert_eq!(b.principal_to_finance, Decimal::ZERO);
    }

    #[test]
    fn test_invalid_price() {
        let mut input = unit_input();
        input.price_before_discount = Decimal::ZERO;
        assert!(matches!(
            compute_breakdown(&input),
            Err(KprSimError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_negative_fee_rejected() {
        let mut input = unit_input();
        input.fees = Some(FinancingFees {
            admin_fee: dec!(-1),
            insurance_fee: Decimal::ZERO,
        });
        assert!(compute_breakdown(&input).is_err());
        input.fees = None;
        input.booking_fee = dec!(-1);
        assert!(compute_breakdown(&input).is_err());
    }

    #[test]
    fn test_envelope_carries_methodology() {
        let out = calculate_price_breakdown(&unit_input()).unwrap();
        assert_eq!(out.methodology, "Unit Price Breakdown");
        assert_eq!(out.result.loan_amount, dec!(400000000));
    }
}
