use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::schedule::{annuity_schedule, flat_schedule, AmortizationRow};
use crate::error::KprSimError;
use crate::pricing::adjustment::Adjustment;
use crate::pricing::breakdown::{compute_breakdown, FinancingFees, PricingInput};
use crate::tenor::MAX_TENOR_MONTHS;
use crate::types::*;
use crate::KprSimResult;

/// Everything needed to simulate one unit's mortgage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSpecification {
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
    /// Annual rate in percent (3.75 = 3.75% p.a.)
    pub annual_interest_rate_percent: Percent,
    pub tenor_months: u32,
    #[serde(default)]
    pub method: CalcMethod,
    /// Admin and insurance fees financed with the loan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<FinancingFees>,
}

impl LoanSpecification {
    pub fn pricing_input(&self) -> PricingInput {
        PricingInput {
            price_before_discount: self.price_before_discount,
            discount: self.discount,
            down_payment: self.down_payment,
            booking_fee: self.booking_fee,
            fees: self.fees,
        }
    }
}

/// Computed simulation: input echoes, instalment, totals and schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub price_before_discount: Money,
    pub discount_amount: Money,
    pub discount_percent: Percent,
    pub net_price: Money,
    pub down_payment_amount: Money,
    pub down_payment_percent: Percent,
    pub booking_fee: Money,
    pub remaining_down_payment: Money,
    pub annual_interest_rate_percent: Percent,
    /// Plafond: net price less down payment
    pub loan_amount: Money,
    pub total_fees: Money,
    pub principal_to_finance: Money,
    pub tenor_months: u32,
    pub tenor_years: Decimal,
    pub method: CalcMethod,
    pub monthly_installment: Money,
    /// Instalment × tenor
    pub total_payment: Money,
    pub total_interest: Money,
    /// Total payment plus the down payment
    pub total_out_of_pocket: Money,
    pub schedule: Vec<AmortizationRow>,
}

fn validate(spec: &LoanSpecification) -> KprSimResult<()> {
    if spec.price_before_discount <= Decimal::ZERO {
        return Err(KprSimError::InvalidPrice(spec.price_before_discount));
    }
    if spec.tenor_months == 0 || spec.tenor_months > MAX_TENOR_MONTHS {
        return Err(KprSimError::InvalidTenor(spec.tenor_months));
    }
    if spec.annual_interest_rate_percent < Decimal::ZERO {
        return Err(KprSimError::InvalidRate(spec.annual_interest_rate_percent));
    }
    Ok(())
}

/// Run the engine, returning the result and any clamping notices.
pub(crate) fn compute_simulation(
    spec: &LoanSpecification,
) -> KprSimResult<(SimulationResult, Vec<String>)> {
    validate(spec)?;

    let (breakdown, mut warnings) = compute_breakdown(&spec.pricing_input())?;
    let principal = breakdown.principal_to_finance;
    let rate = spec.annual_interest_rate_percent;

    if principal.is_zero() {
        warnings.push("Nothing to finance: down payment covers the net price".into());
    }

    let outcome = match spec.method {
        CalcMethod::Flat => flat_schedule(principal, rate, spec.tenor_months)?,
        CalcMethod::Annuity => annuity_schedule(principal, rate, spec.tenor_months)?,
    };
    warnings.extend(outcome.warnings);

    let monthly_installment = outcome.monthly_installment;
    let overflow = || KprSimError::InvalidInput {
        field: "tenor_months".into(),
        reason: "total payment overflows decimal range".into(),
    };
    let total_payment = monthly_installment
        .checked_mul(Decimal::from(spec.tenor_months))
        .ok_or_else(overflow)?;
    let total_out_of_pocket = total_payment
        .checked_add(breakdown.down_payment_amount)
        .ok_or_else(overflow)?;

    let result = SimulationResult {
        price_before_discount: breakdown.price_before_discount,
        discount_amount: breakdown.discount_amount,
        discount_percent: breakdown.discount_percent,
        net_price: breakdown.net_price,
        down_payment_amount: breakdown.down_payment_amount,
        down_payment_percent: breakdown.down_payment_percent,
        booking_fee: breakdown.booking_fee,
        remaining_down_payment: breakdown.remaining_down_payment,
        annual_interest_rate_percent: rate,
        loan_amount: breakdown.loan_amount,
        total_fees: breakdown.total_fees,
        principal_to_finance: principal,
        tenor_months: spec.tenor_months,
        tenor_years: Decimal::from(spec.tenor_months) / dec!(12),
        method: spec.method,
        monthly_installment,
        total_payment,
        total_interest: total_payment - principal,
        total_out_of_pocket,
        schedule: outcome.rows,
    };

    Ok((result, warnings))
}

/// Simulate a mortgage: monthly instalment, totals and full payment schedule.
pub fn simulate(spec: &LoanSpecification) -> KprSimResult<ComputationOutput<SimulationResult>> {
    let start = Instant::now();
    let (result, warnings) = compute_simulation(spec)?;

    let methodology = match spec.method {
        CalcMethod::Flat => "KPR Simulation (Flat Interest)",
        CalcMethod::Annuity => "KPR Simulation (Annuity)",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "price_before_discount": spec.price_before_discount.to_string(),
            "discount": spec.discount,
            "down_payment": spec.down_payment,
            "booking_fee": spec.booking_fee.to_string(),
            "annual_interest_rate_percent": spec.annual_interest_rate_percent.to_string(),
            "tenor_months": spec.tenor_months,
            "fees": spec.fees,
            "rounding": "full decimal precision; final balance closed to zero within 0.01",
        }),
        warnings,
        elapsed,
        result,
    ))
}
