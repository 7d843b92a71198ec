//! Flat and annuity amortisation schedules.
//!
//! No intermediate rounding: every row keeps full `Decimal` precision. The
//! only adjustment is on the last period, where a residual balance within
//! [`SETTLEMENT_TOLERANCE`] is closed to exactly zero.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::time_value::{periodic_rate, pmt};
use crate::types::{Money, Percent};
use crate::error::KprSimError;
use crate::KprSimResult;

/// Largest residual (in currency units) the final period may close to zero.
pub const SETTLEMENT_TOLERANCE: Decimal = dec!(0.01);

const MONTHS_PER_YEAR: u32 = 12;

/// One month of the payment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based month number
    pub period: u32,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub installment: Money,
    /// Outstanding principal after this month's payment
    pub remaining_balance: Money,
}

/// Level instalment and the schedule that produces it.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    pub monthly_installment: Money,
    pub rows: Vec<AmortizationRow>,
    pub warnings: Vec<String>,
}

/// Flat method: interest on the original principal, spread evenly.
pub fn flat_schedule(
    principal: Money,
    annual_rate_percent: Percent,
    tenor_months: u32,
) -> KprSimResult<ScheduleOutcome> {
    let n = Decimal::from(tenor_months);
    // multiply before dividing so whole-year tenors stay exact
    let total_interest = principal
        .checked_mul(annual_rate_percent)
        .and_then(|v| v.checked_mul(n))
        .and_then(|v| v.checked_div(dec!(100) * Decimal::from(MONTHS_PER_YEAR)))
        .ok_or_else(|| overflow("flat interest"))?;

    let monthly_installment = principal
        .checked_add(total_interest)
        .ok_or_else(|| overflow("flat instalment"))?
        / n;
    let principal_portion = principal / n;
    let interest_portion = total_interest / n;

    let rows = (1..=tenor_months)
        .map(|period| AmortizationRow {
            period,
            interest_portion,
            principal_portion,
            installment: monthly_installment,
            remaining_balance: Decimal::from(period)
                .checked_mul(principal_portion)
                .map_or(Decimal::ZERO, |paid| (principal - paid).max(Decimal::ZERO)),
        })
        .collect();

    let mut outcome = ScheduleOutcome {
        monthly_installment,
        rows,
        warnings: Vec::new(),
    };
    close_final_balance(&mut outcome);
    Ok(outcome)
}

/// Annuity method: level instalment, interest on the declining balance.
pub fn annuity_schedule(
    principal: Money,
    annual_rate_percent: Percent,
    tenor_months: u32,
) -> KprSimResult<ScheduleOutcome> {
    let monthly_rate = periodic_rate(annual_rate_percent, MONTHS_PER_YEAR)?;
    let monthly_installment = pmt(monthly_rate, tenor_months, principal)?;

    let mut rows = Vec::with_capacity(tenor_months as usize);
    let mut remaining = principal;

    for period in 1..=tenor_months {
        let interest_portion = remaining
            .checked_mul(monthly_rate)
            .ok_or_else(|| overflow("annuity interest"))?;
        let principal_portion = monthly_installment - interest_portion;
        remaining = (remaining - principal_portion).max(Decimal::ZERO);

        rows.push(AmortizationRow {
            period,
            interest_portion,
            principal_portion,
            installment: monthly_installment,
            remaining_balance: remaining,
        });
    }

    let mut outcome = ScheduleOutcome {
        monthly_installment,
        rows,
        warnings: Vec::new(),
    };
    close_final_balance(&mut outcome);
    Ok(outcome)
}

fn overflow(what: &str) -> KprSimError {
    KprSimError::InvalidInput {
        field: "principal_to_finance".into(),
        reason: format!("{what} overflows decimal range"),
    }
}

fn close_final_balance(outcome: &mut ScheduleOutcome) {
    let Some(last) = outcome.rows.last_mut() else {
        return;
    };
    if last.remaining_balance <= SETTLEMENT_TOLERANCE {
        last.remaining_balance = Decimal::ZERO;
    } else {
        outcome.warnings.push(format!(
            "Schedule leaves residual balance {} after period {}",
            last.remaining_balance, last.period
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_flat_constant_split() {
        let out = flat_schedule(dec!(1200), dec!(10), 12).unwrap();
        // interest = 1200 * 10% * 1 year = 120
        assert_eq!(out.monthly_installment, dec!(110));
        for row in &out.rows {
            assert_eq!(row.principal_portion, dec!(100));
            assert_eq!(row.interest_portion, dec!(10));
        }
        assert_eq!(out.rows[0].remaining_balance, dec!(1100));
        assert_eq!(out.rows[5].remaining_balance, dec!(600));
        assert_eq!(out.rows[11].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_annuity_amortises_to_zero() {
        let out = annuity_schedule(dec!(1000000), dec!(12), 24).unwrap();
        assert_eq!(out.rows.len(), 24);
        assert_eq!(out.rows.last().unwrap().remaining_balance, Decimal::ZERO);

        let principal_sum: Decimal = out.rows.iter().map(|r| r.principal_portion).sum();
        assert!((principal_sum - dec!(1000000)).abs() < SETTLEMENT_TOLERANCE);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_annuity_interest_declines_principal_grows() {
        let out = annuity_schedule(dec!(1000000), dec!(12), 24).unwrap();
        for pair in out.rows.windows(2) {
            assert!(pair[1].interest_portion < pair[0].interest_portion);
            assert!(pair[1].principal_portion > pair[0].principal_portion);
            let split = pair[1].interest_portion + pair[1].principal_portion;
            assert!((split - out.monthly_installment).abs() < dec!(0.000001));
        }
    }

    #[test]
    fn test_annuity_first_row_interest() {
        // 1% per month on the full balance
        let out = annuity_schedule(dec!(1000000), dec!(12), 24).unwrap();
        assert_eq!(out.rows[0].interest_portion, dec!(10000));
    }

    #[test]
    fn test_annuity_zero_rate_is_straight_line() {
        let out = annuity_schedule(dec!(1200), Decimal::ZERO, 12).unwrap();
        assert_eq!(out.monthly_installment, dec!(100));
        assert!(out.rows.iter().all(|r| r.interest_portion.is_zero()));
        assert_eq!(out.rows[11].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_principal_schedule() {
        let out = annuity_schedule(Decimal::ZERO, dec!(5), 12).unwrap();
        assert_eq!(out.monthly_installment, Decimal::ZERO);
        assert!(out.rows.iter().all(|r| r.remaining_balance.is_zero()));
    }

    #[test]
    fn test_single_month_tenor() {
        let flat = flat_schedule(dec!(1200), dec!(12), 1).unwrap();
        // one month of 12% p.a. flat = 1%
        assert_eq!(flat.monthly_installment, dec!(1212));
        let annuity = annuity_schedule(dec!(1200), dec!(12), 1).unwrap();
        assert_eq!(annuity.monthly_installment, dec!(1212));
        assert_eq!(annuity.rows[0].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_flat_uneven_split_closes_to_zero() {
        // 1000 / 3 leaves a sub-cent remainder on the last month
        let out = flat_schedule(dec!(1000), dec!(5), 3).unwrap();
        assert_eq!(out.rows[2].remaining_balance, Decimal::ZERO);
        assert!(out.rows[1].remaining_balance > Decimal::ZERO);
        assert!(out.warnings.is_empty());

        let principal_sum: Decimal = out.rows.iter().map(|r| r.principal_portion).sum();
        assert!((principal_sum - dec!(1000)).abs() < SETTLEMENT_TOLERANCE);
    }

    fn single_row_outcome(remaining_balance: Decimal) -> ScheduleOutcome {
        ScheduleOutcome {
            monthly_installment: dec!(100),
            rows: vec![AmortizationRow {
                period: 12,
                interest_portion: dec!(1),
                principal_portion: dec!(99),
                installment: dec!(100),
                remaining_balance,
            }],
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_residual_within_tolerance_is_closed() {
        let mut outcome = single_row_outcome(dec!(0.01));
        close_final_balance(&mut outcome);
        assert_eq!(outcome.rows[0].remaining_balance, Decimal::ZERO);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_residual_above_tolerance_is_kept_and_warned() {
        let mut outcome = single_row_outcome(dec!(0.02));
        close_final_balance(&mut outcome);
        assert_eq!(outcome.rows[0].remaining_balance, dec!(0.02));
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("0.02"));
        assert!(outcome.warnings[0].contains("period 12"));
    }

    #[test]
    fn test_flat_interest_overflow_is_an_error() {
        let result = flat_schedule(Decimal::MAX, dec!(10), 120);
        assert!(matches!(result, Err(KprSimError::InvalidInput { .. })));
    }
}
