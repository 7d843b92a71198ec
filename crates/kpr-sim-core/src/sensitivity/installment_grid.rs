use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::engine::{compute_simulation, LoanSpecification};
use crate::error::KprSimError;
use crate::tenor::{years_to_months, TENOR_YEARS_OPTIONS};
use crate::types::*;
use crate::KprSimResult;

/// Most rows a rate sweep may expand to.
pub const MAX_SWEEP_POINTS: u32 = 200;

/// Evenly stepped rate axis, inclusive of both ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSweep {
    pub min: Percent,
    pub max: Percent,
    pub step: Percent,
}

/// Input for a rate × tenor instalment comparison table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentGridInput {
    /// Unit and financing inputs; rate and tenor are overridden per cell
    pub base: LoanSpecification,
    /// Explicit rate axis in percent p.a.
    #[serde(default)]
    pub rates_percent: Vec<Percent>,
    /// Stepped rate axis, used when `rates_percent` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_sweep: Option<RateSweep>,
    /// Tenor axis in years; defaults to the calculator's preset options
    #[serde(default)]
    pub tenor_years: Vec<u32>,
}

/// Output of the comparison table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentGridOutput {
    pub rates_percent: Vec<Percent>,
    pub tenor_years: Vec<u32>,
    pub principal_to_finance: Money,
    /// installments[i][j] = monthly instalment at rates_percent[i], tenor_years[j]
    pub installments: Vec<Vec<Money>>,
    /// total_payments[i][j] = instalment × tenor months
    pub total_payments: Vec<Vec<Money>>,
    /// Cell closest to the base specification's own rate and tenor (row, col)
    pub base_case_position: (usize, usize),
    pub base_case_installment: Money,
}

fn sweep_values(sweep: &RateSweep) -> KprSimResult<Vec<Percent>> {
    if sweep.step <= Decimal::ZERO {
        return Err(KprSimError::InvalidInput {
            field: "rate_sweep.step".into(),
            reason: "Step must be positive".into(),
        });
    }
    if sweep.min > sweep.max {
        return Err(KprSimError::InvalidInput {
            field: "rate_sweep".into(),
            reason: "Min must be <= max".into(),
        });
    }

    let points = (sweep.max - sweep.min)
        .checked_div(sweep.step)
        .unwrap_or(Decimal::MAX);
    if points >= Decimal::from(MAX_SWEEP_POINTS) {
        return Err(KprSimError::InvalidInput {
            field: "rate_sweep".into(),
            reason: format!("Sweep exceeds {MAX_SWEEP_POINTS} rates"),
        });
    }

    let mut values = Vec::new();
    let mut current = sweep.min;
    while current <= sweep.max {
        values.push(current);
        match current.checked_add(sweep.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    if let Some(&last) = values.last() {
        if last < sweep.max {
            values.push(sweep.max);
        }
    }
    Ok(values)
}

fn closest_index<T: Copy>(values: &[T], distance: impl Fn(T) -> Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| distance(**v))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Evaluate the engine over every (rate, tenor) pair.
pub fn installment_grid(
    input: &InstallmentGridInput,
) -> KprSimResult<ComputationOutput<InstallmentGridOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let rates = if !input.rates_percent.is_empty() {
        input.rates_percent.clone()
    } else if let Some(sweep) = &input.rate_sweep {
        sweep_values(sweep)?
    } else {
        return Err(KprSimError::InvalidInput {
            field: "rates_percent".into(),
            reason: "Provide rates_percent or rate_sweep".into(),
        });
    };
    if let Some(negative) = rates.iter().find(|r| **r < Decimal::ZERO) {
        return Err(KprSimError::InvalidRate(*negative));
    }

    let tenors = if input.tenor_years.is_empty() {
        TENOR_YEARS_OPTIONS.to_vec()
    } else {
        input.tenor_years.clone()
    };
    let tenor_months = tenors
        .iter()
        .map(|years| years_to_months(*years))
        .collect::<KprSimResult<Vec<u32>>>()?;

    // Validates the base case and fixes the principal shared by every cell
    let (base_result, base_warnings) = compute_simulation(&input.base)?;
    warnings.extend(base_warnings);

    let mut installments = Vec::with_capacity(rates.len());
    let mut total_payments = Vec::with_capacity(rates.len());

    for rate in &rates {
        let mut installment_row = Vec::with_capacity(tenors.len());
        let mut payment_row = Vec::with_capacity(tenors.len());
        for (years, months) in tenors.iter().zip(&tenor_months) {
            let mut spec = input.base.clone();
            spec.annual_interest_rate_percent = *rate;
            spec.tenor_months = *months;

            match compute_simulation(&spec) {
                Ok((cell, _)) => {
                    installment_row.push(cell.monthly_installment);
                    payment_row.push(cell.total_payment);
                }
                Err(e) => {
                    warnings.push(format!("Evaluation failed at ({rate}%, {years}y): {e}"));
                    installment_row.push(Decimal::ZERO);
                    payment_row.push(Decimal::ZERO);
                }
            }
        }
        installments.push(installment_row);
        total_payments.push(payment_row);
    }

    let base_rate = input.base.annual_interest_rate_percent;
    let base_months = Decimal::from(input.base.tenor_months);
    let row = closest_index(&rates, |r| (r - base_rate).abs());
    let col = closest_index(&tenors, |y| (Decimal::from(y) * Decimal::from(12) - base_months).abs());
    let base_case_installment = installments[row][col];

    let output = InstallmentGridOutput {
        rates_percent: rates,
        tenor_years: tenors,
        principal_to_finance: base_result.principal_to_finance,
        installments,
        total_payments,
        base_case_position: (row, col),
        base_case_installment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Instalment Comparison (Rate x Tenor)",
        &serde_json::json!({
            "method": input.base.method,
            "base_rate_percent": base_rate.to_string(),
            "base_tenor_months": input.base.tenor_months,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::engine::simulate;
    use crate::pricing::adjustment::Adjustment;
    use rust_decimal_macros::dec;

    fn grid_input() -> InstallmentGridInput {
        InstallmentGridInput {
            base: LoanSpecification {
                price_before_discount: dec!(500000000),
                discount: Adjustment::default(),
                down_payment: Adjustment::Amount(dec!(100000000)),
                booking_fee: Decimal::ZERO,
                annual_interest_rate_percent: dec!(3.75),
                tenor_months: 120,
                method: CalcMethod::Annuity,
                fees: None,
            },
            rates_percent: vec![dec!(3.75), dec!(5), dec!(7.5)],
            rate_sweep: None,
            tenor_years: vec![],
        }
    }

    #[test]
    fn test_grid_shape_and_default_tenors() {
        let out = installment_grid(&grid_input()).unwrap().result;
        assert_eq!(out.tenor_years, vec![5, 10, 15, 20]);
        assert_eq!(out.installments.len(), 3);
        assert_eq!(out.installments[0].len(), 4);
        assert_eq!(out.base_case_position, (0, 1));
    }

    #[test]
    fn test_cells_match_direct_simulation() {
        let input = grid_input();
        let out = installment_grid(&input).unwrap().result;

        let mut spec = input.base.clone();
        spec.annual_interest_rate_percent = dec!(5);
        spec.tenor_months = 180;
        let direct = simulate(&spec).unwrap().result;
        assert_eq!(out.installments[1][2], direct.monthly_installment);
        assert_eq!(out.total_payments[1][2], direct.total_payment);
    }

    #[test]
    fn test_monotonic_in_rate_and_tenor() {
        let out = installment_grid(&grid_input()).unwrap().result;
        for row in &out.installments {
            for pair in row.windows(2) {
                // longer tenor, smaller instalment
                assert!(pair[1] < pair[0]);
            }
        }
        for col in 0..out.tenor_years.len() {
            assert!(out.installments[0][col] < out.installments[1][col]);
            assert!(out.installments[1][col] < out.installments[2][col]);
        }
    }

    #[test]
    fn test_rate_sweep() {
        let mut input = grid_input();
        input.rates_percent.clear();
        input.rate_sweep = Some(RateSweep {
            min: dec!(3),
            max: dec!(4),
            step: dec!(0.4),
        });
        let out = installment_grid(&input).unwrap().result;
        assert_eq!(out.rates_percent, vec![dec!(3), dec!(3.4), dec!(3.8), dec!(4)]);
    }

    #[test]
    fn test_dense_rate_sweep_rejected() {
        let mut input = grid_input();
        input.rates_percent.clear();
        input.rate_sweep = Some(RateSweep {
            min: dec!(0),
            max: dec!(100),
            step: dec!(0.0001),
        });
        assert!(matches!(
            installment_grid(&input),
            Err(KprSimError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_missing_rate_axis() {
        let mut input = grid_input();
        input.rates_percent.clear();
        assert!(installment_grid(&input).is_err());
    }

    #[test]
    fn test_negative_rate_and_zero_tenor_rejected() {
        let mut input = grid_input();
        input.rates_percent = vec![dec!(-1)];
        assert!(matches!(
            installment_grid(&input),
            Err(KprSimError::InvalidRate(_))
        ));

        let mut input = grid_input();
        input.tenor_years = vec![0, 10];
        assert!(matches!(
            installment_grid(&input),
            Err(KprSimError::InvalidTenor(0))
        ));
    }

    #[test]
    fn test_tenor_past_maximum_rejected() {
        let mut input = grid_input();
        input.tenor_years = vec![10, 100];
        assert!(matches!(
            installment_grid(&input),
            Err(KprSimError::InvalidTenor(1200))
        ));

        input.tenor_years = vec![u32::MAX];
        assert!(matches!(
            installment_grid(&input),
            Err(KprSimError::InvalidTenor(u32::MAX))
        ));
    }
}
