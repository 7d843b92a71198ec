use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::KprSimError;
use crate::types::{Money, Percent, Rate};
use crate::KprSimResult;

/// Convert an annual percent rate (3.75) into a periodic decimal rate.
pub fn periodic_rate(annual_percent: Percent, periods_per_year: u32) -> KprSimResult<Rate> {
    if periods_per_year == 0 {
        return Err(KprSimError::DivisionByZero {
            context: "periodic rate with zero periods per year".into(),
        });
    }
    Ok(annual_percent / dec!(100) / Decimal::from(periods_per_year))
}

/// Level payment that amortises `principal` to zero over `nper` periods.
///
/// Ordinary annuity (payments in arrears), returned as a positive amount.
/// A zero rate degenerates to straight division.
pub fn pmt(rate: Rate, nper: u32, principal: Money) -> KprSimResult<Money> {
    if nper == 0 {
        return Err(KprSimError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let overflow = || KprSimError::InvalidInput {
        field: "tenor_months".into(),
        reason: format!("annuity payment at {rate} per period over {nper} periods overflows decimal range"),
    };

    let one_plus_r = Decimal::ONE.checked_add(rate).ok_or_else(overflow)?;
    let factor = one_plus_r
        .checked_powi(i64::from(nper))
        .ok_or_else(overflow)?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        return Err(KprSimError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_periodic_rate_monthly() {
        assert_eq!(periodic_rate(dec!(3.75), 12).unwrap(), dec!(0.003125));
    }

    #[test]
    fn test_periodic_rate_zero_periods() {
        assert!(periodic_rate(dec!(3.75), 0).is_err());
    }

    #[test]
    fn test_pmt_basic() {
        // 400m over 120 months at 0.3125%/month ≈ 4,002,449.73
        let result = pmt(dec!(0.003125), 120, dec!(400000000)).unwrap();
        assert!((result - dec!(4002449.73)).abs() < dec!(0.01));
    }

    #[test]
    fn test_pmt_zero_rate() {
        let result = pmt(Decimal::ZERO, 4, dec!(1000)).unwrap();
        assert_eq!(result, dec!(250));
    }

    #[test]
    fn test_pmt_zero_periods() {
        assert!(pmt(dec!(0.01), 0, dec!(1000)).is_err());
    }

    #[test]
    fn test_pmt_single_period_repays_with_interest() {
        let result = pmt(dec!(0.01), 1, dec!(1000)).unwrap();
        assert_eq!(result, dec!(1010));
    }

    #[test]
    fn test_pmt_payment_overflow_is_an_error() {
        // 1.2^300 fits in a Decimal, principal * rate * factor does not
        let result = pmt(dec!(0.2), 300, dec!(400000000));
        assert!(matches!(result, Err(KprSimError::InvalidInput { ref field, .. }) if field == "tenor_months"));
    }

    #[test]
    fn test_pmt_factor_overflow_is_an_error() {
        assert!(pmt(dec!(0.5), 600, dec!(1000)).is_err());
    }
}
