use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::engine::LoanSpecification;
use crate::pricing::adjustment::Adjustment;
use crate::storage::{load_or_default, save, KeyValueStore, CALC_STATE_KEY};
use crate::tenor::TenorSelection;
use crate::types::*;
use crate::KprSimResult;

/// Last-used calculator inputs.
///
/// Every field has a default, so older or partial records still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorState {
    pub price_before_discount: Money,
    pub discount_amount: Money,
    pub discount_percent: Percent,
    pub down_payment_amount: Money,
    pub down_payment_percent: Percent,
    pub booking_fee: Money,
    pub annual_interest_rate_percent: Percent,
    pub tenor: TenorSelection,
    pub method: CalcMethod,
    pub client_label: String,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            price_before_discount: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            discount_percent: Decimal::ZERO,
            down_payment_amount: Decimal::ZERO,
            down_payment_percent: Decimal::ZERO,
            booking_fee: Decimal::ZERO,
            annual_interest_rate_percent: dec!(3.75),
            tenor: TenorSelection::default(),
            method: CalcMethod::Annuity,
            client_label: String::new(),
        }
    }
}

impl CalculatorState {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> KprSimResult<Self> {
        load_or_default(store, CALC_STATE_KEY)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> KprSimResult<()> {
        save(store, CALC_STATE_KEY, self)
    }

    /// Loan specification for these inputs. Amounts are the source of truth.
    pub fn to_specification(&self) -> KprSimResult<LoanSpecification> {
        Ok(LoanSpecification {
            price_before_discount: self.price_before_discount,
            discount: Adjustment::Amount(self.discount_amount),
            down_payment: Adjustment::Amount(self.down_payment_amount),
            booking_fee: self.booking_fee,
            annual_interest_rate_percent: self.annual_interest_rate_percent,
            tenor_months: self.tenor.months()?,
            method: self.method,
            fees: None,
        })
    }
}
