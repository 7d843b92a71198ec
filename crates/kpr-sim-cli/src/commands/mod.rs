pub mod files;
pub mod grid;
pub mod history;
pub mod share;
pub mod simulate;

use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::path::Path;

use kpr_sim_core::amortization::engine::{LoanSpecification, SimulationResult};
use kpr_sim_core::history::calculator_state::CalculatorState;
use kpr_sim_core::pricing::adjustment::Adjustment;
use kpr_sim_core::pricing::breakdown::FinancingFees;
use kpr_sim_core::storage::file::JsonFileStore;
use kpr_sim_core::tenor::TenorSelection;
use kpr_sim_core::CalcMethod;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Flat,
    Annuity,
}

impl From<MethodArg> for CalcMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Flat => CalcMethod::Flat,
            MethodArg::Annuity => CalcMethod::Annuity,
        }
    }
}

/// Loan inputs shared by `simulate`, `schedule`, `grid` and `share`.
///
/// Flags left out fall back to the last-used calculator state.
#[derive(Args, Debug, Clone)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Price list before discount, in Rupiah
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Discount amount in Rupiah
    #[arg(long, conflicts_with = "discount_pct")]
    pub discount: Option<Decimal>,

    /// Discount as a percent of the price (10 = 10%)
    #[arg(long)]
    pub discount_pct: Option<Decimal>,

    /// Down payment amount in Rupiah
    #[arg(long, alias = "dp", conflicts_with = "dp_pct")]
    pub down_payment: Option<Decimal>,

    /// Down payment as a percent of the net price
    #[arg(long)]
    pub dp_pct: Option<Decimal>,

    /// Booking fee (UTJ) in Rupiah
    #[arg(long, alias = "utj")]
    pub booking_fee: Option<Decimal>,

    /// Annual interest rate in percent (3.75 = 3.75% p.a.)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenor in years
    #[arg(long, conflicts_with = "tenor_months")]
    pub tenor_years: Option<u32>,

    /// Tenor in months
    #[arg(long)]
    pub tenor_months: Option<u32>,

    /// Instalment method
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Bank admin fee financed with the loan
    #[arg(long)]
    pub admin_fee: Option<Decimal>,

    /// Insurance fee financed with the loan
    #[arg(long)]
    pub insurance_fee: Option<Decimal>,

    /// Client or unit label
    #[arg(long)]
    pub client: Option<String>,

    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// A loan specification plus the calculator state it was derived from.
pub struct ResolvedLoan {
    pub spec: LoanSpecification,
    pub state: CalculatorState,
}

pub fn open_store(data_dir: &Path) -> Result<JsonFileStore, Box<dyn std::error::Error>> {
    Ok(JsonFileStore::in_dir(data_dir)?)
}

/// Build the loan from `--input`, piped stdin, or flags over the stored state.
pub fn resolve_loan(
    args: &LoanArgs,
    store: &JsonFileStore,
) -> Result<ResolvedLoan, Box<dyn std::error::Error>> {
    let mut state = CalculatorState::load(store)?;
    if let Some(client) = &args.client {
        state.client_label = client.clone();
    }

    let spec: LoanSpecification = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(spec) = input::stdin::read_stdin()? {
        spec
    } else {
        spec_from_flags(args, &mut state)?
    };

    Ok(ResolvedLoan { spec, state })
}

fn spec_from_flags(
    args: &LoanArgs,
    state: &mut CalculatorState,
) -> Result<LoanSpecification, Box<dyn std::error::Error>> {
    if let Some(price) = args.price {
        state.price_before_discount = price;
    }
    if state.price_before_discount <= Decimal::ZERO {
        return Err("--price is required (or provide --input)".into());
    }
    if let Some(v) = args.booking_fee {
        state.booking_fee = v;
    }
    if let Some(v) = args.rate {
        state.annual_interest_rate_percent = v;
    }
    if let Some(years) = args.tenor_years {
        state.tenor = TenorSelection::from_years(years);
    }
    if let Some(m) = args.method {
        state.method = m.into();
    }

    let mut spec = state.to_specification()?;
    if let Some(months) = args.tenor_months {
        spec.tenor_months = months;
    }

    spec.discount = match (args.discount, args.discount_pct) {
        (Some(amount), _) => Adjustment::Amount(amount),
        (None, Some(pct)) => Adjustment::Percent(pct),
        (None, None) => spec.discount,
    };
    spec.down_payment = match (args.down_payment, args.dp_pct) {
        (Some(amount), _) => Adjustment::Amount(amount),
        (None, Some(pct)) => Adjustment::Percent(pct),
        (None, None) => spec.down_payment,
    };

    if args.admin_fee.is_some() || args.insurance_fee.is_some() {
        spec.fees = Some(FinancingFees {
            admin_fee: args.admin_fee.unwrap_or_default(),
            insurance_fee: args.insurance_fee.unwrap_or_default(),
        });
    }

    Ok(spec)
}

/// Copy the resolved inputs of a successful run back into the state.
pub fn remember(state: &mut CalculatorState, result: &SimulationResult) {
    state.price_before_discount = result.price_before_discount;
    state.discount_amount = result.discount_amount;
    state.discount_percent = result.discount_percent;
    state.down_payment_amount = result.down_payment_amount;
    state.down_payment_percent = result.down_payment_percent;
    state.booking_fee = result.booking_fee;
    state.annual_interest_rate_percent = result.annual_interest_rate_percent;
    state.method = result.method;
    if result.tenor_months % 12 == 0 {
        state.tenor = TenorSelection::from_years(result.tenor_months / 12);
    }
}
