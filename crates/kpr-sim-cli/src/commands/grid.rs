use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::path::Path;

use kpr_sim_core::sensitivity::installment_grid::{
    self, InstallmentGridInput, RateSweep,
};

use crate::commands::{open_store, resolve_loan, LoanArgs};
use crate::input;

/// Arguments for the rate x tenor instalment comparison
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct GridArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Rates to compare, comma separated (e.g. 3.25,3.75,4.5)
    #[arg(long, value_delimiter = ',')]
    pub rates: Vec<Decimal>,

    /// Lowest rate of a sweep
    #[arg(long, requires_all = ["rate_max", "rate_step"])]
    pub rate_min: Option<Decimal>,

    /// Highest rate of a sweep
    #[arg(long)]
    pub rate_max: Option<Decimal>,

    /// Sweep step in percentage points
    #[arg(long)]
    pub rate_step: Option<Decimal>,

    /// Tenors in years, comma separated (default: 5,10,15,20)
    #[arg(long, value_delimiter = ',')]
    pub tenors: Vec<u32>,
}

pub fn run_grid(args: GridArgs, data_dir: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    // A grid file carries its own base loan and axes
    let grid_input: InstallmentGridInput = if let Some(ref path) = args.loan.input {
        input::file::read_input(path)?
    } else {
        let store = open_store(data_dir)?;
        let resolved = resolve_loan(&args.loan, &store)?;
        let rate_sweep = match (args.rate_min, args.rate_max, args.rate_step) {
            (Some(min), Some(max), Some(step)) => Some(RateSweep { min, max, step }),
            _ => None,
        };
        let rates_percent = if args.rates.is_empty() && rate_sweep.is_none() {
            vec![resolved.spec.annual_interest_rate_percent]
        } else {
            args.rates
        };
        InstallmentGridInput {
            base: resolved.spec,
            rates_percent,
            rate_sweep,
            tenor_years: args.tenors,
        }
    };

    let result = installment_grid::installment_grid(&grid_input)?;
    Ok(serde_json::to_value(result)?)
}
