use chrono::Utc;
use clap::Args;
use serde_json::Value;
use std::path::Path;

use kpr_sim_core::amortization::engine;
use kpr_sim_core::history::saved::SimulationHistory;

use crate::commands::{open_store, remember, resolve_loan, LoanArgs};

/// Arguments for a mortgage simulation
#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Append the result to the saved simulation history
    #[arg(long)]
    pub save: bool,

    /// Include the month-by-month schedule in the output
    #[arg(long)]
    pub with_schedule: bool,
}

/// Arguments for printing the amortisation schedule only
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_simulate(
    args: SimulateArgs,
    data_dir: &Path,
) -> Result<Value, Box<dyn std::error::Error>> {
    let store = open_store(data_dir)?;
    let mut resolved = resolve_loan(&args.loan, &store)?;

    let output = engine::simulate(&resolved.spec)?;

    remember(&mut resolved.state, &output.result);
    resolved.state.save(&store)?;

    let saved_id = if args.save {
        let saved = SimulationHistory::new(&store).save(
            &resolved.state.client_label,
            output.result.clone(),
            Utc::now(),
        )?;
        Some(saved.id)
    } else {
        None
    };

    let mut value = serde_json::to_value(output)?;
    if !args.with_schedule {
        if let Some(Value::Object(result)) = value.get_mut("result") {
            result.remove("schedule");
        }
    }
    if let (Some(id), Value::Object(envelope)) = (saved_id, &mut value) {
        envelope.insert("saved_id".into(), Value::String(id));
    }
    Ok(value)
}

pub fn run_schedule(
    args: ScheduleArgs,
    data_dir: &Path,
) -> Result<Value, Box<dyn std::error::Error>> {
    let store = open_store(data_dir)?;
    let resolved = resolve_loan(&args.loan, &store)?;
    let output = engine::simulate(&resolved.spec)?;
    Ok(serde_json::to_value(output.result.schedule)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn loan_from_file(path: &Path) -> LoanArgs {
        LoanArgs {
            price: None,
            discount: None,
            discount_pct: None,
            down_payment: None,
            dp_pct: None,
            booking_fee: None,
            rate: None,
            tenor_years: None,
            tenor_months: None,
            method: None,
            admin_fee: None,
            insurance_fee: None,
            client: Some("Unit A-12".into()),
            input: Some(path.display().to_string()),
        }
    }

    fn write_spec(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("loan.json");
        fs::write(
            &path,
            r#"{
                "price_before_discount": "500000000",
                "down_payment": {"percent": 20},
                "annual_interest_rate_percent": "3.75",
                "tenor_months": 120
            }"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_save_reports_id_outside_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let spec_path = write_spec(dir.path());
        let args = SimulateArgs {
            loan: loan_from_file(&spec_path),
            save: true,
            with_schedule: false,
        };

        let value = run_simulate(args, &dir.path().join("data")).unwrap();

        let id = value["saved_id"].as_str().unwrap();
        assert!(!id.is_empty());
        assert_eq!(value["warnings"], serde_json::json!([]));
        assert!(value["result"].get("schedule").is_none());

        let store = open_store(&dir.path().join("data")).unwrap();
        let history = SimulationHistory::new(&store).list().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, id);
    }

    #[test]
    fn test_no_saved_id_without_save() {
        let dir = tempfile::tempdir().unwrap();
        let spec_path = write_spec(dir.path());
        let args = SimulateArgs {
            loan: loan_from_file(&spec_path),
            save: false,
            with_schedule: true,
        };

        let value = run_simulate(args, &dir.path().join("data")).unwrap();

        assert!(value.get("saved_id").is_none());
        assert_eq!(value["result"]["schedule"].as_array().unwrap().len(), 120);
    }
}
