use clap::{Args, Subcommand};
use serde_json::{json, Value};
use std::path::Path;

use kpr_sim_core::history::saved::SimulationHistory;
use kpr_sim_core::share::format_rupiah;
use kpr_sim_core::KprSimError;

use crate::commands::open_store;

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List saved simulations, newest first
    List,
    /// Show one saved simulation in full
    Show(HistoryIdArgs),
    /// Delete one saved simulation
    Delete(HistoryIdArgs),
    /// Delete every saved simulation
    Clear,
}

#[derive(Args)]
pub struct HistoryIdArgs {
    /// Saved simulation id
    #[arg(long)]
    pub id: String,
}

pub fn run_history(
    command: HistoryCommand,
    data_dir: &Path,
) -> Result<Value, Box<dyn std::error::Error>> {
    let store = open_store(data_dir)?;
    let history = SimulationHistory::new(&store);

    match command {
        HistoryCommand::List => {
            let rows: Vec<Value> = history
                .list()?
                .into_iter()
                .map(|s| {
                    json!({
                        "id": s.id,
                        "client_label": s.client_label,
                        "created_at": s.created_at.to_rfc3339(),
                        "method": s.result.method.label(),
                        "principal_to_finance": format_rupiah(s.result.principal_to_finance),
                        "tenor_months": s.result.tenor_months,
                        "monthly_installment": format_rupiah(s.result.monthly_installment),
                    })
                })
                .collect();
            Ok(Value::Array(rows))
        }
        HistoryCommand::Show(args) => {
            let saved = history
                .get(&args.id)?
                .ok_or_else(|| KprSimError::NotFound(format!("saved simulation '{}'", args.id)))?;
            Ok(json!({ "result": saved }))
        }
        HistoryCommand::Delete(args) => {
            if !history.delete(&args.id)? {
                return Err(KprSimError::NotFound(format!("saved simulation '{}'", args.id)).into());
            }
            Ok(json!({ "deleted": args.id }))
        }
        HistoryCommand::Clear => {
            history.clear()?;
            Ok(json!({ "cleared": true }))
        }
    }
}
