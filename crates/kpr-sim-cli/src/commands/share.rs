use clap::Args;
use std::path::Path;

use kpr_sim_core::amortization::engine;
use kpr_sim_core::history::saved::SimulationHistory;
use kpr_sim_core::share::share_text;
use kpr_sim_core::KprSimError;

use crate::commands::{open_store, resolve_loan, LoanArgs};

/// Arguments for the chat-ready summary
#[derive(Args)]
pub struct ShareArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Share a saved simulation instead of running a new one
    #[arg(long)]
    pub id: Option<String>,
}

/// Returns plain text rather than a JSON value.
pub fn run_share(args: ShareArgs, data_dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let store = open_store(data_dir)?;

    if let Some(id) = args.id {
        let saved = SimulationHistory::new(&store)
            .get(&id)?
            .ok_or_else(|| KprSimError::NotFound(format!("saved simulation '{id}'")))?;
        let label = args.loan.client.as_deref().unwrap_or(&saved.client_label);
        return Ok(share_text(&saved.result, label));
    }

    let resolved = resolve_loan(&args.loan, &store)?;
    let output = engine::simulate(&resolved.spec)?;
    Ok(share_text(&output.result, &resolved.state.client_label))
}
