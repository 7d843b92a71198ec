use chrono::Utc;
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use kpr_sim_core::amortization::engine::{self, LoanSpecification, SimulationResult};
use kpr_sim_core::catalogue::files::{self as catalogue_files, SalesFile};
use kpr_sim_core::catalogue::query::{self, CatalogueQuery};
use kpr_sim_core::catalogue::upload::{self, UploadCandidate};
use kpr_sim_core::pricing::breakdown::{self, PricingInput};
use kpr_sim_core::sensitivity::installment_grid::{self as grid, InstallmentGridInput};
use kpr_sim_core::share;
use kpr_sim_core::tenor::TenorSelection;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_installment(input_json: String) -> NapiResult<String> {
    let input: LoanSpecification = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine::simulate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn price_breakdown(input_json: String) -> NapiResult<String> {
    let input: PricingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = breakdown::calculate_price_breakdown(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn installment_grid(input_json: String) -> NapiResult<String> {
    let input: InstallmentGridInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = grid::installment_grid(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn tenor_months(selection_json: String) -> NapiResult<u32> {
    let selection: TenorSelection =
        serde_json::from_str(&selection_json).map_err(to_napi_error)?;
    selection.months().map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sharing and formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn share_text(result_json: String, client_label: String) -> NapiResult<String> {
    let result: SimulationResult = serde_json::from_str(&result_json).map_err(to_napi_error)?;
    Ok(share::share_text(&result, &client_label))
}

#[napi]
pub fn format_rupiah(value: String) -> NapiResult<String> {
    let amount = Decimal::from_str(value.trim()).map_err(to_napi_error)?;
    Ok(share::format_rupiah(amount))
}

/// Parsed value as a decimal string.
#[napi]
pub fn parse_number(raw: String, allow_float: bool) -> String {
    share::parse_number(&raw, allow_float).to_string()
}

// ---------------------------------------------------------------------------
// Sales file catalogue
// ---------------------------------------------------------------------------

#[napi]
pub fn seed_files() -> NapiResult<String> {
    serde_json::to_string(&catalogue_files::seed_files()).map_err(to_napi_error)
}

#[napi]
pub fn filter_catalogue(files_json: String, query_json: String) -> NapiResult<String> {
    let files: Vec<SalesFile> = serde_json::from_str(&files_json).map_err(to_napi_error)?;
    let filter: CatalogueQuery = serde_json::from_str(&query_json).map_err(to_napi_error)?;
    serde_json::to_string(&query::filter_files(&files, &filter)).map_err(to_napi_error)
}

#[napi]
pub fn all_tags(files_json: String) -> NapiResult<String> {
    let files: Vec<SalesFile> = serde_json::from_str(&files_json).map_err(to_napi_error)?;
    serde_json::to_string(&query::all_tags(&files)).map_err(to_napi_error)
}

#[napi]
pub fn new_custom_link(url: String) -> NapiResult<String> {
    let now = Utc::now();
    let link = catalogue_files::new_custom_link(&url, now.date_naive(), now.timestamp_millis())
        .map_err(to_napi_error)?;
    serde_json::to_string(&link).map_err(to_napi_error)
}

#[napi]
pub fn plan_upload(candidate_json: String) -> NapiResult<String> {
    let candidate: UploadCandidate =
        serde_json::from_str(&candidate_json).map_err(to_napi_error)?;
    let plan = upload::plan_upload(&candidate, Utc::now()).map_err(to_napi_error)?;
    serde_json::to_string(&plan).map_err(to_napi_error)
}

#[napi]
pub fn plan_deletion(file_json: String) -> NapiResult<String> {
    let file: SalesFile = serde_json::from_str(&file_json).map_err(to_napi_error)?;
    let plan = catalogue_files::plan_deletion(&file).map_err(to_napi_error)?;
    serde_json::to_string(&plan).map_err(to_napi_error)
}
