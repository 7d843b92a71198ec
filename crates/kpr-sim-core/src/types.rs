use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values (Rupiah). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates as entered by a salesperson: percent values (3.75 = 3.75% p.a.).
pub type Percent = Decimal;

/// Rates expressed as decimals (0.003125 = 0.3125% per month).
pub type Rate = Decimal;

/// Instalment calculation method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcMethod {
    /// Interest charged once on the original principal, spread evenly
    Flat,
    /// Fixed instalment, interest/principal split shifts as the balance amortises
    #[default]
    Annuity,
}

impl CalcMethod {
    pub fn label(&self) -> &'static str {
        match self {
            CalcMethod::Flat => "Flat",
            CalcMethod::Annuity => "Anuitas",
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
