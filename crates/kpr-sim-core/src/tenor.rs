use serde::{Deserialize, Serialize};

use crate::error::KprSimError;
use crate::KprSimResult;

/// Tenor year options offered on the calculator.
pub const TENOR_YEARS_OPTIONS: [u32; 4] = [5, 10, 15, 20];

/// Longest tenor the engine accepts. Each month is one schedule row.
pub const MAX_TENOR_MONTHS: u32 = 50 * 12;

/// Whole years to months, rejecting zero and anything past [`MAX_TENOR_MONTHS`].
pub fn years_to_months(years: u32) -> KprSimResult<u32> {
    years
        .checked_mul(12)
        .filter(|months| (1..=MAX_TENOR_MONTHS).contains(months))
        .ok_or(KprSimError::InvalidTenor(years.saturating_mul(12)))
}

/// Tenor picked by the salesperson: one of the preset options or a custom
/// year count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenorSelection {
    Preset(u32),
    Custom(u32),
}

impl Default for TenorSelection {
    fn default() -> Self {
        TenorSelection::Preset(10)
    }
}

impl TenorSelection {
    /// Build a selection from a year count, preferring the preset when it matches.
    pub fn from_years(years: u32) -> Self {
        if TENOR_YEARS_OPTIONS.contains(&years) {
            TenorSelection::Preset(years)
        } else {
            TenorSelection::Custom(years)
        }
    }

    pub fn years(&self) -> u32 {
        match self {
            TenorSelection::Preset(y) | TenorSelection::Custom(y) => *y,
        }
    }

    /// Tenor in whole months, the only unit the engine accepts.
    pub fn months(&self) -> KprSimResult<u32> {
        match *self {
            TenorSelection::Preset(years) if !TENOR_YEARS_OPTIONS.contains(&years) => {
                Err(KprSimError::InvalidInput {
                    field: "tenor".into(),
                    reason: format!(
                        "{years} years is not a preset option {TENOR_YEARS_OPTIONS:?}; use a custom tenor"
                    ),
                })
            }
            TenorSelection::Preset(years) | TenorSelection::Custom(years) => {
                years_to_months(years)
            }
        }
    }
}
