use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::types::{Money, Percent};

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Group the digits of a non-negative integer string with `.`.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Whole Rupiah with `.` grouping, e.g. `Rp 1.234.568`.
pub fn format_rupiah(value: Money) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let grouped = group_thousands(&rounded.abs().trunc().to_string());
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Two decimals with a comma separator, e.g. `10,00`.
pub fn format_percent(value: Percent) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}").replace('.', ",")
}

/// Rate as typed, trailing zeros dropped, comma separator (`3,75`).
pub fn format_rate(value: Percent) -> String {
    value.normalize().to_string().replace('.', ",")
}

/// Indonesian long date, e.g. `15 Maret 2024`.
pub fn format_date(date: NaiveDate) -> String {
    let month = MONTHS_ID[date.month0() as usize];
    format!("{} {} {}", date.day(), month, date.year())
}

/// Parse a number typed in Indonesian style.
///
/// Integer mode keeps digits only (`"Rp 1.500.000"` → 1500000). Float mode
/// reads `,` as the decimal point and stops at a second separator
/// (`"3,75%"` → 3.75). Anything unparsable yields zero.
pub fn parse_number(raw: &str, allow_float: bool) -> Decimal {
    if !allow_float {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        return Decimal::from_str(&digits).unwrap_or(Decimal::ZERO);
    }

    let cleaned: String = raw
        .chars()
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    // digits, then at most one fractional part
    let mut parts = cleaned.split('.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next().unwrap_or_default();
    let text = match (whole.is_empty(), frac.is_empty()) {
        (true, true) => return Decimal::ZERO,
        (true, false) => format!("0.{frac}"),
        (false, true) => whole.to_string(),
        (false, false) => format!("{whole}.{frac}"),
    };
    Decimal::from_str(&text).unwrap_or(Decimal::ZERO)
}
