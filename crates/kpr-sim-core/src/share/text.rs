use std::fmt::Write;

use crate::amortization::engine::SimulationResult;
use crate::share::format::{format_percent, format_rate, format_rupiah};

const HEADER: &str = "*Akasa Pure Living - Simulasi Properti*";
const RULE: &str = "---------------------------------";

fn tenor_label(months: u32) -> String {
    if months % 12 == 0 {
        format!("{} Tahun", months / 12)
    } else {
        format!("{months} Bulan")
    }
}

/// Chat-ready Indonesian summary of a simulation.
pub fn share_text(result: &SimulationResult, client_label: &str) -> String {
    let client = match client_label.trim() {
        "" => "-",
        label => label,
    };

    let mut out = String::new();
    // writeln! into a String cannot fail
    let _ = writeln!(out, "{HEADER}");
    let _ = writeln!(out, "Klien: {client}");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "Harga PL: {}",
        format_rupiah(result.price_before_discount)
    );
    let _ = writeln!(
        out,
        "Diskon: {}% ({})",
        format_percent(result.discount_percent),
        format_rupiah(result.discount_amount)
    );
    let _ = writeln!(out, "Harga Nett: {}", format_rupiah(result.net_price));
    let _ = writeln!(out);
    let _ = writeln!(out, "PEMBAYARAN AWAL:");
    let _ = writeln!(
        out,
        "DP Total: {}% ({})",
        format_percent(result.down_payment_percent),
        format_rupiah(result.down_payment_amount)
    );
    let _ = writeln!(
        out,
        "Booking Fee (UTJ): {}",
        format_rupiah(result.booking_fee)
    );
    let _ = writeln!(
        out,
        "*Sisa DP Dibayar: {}*",
        format_rupiah(result.remaining_down_payment)
    );
    let _ = writeln!(out, "(UTJ mengurangi nilai DP yang dibayar)");
    let _ = writeln!(out);
    let _ = writeln!(out, "KPR:");
    let _ = writeln!(out, "Plafond: {}", format_rupiah(result.loan_amount));
    if !result.total_fees.is_zero() {
        let _ = writeln!(
            out,
            "Biaya Admin & Asuransi: {}",
            format_rupiah(result.total_fees)
        );
    }
    let _ = writeln!(
        out,
        "Bunga: {}% p.a ({})",
        format_rate(result.annual_interest_rate_percent),
        result.method.label()
    );
    let _ = writeln!(out, "Tenor: {}", tenor_label(result.tenor_months));
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "ESTIMASI CICILAN:");
    let _ = writeln!(
        out,
        "*{} / bln*",
        format_rupiah(result.monthly_installment)
    );
    let _ = write!(out, "{RULE}");
    out
}
