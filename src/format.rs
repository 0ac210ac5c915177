use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::DisplayConfig;

fn group_int_digits(int_part: &str) -> String {
    // Insert commas every 3 digits.
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        out.push(ch);
        let remaining = len.saturating_sub(i + 1);
        if remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    }
    out
}

fn group_number_string(s: &str) -> String {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    let grouped = group_int_digits(int_part);
    match frac_part {
        Some(f) if !f.is_empty() => format!("{grouped}.{f}"),
        _ => grouped,
    }
}

/// Format a money value for display.
///
/// Rounding (half away from zero), grouping, and the currency symbol come
/// from [`DisplayConfig`]; the sign precedes the symbol. Calculations keep
/// full precision; this only affects rendering.
pub fn format_money(value: Decimal, display: &DisplayConfig) -> String {
    let rounded = match display.currency_decimals {
        Some(dp) => value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        None => value,
    };

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let mut s = rounded.abs().normalize().to_string();
    if display.currency_grouping {
        s = group_number_string(&s);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if let Some(symbol) = &display.currency_symbol {
        out.push_str(symbol);
    }
    out.push_str(&s);
    out
}

/// Format a percentage with an explicit sign and two decimal places.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("{}%", rounded.normalize())
    } else {
        format!("+{}%", rounded.normalize())
    }
}
