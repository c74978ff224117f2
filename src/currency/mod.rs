//! Money rounding and presentation helpers.
//!
//! Amounts are carried as `f64` through intermediate computation and snapped
//! to whole cents whenever they are stored or displayed.

/// Rounds to the nearest cent, halves away from zero.
pub fn round_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Rounds a percentage to two decimals, mapping non-finite input to zero.
pub fn round_pct(value: f64) -> f64 {
    round_cents(value)
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

/// Formats `amount` with a currency symbol, two decimals and `,` grouping.
pub fn format_amount(amount: f64, code: &str) -> String {
    let rounded = round_cents(amount);
    let body = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body.as_str(), "00"));
    let grouped = group_digits(int_part, ',');
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}{}.{}", sign, symbol_for(code), grouped, frac_part)
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
