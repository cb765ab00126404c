//! Number formatting for reports

use rust_decimal::{Decimal, RoundingStrategy};

/// Two decimal places, half away from zero: `1234.5` → `1234.50`
pub fn format_fixed2(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Two decimal places with thousands separators: `1234567.891` → `1,234,567.89`
pub fn format_currency(value: Decimal) -> String {
    let fixed = format_fixed2(value);
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}.{}", sign, grouped, fraction)
}
