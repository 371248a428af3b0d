use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parses a form amount. Only plain decimal notation is accepted.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Formats an amount as `<symbol><grouped integer>[.<fraction>]`, e.g. `₱1,234.5`.
///
/// At most two fraction digits are kept and trailing zeros are dropped.
pub fn format_currency(symbol: &str, amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (index, ch) in int_part.chars().enumerate() {
        if index > 0 && (int_part.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{sign}{symbol}{grouped}.{frac}"),
        None => format!("{sign}{symbol}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimals_only() {
        assert_eq!(parse_amount(" 150.25 "), Some(Decimal::new(15025, 2)));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("12abc"), None);
    }

    #[test]
    fn groups_thousands_and_trims_fraction() {
        assert_eq!(format_currency("₱", Decimal::new(1234500, 2)), "₱12,345");
        assert_eq!(format_currency("₱", Decimal::new(12345, 1)), "₱1,234.5");
        assert_eq!(format_currency("₱", Decimal::new(999, 0)), "₱999");
        assert_eq!(format_currency("₱", Decimal::ZERO), "₱0");
    }

    #[test]
    fn negative_balances_keep_their_sign() {
        assert_eq!(format_currency("$", Decimal::new(-250000, 2)), "-$2,500");
    }
}
