//! Display formatting for amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits shown for amounts (the dinar has 1000 millimes).
pub const DISPLAY_SCALE: u32 = 3;

/// Formats `amount` the French way with three decimals and a currency
/// suffix, e.g. `1 234,500 TND`.
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    let mut rounded =
        amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_SCALE);

    let text = rounded.abs().to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "000"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let currency = currency.trim();
    if currency.is_empty() {
        format!("{sign}{grouped},{fraction}")
    } else {
        format!("{sign}{grouped},{fraction} {currency}")
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::format_amount;

    #[test]
    fn uses_three_decimals_and_grouping() {
        assert_eq!(format_amount(Decimal::new(12_345, 1), "TND"), "1 234,500 TND");
        assert_eq!(format_amount(Decimal::from(2_975_000), "TND"), "2 975 000,000 TND");
        assert_eq!(format_amount(Decimal::ZERO, "TND"), "0,000 TND");
    }

    #[test]
    fn rounds_half_away_from_zero_at_the_millime() {
        assert_eq!(format_amount(Decimal::new(10_0005, 4), "TND"), "10,001 TND");
        assert_eq!(format_amount(Decimal::new(-10_0005, 4), "EUR"), "-10,001 EUR");
    }

    #[test]
    fn blank_currency_is_omitted() {
        assert_eq!(format_amount(Decimal::new(5, 1), " "), "0,500");
    }
}
