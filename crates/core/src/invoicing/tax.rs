use std::str::FromStr;

use rust_decimal::Decimal;

use super::{standard_tax_rate, LineItem, DEFAULT_QUANTITY};

/// Builds a line from possibly-missing numeric inputs.
///
/// Missing values take the same defaults as a fresh line in the invoice
/// editor: quantity 1, unit price 0, standard tax rate. No rounding happens
/// here; formatting to three decimals is left to [`crate::format`].
pub fn compute_line(
    description: impl Into<String>,
    quantity: Option<Decimal>,
    unit_price: Option<Decimal>,
    tax_rate_percent: Option<Decimal>,
) -> LineItem {
    LineItem::new(
        description,
        quantity.unwrap_or_else(|| Decimal::from(DEFAULT_QUANTITY)),
        unit_price.unwrap_or(Decimal::ZERO),
        tax_rate_percent.unwrap_or_else(standard_tax_rate),
    )
}

/// Same as [`compute_line`] but for raw form text.
pub fn compute_line_from_raw(
    description: impl Into<String>,
    quantity: &str,
    unit_price: &str,
    tax_rate_percent: &str,
) -> LineItem {
    compute_line(
        description,
        parse_amount(quantity),
        parse_amount(unit_price),
        parse_amount(tax_rate_percent),
    )
}

/// Parses a user-entered amount. Accepts `,` as the decimal separator and
/// scientific notation; anything else non-numeric yields `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let normalized: String = raw
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();
    if normalized.is_empty() {
        return None;
    }

    Decimal::from_str(&normalized).or_else(|_| Decimal::from_scientific(&normalized)).ok()
}
