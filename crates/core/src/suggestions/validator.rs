//! Normalization of model replies into invoice lines.
//!
//! A reply is free text that should embed one JSON object of the shape
//! `{ "items": [{ "description", "quantite", "prix_unitaire", "tva_rate" }] }`.
//! The model may wrap it in prose, drop fields, send strings instead of
//! numbers or go out of range, so every field is defaulted and clamped on
//! its own.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::invoicing::{standard_tax_rate, LineItem, DEFAULT_QUANTITY};

pub const ITEMS_FIELD: &str = "items";
pub const DESCRIPTION_FIELD: &str = "description";
pub const QUANTITY_FIELD: &str = "quantite";
pub const UNIT_PRICE_FIELD: &str = "prix_unitaire";
pub const TAX_RATE_FIELD: &str = "tva_rate";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("no JSON object found in model reply")]
    NoJsonFound,
    #[error("malformed JSON in model reply: {0}")]
    MalformedJson(String),
    #[error("model reply has no `items` array")]
    InvalidShape,
}

impl ParseFailure {
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::NoJsonFound => "no_json_found",
            Self::MalformedJson(_) => "malformed_json",
            Self::InvalidShape => "invalid_shape",
        }
    }
}

/// Returns the slice from the first `{` to the last `}` of the trimmed text,
/// both inclusive.
pub fn extract_json_object(text: &str) -> Result<&str, ParseFailure> {
    let trimmed = text.trim();
    let start = trimmed.find('{').ok_or(ParseFailure::NoJsonFound)?;
    let end = trimmed.rfind('}').ok_or(ParseFailure::NoJsonFound)?;
    if end < start {
        return Err(ParseFailure::NoJsonFound);
    }

    Ok(&trimmed[start..=end])
}

/// Parses a model reply into clamped lines.
///
/// An empty result is a success: it means the reply was well-formed but
/// every element lacked a description.
pub fn validate(raw_text: &str) -> Result<Vec<LineItem>, ParseFailure> {
    let candidate = extract_json_object(raw_text)?;
    let parsed: Value = serde_json::from_str(candidate)
        .map_err(|error| ParseFailure::MalformedJson(error.to_string()))?;

    let items =
        parsed.get(ITEMS_FIELD).and_then(Value::as_array).ok_or(ParseFailure::InvalidShape)?;

    Ok(items.iter().filter_map(Value::as_object).filter_map(normalize_item).collect())
}

/// Serializes lines back into the reply shape accepted by [`validate`].
pub fn to_wire_json(items: &[LineItem]) -> String {
    let items: Vec<Value> = items
        .iter()
        .map(|item| {
            let mut object = Map::new();
            object.insert(DESCRIPTION_FIELD.to_string(), Value::String(item.description.clone()));
            object.insert(QUANTITY_FIELD.to_string(), Value::String(item.quantity.to_string()));
            object
                .insert(UNIT_PRICE_FIELD.to_string(), Value::String(item.unit_price.to_string()));
            object.insert(
                TAX_RATE_FIELD.to_string(),
                Value::String(item.tax_rate_percent.to_string()),
            );
            Value::Object(object)
        })
        .collect();

    let mut root = Map::new();
    root.insert(ITEMS_FIELD.to_string(), Value::Array(items));
    Value::Object(root).to_string()
}

/// Turns one raw item into a line, or `None` when it has no usable
/// description. Missing or unreadable numbers take their defaults;
/// readable ones are floored (quantity) or clamped (price, rate).
fn normalize_item(item: &Map<String, Value>) -> Option<LineItem> {
    let description = item.get(DESCRIPTION_FIELD)?.as_str()?.trim();
    if description.is_empty() {
        return None;
    }

    let quantity = number_field(item, QUANTITY_FIELD)
        .unwrap_or_else(|| Decimal::from(DEFAULT_QUANTITY))
        .max(min_quantity());
    let unit_price = number_field(item, UNIT_PRICE_FIELD).unwrap_or(Decimal::ZERO).max(Decimal::ZERO);
    let tax_rate = number_field(item, TAX_RATE_FIELD)
        .unwrap_or_else(standard_tax_rate)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    Some(LineItem::new(description, quantity, unit_price, tax_rate))
}

fn min_quantity() -> Decimal {
    Decimal::new(1, 2)
}

fn number_field(item: &Map<String, Value>, key: &str) -> Option<Decimal> {
    let text = match item.get(key)? {
        Value::Number(number) => number.to_string(),
        Value::String(text) => numeric_prefix(text)?.to_string(),
        _ => return None,
    };
    decimal_from_text(&text).or_else(|| saturate(&text))
}

/// Reads a finite number `Decimal` cannot hold: large magnitudes become
/// `Decimal::MAX` or `Decimal::MIN` by sign, tiny ones become zero.
fn saturate(text: &str) -> Option<Decimal> {
    let value = text.parse::<f64>().ok().filter(|value| value.is_finite())?;
    Some(if value.abs() < 1.0 {
        Decimal::ZERO
    } else if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

fn decimal_from_text(text: &str) -> Option<Decimal> {
    Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)).ok()
}

/// Longest leading `[+-]digits[.digits][e[+-]digits]` run, so `"12 TND"`
/// reads as 12 the way a lenient float parse would.
fn numeric_prefix(text: &str) -> Option<&str> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = if frac_end > frac_start { frac_end } else { end };
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    Some(&text[..end])
}
