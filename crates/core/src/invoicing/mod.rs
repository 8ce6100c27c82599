//! Invoice line computation and totals aggregation.
//!
//! Every amount here is derived from the four input fields of a [`LineItem`]
//! (description, quantity, unit price, tax rate). Nothing derived is stored:
//! callers recompute whenever a line is edited.

pub mod line;
pub mod tax;
pub mod totals;

pub use line::{LineAmounts, LineItem};
pub use tax::{compute_line, compute_line_from_raw, parse_amount};
pub use totals::{aggregate, InvoiceTotals};

use rust_decimal::Decimal;

/// Standard Tunisian VAT (TVA) rate, in percent.
pub const STANDARD_TAX_RATE: i64 = 19;

/// Quantity used when the caller gives none or something unparsable.
pub const DEFAULT_QUANTITY: i64 = 1;

pub fn standard_tax_rate() -> Decimal {
    Decimal::from(STANDARD_TAX_RATE)
}
