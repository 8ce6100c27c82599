//! JSON shapes exchanged with the invoice editor. Line fields keep the
//! French names the editor already uses.

use fatoura_core::domain::product::ProductId;
use fatoura_core::format::format_amount;
use fatoura_core::invoicing::{compute_line, parse_amount, InvoiceTotals, LineItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Editor line as typed by the user: numbers may arrive as JSON numbers or
/// as text, and may be missing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LineInput {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantite: Option<Value>,
    #[serde(default)]
    pub prix_unitaire: Option<Value>,
    #[serde(default)]
    pub tva_rate: Option<Value>,
    #[serde(default)]
    pub product_id: Option<String>,
}

impl LineInput {
    pub fn to_line(&self) -> LineItem {
        let line = compute_line(
            self.description.trim(),
            amount(self.quantite.as_ref()),
            amount(self.prix_unitaire.as_ref()),
            amount(self.tva_rate.as_ref()),
        );
        match self.product_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => line.with_product(ProductId(id.to_string())),
            None => line,
        }
    }
}

fn amount(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(number) => parse_amount(&number.to_string()),
        Value::String(text) => parse_amount(text),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineView {
    pub description: String,
    pub quantite: Decimal,
    pub prix_unitaire: Decimal,
    pub tva_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub montant_ht: Decimal,
    pub montant_tva: Decimal,
    pub montant_ttc: Decimal,
}

impl From<&LineItem> for LineView {
    fn from(line: &LineItem) -> Self {
        let amounts = line.amounts();
        Self {
            description: line.description.clone(),
            quantite: line.quantity,
            prix_unitaire: line.unit_price,
            tva_rate: line.tax_rate_percent,
            product_id: line.product_id.clone(),
            montant_ht: amounts.net,
            montant_tva: amounts.tax,
            montant_ttc: amounts.gross,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TotalsView {
    pub total_ht: Decimal,
    pub total_tva: Decimal,
    pub total_ttc: Decimal,
    pub total_ttc_display: String,
}

impl TotalsView {
    pub fn new(totals: InvoiceTotals, currency: &str) -> Self {
        Self {
            total_ht: totals.subtotal_net,
            total_tva: totals.total_tax,
            total_ttc: totals.total_gross,
            total_ttc_display: format_amount(totals.total_gross, currency),
        }
    }
}

pub fn line_views(lines: &[LineItem]) -> Vec<LineView> {
    lines.iter().map(LineView::from).collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::{LineInput, LineView};

    fn input(value: serde_json::Value) -> LineInput {
        serde_json::from_value(value).expect("line input")
    }

    #[test]
    fn numbers_and_text_are_both_accepted() {
        let line = input(json!({
            "description": " Formation ",
            "quantite": 8,
            "prix_unitaire": "200,500",
            "tva_rate": 7
        }))
        .to_line();

        assert_eq!(line.description, "Formation");
        assert_eq!(line.quantity, Decimal::from(8));
        assert_eq!(line.unit_price, Decimal::new(200_500, 3));
        assert_eq!(line.tax_rate_percent, Decimal::from(7));
    }

    #[test]
    fn missing_or_unusable_numbers_take_defaults() {
        let line = input(json!({
            "description": "Nouvelle ligne",
            "prix_unitaire": null,
            "tva_rate": true
        }))
        .to_line();

        assert_eq!(line.quantity, Decimal::ONE);
        assert_eq!(line.unit_price, Decimal::ZERO);
        assert_eq!(line.tax_rate_percent, Decimal::from(19));
    }

    #[test]
    fn blank_product_reference_is_ignored() {
        let line = input(json!({ "description": "x", "product_id": "  " })).to_line();
        assert_eq!(line.product_id, None);

        let line = input(json!({ "description": "x", "product_id": "P-1" })).to_line();
        assert_eq!(line.product_id.map(|id| id.0), Some("P-1".to_string()));
    }

    #[test]
    fn view_carries_computed_amounts() {
        let line = input(json!({
            "description": "Site web",
            "quantite": 1,
            "prix_unitaire": 2500,
            "tva_rate": 19
        }))
        .to_line();

        let view = LineView::from(&line);

        assert_eq!(view.montant_ht, Decimal::from(2500));
        assert_eq!(view.montant_tva, Decimal::from(475));
        assert_eq!(view.montant_ttc, Decimal::from(2975));
    }
}
