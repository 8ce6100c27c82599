use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;

/// One invoice line. Only the inputs are stored; HT/TVA/TTC amounts are
/// always recomputed through [`LineItem::amounts`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub tax_rate_percent: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
}

/// Derived amounts of a single line: net (HT), tax (TVA) and gross (TTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAmounts {
    pub net: Decimal,
    pub tax: Decimal,
    pub gross: Decimal,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        tax_rate_percent: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            tax_rate_percent,
            product_id: None,
        }
    }

    pub fn with_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn net_amount(&self) -> Decimal {
        self.quantity.saturating_mul(self.unit_price)
    }

    pub fn tax_amount(&self) -> Decimal {
        self.net_amount().saturating_mul(self.tax_rate_percent) / Decimal::ONE_HUNDRED
    }

    pub fn gross_amount(&self) -> Decimal {
        self.amounts().gross
    }

    pub fn amounts(&self) -> LineAmounts {
        let net = self.net_amount();
        let tax = net.saturating_mul(self.tax_rate_percent) / Decimal::ONE_HUNDRED;
        LineAmounts { net, tax, gross: net.saturating_add(tax) }
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::LineItem;

    #[test]
    fn amounts_follow_quantity_price_and_rate() {
        let line = LineItem::new(
            "Conception et développement du site web",
            Decimal::from(2),
            Decimal::new(12_500, 1),
            Decimal::from(19),
        );

        let amounts = line.amounts();
        assert_eq!(amounts.net, Decimal::from(2500));
        assert_eq!(amounts.tax, Decimal::from(475));
        assert_eq!(amounts.gross, Decimal::from(2975));
        assert_eq!(amounts.gross, amounts.net + amounts.tax);
    }

    #[test]
    fn editing_an_input_changes_every_derived_amount() {
        let mut line =
            LineItem::new("Audit", Decimal::ONE, Decimal::from(1000), Decimal::from(19));
        assert_eq!(line.gross_amount(), Decimal::from(1190));

        line.quantity = Decimal::from(3);
        assert_eq!(line.net_amount(), Decimal::from(3000));
        assert_eq!(line.tax_amount(), Decimal::from(570));
        assert_eq!(line.gross_amount(), Decimal::from(3570));
    }

    #[test]
    fn huge_inputs_saturate_instead_of_panicking() {
        let line = LineItem::new("overflow", Decimal::MAX, Decimal::MAX, Decimal::from(100));
        let amounts = line.amounts();
        assert_eq!(amounts.net, Decimal::MAX);
        assert_eq!(amounts.gross, Decimal::MAX);
    }
}
