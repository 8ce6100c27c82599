use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LineItem;

/// Invoice-level sums: sous-total HT, total TVA, total TTC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal_net: Decimal,
    pub total_tax: Decimal,
    pub total_gross: Decimal,
}

/// Sums each line's own net/tax/gross triple, in line order.
pub fn aggregate(lines: &[LineItem]) -> InvoiceTotals {
    lines.iter().map(LineItem::amounts).fold(InvoiceTotals::default(), |totals, amounts| {
        InvoiceTotals {
            subtotal_net: totals.subtotal_net.saturating_add(amounts.net),
            total_tax: totals.total_tax.saturating_add(amounts.tax),
            total_gross: totals.total_gross.saturating_add(amounts.gross),
        }
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{aggregate, InvoiceTotals};
    use crate::invoicing::LineItem;

    fn line(quantity: i64, unit_price: Decimal, rate: i64) -> LineItem {
        LineItem::new("ligne", Decimal::from(quantity), unit_price, Decimal::from(rate))
    }

    #[test]
    fn empty_invoice_has_zero_totals() {
        assert_eq!(aggregate(&[]), InvoiceTotals::default());
        assert_eq!(aggregate(&[]).total_gross, Decimal::ZERO);
    }

    #[test]
    fn totals_sum_every_line() {
        let lines = vec![
            line(1, Decimal::from(2500), 19),
            line(1, Decimal::from(800), 19),
            line(4, Decimal::from(150), 7),
        ];

        let totals = aggregate(&lines);

        assert_eq!(totals.subtotal_net, Decimal::from(3900));
        assert_eq!(totals.total_tax, Decimal::from(669));
        assert_eq!(totals.total_gross, Decimal::from(4569));
    }

    #[test]
    fn gross_total_equals_net_plus_tax_for_fractional_lines() {
        let lines = vec![
            line(3, Decimal::new(33_333, 3), 19),
            line(7, Decimal::new(1, 3), 13),
            line(2, Decimal::new(99_999, 2), 0),
        ];

        let totals = aggregate(&lines);
        let per_line_gross: Decimal = lines.iter().map(LineItem::gross_amount).sum();

        assert_eq!(totals.total_gross, totals.subtotal_net + totals.total_tax);
        assert_eq!(totals.total_gross, per_line_gross);
    }
}
