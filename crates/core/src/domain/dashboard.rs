use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::client::Client;
use crate::domain::invoice::{Invoice, InvoiceStatus};
use crate::domain::product::Product;

/// Headline figures for the business dashboard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub invoice_count: usize,
    /// Chiffre d'affaires: sum of every invoice's TTC total
    pub revenue: Decimal,
    pub client_count: usize,
    pub stock_on_hand: Decimal,
    pub pending_invoices: usize,
    pub overdue_invoices: usize,
}

impl DashboardStats {
    pub fn compute(
        invoices: &[Invoice],
        clients: &[Client],
        products: &[Product],
        today: NaiveDate,
    ) -> Self {
        Self {
            invoice_count: invoices.len(),
            revenue: invoices
                .iter()
                .map(|invoice| invoice.totals().total_gross)
                .fold(Decimal::ZERO, Decimal::saturating_add),
            client_count: clients.len(),
            stock_on_hand: products
                .iter()
                .map(|product| product.stock_quantity)
                .fold(Decimal::ZERO, Decimal::saturating_add),
            pending_invoices: invoices
                .iter()
                .filter(|invoice| invoice.status == InvoiceStatus::Sent)
                .count(),
            overdue_invoices: invoices.iter().filter(|invoice| invoice.is_overdue(today)).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use super::DashboardStats;
    use crate::domain::client::ClientId;
    use crate::domain::invoice::{Invoice, InvoiceId, InvoiceStatus};
    use crate::domain::product::{Product, ProductId};
    use crate::invoicing::LineItem;

    fn invoice(id: &str, status: InvoiceStatus, due: Option<NaiveDate>, price: i64) -> Invoice {
        Invoice {
            id: InvoiceId(id.to_string()),
            number: format!("FAC-{id}"),
            client_id: ClientId("C-1".to_string()),
            issue_date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("date"),
            due_date: due,
            currency: "TND".to_string(),
            lines: vec![LineItem::new("Service", Decimal::ONE, Decimal::from(price), Decimal::from(19))],
            status,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_business_has_zero_stats() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).expect("date");
        assert_eq!(DashboardStats::compute(&[], &[], &[], today), DashboardStats::default());
    }

    #[test]
    fn counts_revenue_pending_and_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 1).expect("date");
        let past = NaiveDate::from_ymd_opt(2026, 1, 15);
        let future = NaiveDate::from_ymd_opt(2026, 3, 1);
        let invoices = vec![
            invoice("1", InvoiceStatus::Sent, past, 100),
            invoice("2", InvoiceStatus::Sent, future, 200),
            invoice("3", InvoiceStatus::Paid, past, 300),
            invoice("4", InvoiceStatus::Draft, None, 400),
        ];
        let products = vec![Product {
            id: ProductId("P-1".to_string()),
            name: "Clavier".to_string(),
            description: None,
            unit_price: Decimal::from(45),
            currency: "TND".to_string(),
            stock_quantity: Decimal::from(12),
            tax_rate_percent: Decimal::from(19),
        }];

        let stats = DashboardStats::compute(&invoices, &[], &products, today);

        assert_eq!(stats.invoice_count, 4);
        assert_eq!(stats.revenue, Decimal::from(1190));
        assert_eq!(stats.stock_on_hand, Decimal::from(12));
        assert_eq!(stats.pending_invoices, 2);
        assert_eq!(stats.overdue_invoices, 1);
    }

    #[test]
    fn saturated_invoices_and_stock_do_not_overflow() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 1).expect("date");
        let huge_quantity = Decimal::from_i128_with_scale(70_000_000_000_000_000_000_000_000_000, 0);
        let mut first = invoice("1", InvoiceStatus::Draft, None, 1);
        first.lines[0].quantity = huge_quantity;
        let mut second = invoice("2", InvoiceStatus::Draft, None, 1);
        second.lines[0].quantity = huge_quantity;

        let stocked = |id: &str| Product {
            id: ProductId(id.to_string()),
            name: "Palette".to_string(),
            description: None,
            unit_price: Decimal::ONE,
            currency: "TND".to_string(),
            stock_quantity: Decimal::MAX,
            tax_rate_percent: Decimal::from(19),
        };

        let stats = DashboardStats::compute(
            &[first, second],
            &[],
            &[stocked("P-1"), stocked("P-2")],
            today,
        );

        assert_eq!(stats.revenue, Decimal::MAX);
        assert_eq!(stats.stock_on_hand, Decimal::MAX);
    }
}
