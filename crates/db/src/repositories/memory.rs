use std::collections::HashMap;

use rust_decimal::Decimal;
use tokio::sync::RwLock;

use fatoura_core::domain::client::{Client, ClientId};
use fatoura_core::domain::invoice::{Invoice, InvoiceId};
use fatoura_core::domain::product::{Product, ProductId};

use super::{
    format_invoice_number, parse_invoice_sequence, ClientRepository, InvoiceRepository,
    ProductRepository, RepositoryError,
};

#[derive(Default)]
pub struct InMemoryClientRepository {
    clients: RwLock<HashMap<String, Client>>,
}

#[async_trait::async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, RepositoryError> {
        let clients = self.clients.read().await;
        Ok(clients.get(&id.0).cloned())
    }

    async fn list(&self) -> Result<Vec<Client>, RepositoryError> {
        let clients = self.clients.read().await;
        let mut listed: Vec<Client> = clients.values().cloned().collect();
        listed.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(listed)
    }

    async fn save(&self, client: Client) -> Result<(), RepositoryError> {
        let mut clients = self.clients.write().await;
        clients.insert(client.id.0.clone(), client);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<String, Product>>,
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.get(&id.0).cloned())
    }

    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        let mut listed: Vec<Product> = products.values().cloned().collect();
        listed.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(listed)
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        products.insert(product.id.0.clone(), product);
        Ok(())
    }

    async fn decrement_stock(
        &self,
        id: &ProductId,
        quantity: Decimal,
    ) -> Result<Decimal, RepositoryError> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id.0)
            .ok_or_else(|| RepositoryError::NotFound { entity: "product", id: id.0.clone() })?;

        let remaining = (product.stock_quantity - quantity.max(Decimal::ZERO)).max(Decimal::ZERO);
        product.stock_quantity = remaining;
        Ok(remaining)
    }
}

#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    invoices: RwLock<HashMap<String, Invoice>>,
    sequences: RwLock<HashMap<i32, u32>>,
}

#[async_trait::async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, RepositoryError> {
        let invoices = self.invoices.read().await;
        Ok(invoices.get(&id.0).cloned())
    }

    async fn list(&self) -> Result<Vec<Invoice>, RepositoryError> {
        let invoices = self.invoices.read().await;
        let mut listed: Vec<Invoice> = invoices.values().cloned().collect();
        listed.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(listed)
    }

    async fn save(&self, invoice: Invoice) -> Result<(), RepositoryError> {
        let mut invoices = self.invoices.write().await;
        let duplicate = invoices
            .values()
            .any(|existing| existing.number == invoice.number && existing.id != invoice.id);
        if duplicate {
            return Err(RepositoryError::Conflict(format!(
                "invoice number `{}` is already used",
                invoice.number
            )));
        }
        invoices.insert(invoice.id.0.clone(), invoice);
        Ok(())
    }

    async fn next_number(&self, year: i32) -> Result<String, RepositoryError> {
        let invoices = self.invoices.read().await;
        let mut sequences = self.sequences.write().await;

        let highest_saved = invoices
            .values()
            .filter_map(|invoice| parse_invoice_sequence(&invoice.number, year))
            .max()
            .unwrap_or(0);
        let sequence = sequences.entry(year).or_insert(0);
        *sequence = (*sequence).max(highest_saved) + 1;

        Ok(format_invoice_number(year, *sequence))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use fatoura_core::domain::client::{Client, ClientId};
    use fatoura_core::domain::invoice::{Invoice, InvoiceId, InvoiceStatus};
    use fatoura_core::domain::product::{Product, ProductId};
    use fatoura_core::invoicing::LineItem;

    use crate::repositories::{
        ClientRepository, InMemoryClientRepository, InMemoryInvoiceRepository,
        InMemoryProductRepository, InvoiceRepository, ProductRepository, RepositoryError,
    };

    fn client(id: &str, name: &str) -> Client {
        Client {
            id: ClientId(id.to_string()),
            name: name.to_string(),
            email: None,
            phone: None,
            address: None,
            city: Some("Sfax".to_string()),
            postal_code: None,
            tax_number: None,
        }
    }

    fn product(id: &str, stock: i64) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: "Ramette papier A4".to_string(),
            description: None,
            unit_price: Decimal::new(12_500, 3),
            currency: "TND".to_string(),
            stock_quantity: Decimal::from(stock),
            tax_rate_percent: Decimal::from(19),
        }
    }

    fn invoice(id: &str, number: &str, created_second: u32) -> Invoice {
        Invoice {
            id: InvoiceId(id.to_string()),
            number: number.to_string(),
            client_id: ClientId("C-1".to_string()),
            issue_date: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
            due_date: None,
            currency: "TND".to_string(),
            lines: vec![LineItem::new(
                "Maintenance",
                Decimal::ONE,
                Decimal::from(300),
                Decimal::from(19),
            )],
            status: InvoiceStatus::Draft,
            notes: None,
            created_at: Utc
                .with_ymd_and_hms(2024, 3, 1, 9, 0, created_second)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[tokio::test]
    async fn in_memory_client_repo_round_trip() {
        let repo = InMemoryClientRepository::default();
        let saved = client("C-1", "Société Ben Salah");

        repo.save(saved.clone()).await.expect("save client");
        let found = repo.find_by_id(&saved.id).await.expect("find client");

        assert_eq!(found, Some(saved));
        assert_eq!(repo.find_by_id(&ClientId("missing".into())).await.expect("find"), None);
    }

    #[tokio::test]
    async fn clients_are_listed_by_name() {
        let repo = InMemoryClientRepository::default();
        repo.save(client("C-2", "Zitouna Services")).await.expect("save");
        repo.save(client("C-1", "Atelier Médina")).await.expect("save");

        let names: Vec<String> =
            repo.list().await.expect("list").into_iter().map(|client| client.name).collect();

        assert_eq!(names, vec!["Atelier Médina".to_string(), "Zitouna Services".to_string()]);
    }

    #[tokio::test]
    async fn stock_decrement_is_floored_at_zero() {
        let repo = InMemoryProductRepository::default();
        let saved = product("P-1", 5);
        repo.save(saved.clone()).await.expect("save product");

        let remaining = repo.decrement_stock(&saved.id, Decimal::from(3)).await.expect("decrement");
        assert_eq!(remaining, Decimal::from(2));

        let remaining = repo.decrement_stock(&saved.id, Decimal::from(10)).await.expect("decrement");
        assert_eq!(remaining, Decimal::ZERO);

        let stored = repo.find_by_id(&saved.id).await.expect("find").expect("present");
        assert_eq!(stored.stock_quantity, Decimal::ZERO);
    }

    #[tokio::test]
    async fn stock_decrement_on_unknown_product_is_not_found() {
        let repo = InMemoryProductRepository::default();

        let error = repo
            .decrement_stock(&ProductId("ghost".to_string()), Decimal::ONE)
            .await
            .expect_err("unknown product");

        assert!(matches!(error, RepositoryError::NotFound { entity: "product", .. }));
    }

    #[tokio::test]
    async fn invoice_numbers_are_sequential_per_year() {
        let repo = InMemoryInvoiceRepository::default();

        assert_eq!(repo.next_number(2024).await.expect("number"), "FAC-2024-0001");
        assert_eq!(repo.next_number(2024).await.expect("number"), "FAC-2024-0002");
        assert_eq!(repo.next_number(2025).await.expect("number"), "FAC-2025-0001");
    }

    #[tokio::test]
    async fn numbering_continues_after_saved_invoices() {
        let repo = InMemoryInvoiceRepository::default();
        repo.save(invoice("I-1", "FAC-2024-0007", 0)).await.expect("save invoice");

        assert_eq!(repo.next_number(2024).await.expect("number"), "FAC-2024-0008");
    }

    #[tokio::test]
    async fn duplicate_invoice_number_is_a_conflict() {
        let repo = InMemoryInvoiceRepository::default();
        repo.save(invoice("I-1", "FAC-2024-0001", 0)).await.expect("save invoice");

        let error =
            repo.save(invoice("I-2", "FAC-2024-0001", 1)).await.expect_err("duplicate number");
        assert!(matches!(error, RepositoryError::Conflict(_)));

        let mut updated = invoice("I-1", "FAC-2024-0001", 0);
        updated.status = InvoiceStatus::Sent;
        repo.save(updated).await.expect("re-saving the same invoice is allowed");
    }

    #[tokio::test]
    async fn invoices_are_listed_newest_first() {
        let repo = InMemoryInvoiceRepository::default();
        repo.save(invoice("I-1", "FAC-2024-0001", 0)).await.expect("save");
        repo.save(invoice("I-2", "FAC-2024-0002", 30)).await.expect("save");

        let ids: Vec<String> =
            repo.list().await.expect("list").into_iter().map(|invoice| invoice.id.0).collect();

        assert_eq!(ids, vec!["I-2".to_string(), "I-1".to_string()]);
    }
}
