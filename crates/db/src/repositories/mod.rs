use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use fatoura_core::domain::client::{Client, ClientId};
use fatoura_core::domain::invoice::{Invoice, InvoiceId};
use fatoura_core::domain::product::{Product, ProductId};
use fatoura_core::errors::ApplicationError;

pub mod memory;

pub use memory::{InMemoryClientRepository, InMemoryInvoiceRepository, InMemoryProductRepository};

pub const INVOICE_NUMBER_PREFIX: &str = "FAC";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound { entity, id } => {
                Self::NotFound(format!("{entity} `{id}` not found"))
            }
            RepositoryError::Conflict(message) => Self::Persistence(message),
        }
    }
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Client>, RepositoryError>;
    async fn save(&self, client: Client) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn save(&self, product: Product) -> Result<(), RepositoryError>;

    /// Removes `quantity` units from stock, never going below zero, and
    /// returns the remaining quantity.
    async fn decrement_stock(
        &self,
        id: &ProductId,
        quantity: Decimal,
    ) -> Result<Decimal, RepositoryError>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, RepositoryError>;
    /// Newest first.
    async fn list(&self) -> Result<Vec<Invoice>, RepositoryError>;
    async fn save(&self, invoice: Invoice) -> Result<(), RepositoryError>;
    /// Allocates the next number of the year, e.g. `FAC-2024-0001`.
    async fn next_number(&self, year: i32) -> Result<String, RepositoryError>;
}

pub fn format_invoice_number(year: i32, sequence: u32) -> String {
    format!("{INVOICE_NUMBER_PREFIX}-{year}-{sequence:04}")
}

/// Extracts the sequence from a number allocated for `year`.
pub fn parse_invoice_sequence(number: &str, year: i32) -> Option<u32> {
    let prefix = format!("{INVOICE_NUMBER_PREFIX}-{year}-");
    number.strip_prefix(&prefix)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use fatoura_core::errors::ApplicationError;

    use super::{format_invoice_number, parse_invoice_sequence, RepositoryError};

    #[test]
    fn invoice_numbers_are_zero_padded_per_year() {
        assert_eq!(format_invoice_number(2024, 1), "FAC-2024-0001");
        assert_eq!(format_invoice_number(2025, 12345), "FAC-2025-12345");
    }

    #[test]
    fn sequence_is_only_read_for_matching_year() {
        assert_eq!(parse_invoice_sequence("FAC-2024-0042", 2024), Some(42));
        assert_eq!(parse_invoice_sequence("FAC-2023-0042", 2024), None);
        assert_eq!(parse_invoice_sequence("FAC-2024-abc", 2024), None);
    }

    #[test]
    fn repository_errors_map_to_application_errors() {
        let missing = ApplicationError::from(RepositoryError::NotFound {
            entity: "client",
            id: "C-9".to_string(),
        });
        assert_eq!(missing, ApplicationError::NotFound("client `C-9` not found".to_string()));

        let conflict = ApplicationError::from(RepositoryError::Conflict("taken".to_string()));
        assert!(matches!(conflict, ApplicationError::Persistence(_)));
    }
}
