use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;
use crate::invoicing::LineItem;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    /// Display label only, never converted
    pub currency: String,
    pub stock_quantity: Decimal,
    pub tax_rate_percent: Decimal,
}

impl Product {
    /// Pre-fills an invoice line from this product.
    pub fn to_line(&self, quantity: Decimal) -> LineItem {
        LineItem::new(self.name.clone(), quantity, self.unit_price, self.tax_rate_percent)
            .with_product(self.id.clone())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvariantViolation("product name is required".to_string()));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(DomainError::InvariantViolation(
                "product unit price must not be negative".to_string(),
            ));
        }
        if self.tax_rate_percent < Decimal::ZERO || self.tax_rate_percent > Decimal::ONE_HUNDRED {
            return Err(DomainError::InvariantViolation(
                "product tax rate must be within 0..=100".to_string(),
            ));
        }
        Ok(())
    }
}
