use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::client::ClientId;
use crate::errors::DomainError;
use crate::invoicing::{aggregate, InvoiceTotals, LineItem};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceId(pub String);

impl InvoiceId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    #[serde(rename = "brouillon")]
    Draft,
    #[serde(rename = "envoyee")]
    Sent,
    #[serde(rename = "payee")]
    Paid,
    #[serde(rename = "annulee")]
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub number: String,
    pub client_id: ClientId,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub currency: String,
    pub lines: Vec<LineItem>,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn totals(&self) -> InvoiceTotals {
        aggregate(&self.lines)
    }

    pub fn can_transition_to(&self, next: InvoiceStatus) -> bool {
        matches!(
            (self.status, next),
            (InvoiceStatus::Draft, InvoiceStatus::Sent)
                | (InvoiceStatus::Draft, InvoiceStatus::Cancelled)
                | (InvoiceStatus::Sent, InvoiceStatus::Paid)
                | (InvoiceStatus::Sent, InvoiceStatus::Cancelled)
        )
    }

    pub fn transition_to(&mut self, next: InvoiceStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidInvoiceTransition { from: self.status, to: next })
    }

    /// Checks the invoice before it is handed to storage.
    pub fn validate_for_save(&self) -> Result<(), DomainError> {
        if self.lines.is_empty() {
            return Err(DomainError::InvariantViolation(
                "an invoice needs at least one line".to_string(),
            ));
        }
        if let Some(position) = self.lines.iter().position(|line| !line.has_description()) {
            return Err(DomainError::InvariantViolation(format!(
                "line {} has no description",
                position + 1
            )));
        }
        for (index, line) in self.lines.iter().enumerate() {
            let number = index + 1;
            if line.quantity <= Decimal::ZERO {
                return Err(DomainError::InvariantViolation(format!(
                    "line {number} must have a positive quantity"
                )));
            }
            if line.unit_price < Decimal::ZERO {
                return Err(DomainError::InvariantViolation(format!(
                    "line {number} has a negative unit price"
                )));
            }
            if line.tax_rate_percent < Decimal::ZERO || line.tax_rate_percent > Decimal::ONE_HUNDRED {
                return Err(DomainError::InvariantViolation(format!(
                    "line {number} tax rate must be within 0..=100"
                )));
            }
        }
        Ok(())
    }

    /// A sent invoice whose due date is strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == InvoiceStatus::Sent && self.due_date.is_some_and(|due| due < today)
    }
}
