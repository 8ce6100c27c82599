pub mod config;
pub mod domain;
pub mod errors;
pub mod format;
pub mod invoicing;
pub mod suggestions;

pub use domain::client::{Client, ClientId, NewClient};
pub use domain::dashboard::DashboardStats;
pub use domain::invoice::{Invoice, InvoiceId, InvoiceStatus};
pub use domain::product::{Product, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use format::format_amount;
pub use invoicing::{aggregate, compute_line, InvoiceTotals, LineAmounts, LineItem};
pub use suggestions::{
    validate as validate_suggestions, ParseFailure, Provenance, SuggestionOutcome,
    SuggestionRequest,
};
