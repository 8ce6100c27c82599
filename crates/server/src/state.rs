use std::sync::Arc;

use fatoura_agent::SuggestionService;
use fatoura_db::{
    ClientRepository, InMemoryClientRepository, InMemoryInvoiceRepository,
    InMemoryProductRepository, InvoiceRepository, ProductRepository,
};

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub suggestions: Arc<SuggestionService>,
    pub clients: Arc<dyn ClientRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub currency: String,
}

impl AppState {
    pub fn in_memory(suggestions: SuggestionService, currency: impl Into<String>) -> Self {
        Self {
            suggestions: Arc::new(suggestions),
            clients: Arc::new(InMemoryClientRepository::default()),
            products: Arc::new(InMemoryProductRepository::default()),
            invoices: Arc::new(InMemoryInvoiceRepository::default()),
            currency: currency.into(),
        }
    }
}
