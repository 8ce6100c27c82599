pub mod repositories;

pub use repositories::{
    ClientRepository, InMemoryClientRepository, InMemoryInvoiceRepository,
    InMemoryProductRepository, InvoiceRepository, ProductRepository, RepositoryError,
};
