pub mod client;
pub mod dashboard;
pub mod invoice;
pub mod product;
