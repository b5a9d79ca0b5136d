// src/db/mod.rs

pub mod migrations;

pub mod party_repo;
pub use party_repo::PartyRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod invoice_repo;
pub use invoice_repo::InvoiceRepository;
