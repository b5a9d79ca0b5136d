// src/services/mod.rs

pub mod invoice_service;
pub mod pdf_service;
pub mod tax;
pub mod words;

pub use invoice_service::InvoiceService;
pub use pdf_service::PdfService;
