// src/config.rs

use std::{env, path::PathBuf, time::Duration};

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::{
    db::{InvoiceRepository, PartyRepository, ProductRepository},
    models::party::PartyKind,
    services::{InvoiceService, PdfService},
};

/// Process-wide state, built once at startup and injected into every
/// handler through the router. There is no other shared mutable state.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub bind_addr: String,
    pub sellers: PartyRepository,
    pub receivers: PartyRepository,
    pub products: ProductRepository,
    pub invoice_service: InvoiceService,
    pub pdf_service: PdfService,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env_or("DATABASE_URL", "sqlite://invoice.db?mode=rwc");
        let bind_addr = env_or("BIND_ADDR", "0.0.0.0:3000");
        let output_dir = PathBuf::from(env_or("PDF_OUTPUT_DIR", "invoices"));
        let fonts_dir = PathBuf::from(env_or("FONTS_DIR", "fonts"));
        let font_family = env_or("FONT_FAMILY", "Roboto");

        let db_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!(%database_url, "database connection established");

        std::fs::create_dir_all(&output_dir)?;

        // Dependency graph.
        let sellers = PartyRepository::new(db_pool.clone(), PartyKind::Seller);
        let receivers = PartyRepository::new(db_pool.clone(), PartyKind::Receiver);
        let products = ProductRepository::new(db_pool.clone());
        let invoices = InvoiceRepository::new(db_pool.clone());
        let invoice_service = InvoiceService::new(
            sellers.clone(),
            receivers.clone(),
            products.clone(),
            invoices.clone(),
        );
        let pdf_service = PdfService::new(invoices, fonts_dir, font_family, output_dir);

        Ok(Self {
            db_pool,
            bind_addr,
            sellers,
            receivers,
            products,
            invoice_service,
            pdf_service,
        })
    }
}
