// src/services/invoice_service.rs

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{InvoiceRepository, PartyRepository, ProductRepository},
    db::invoice_repo::NewInvoice,
    models::invoice::Invoice,
    services::tax::{self, LineInput},
};

/// One raw line as submitted by the form. Product resolution and all
/// arithmetic happen in the service / calculator.
#[derive(Debug, Clone)]
pub struct LineSubmission {
    pub product_id: i64,
    pub rate: Decimal,
    pub qty: Decimal,
    pub discount: Decimal,
}

/// Orchestrates invoice creation: resolves the parties and products, runs
/// the tax calculator, and persists header + items atomically.
#[derive(Clone)]
pub struct InvoiceService {
    sellers: PartyRepository,
    receivers: PartyRepository,
    products: ProductRepository,
    invoices: InvoiceRepository,
}

impl InvoiceService {
    pub fn new(
        sellers: PartyRepository,
        receivers: PartyRepository,
        products: ProductRepository,
        invoices: InvoiceRepository,
    ) -> Self {
        Self {
            sellers,
            receivers,
            products,
            invoices,
        }
    }

    pub async fn create_invoice(
        &self,
        invoice_no: Option<String>,
        date: &str,
        seller_id: i64,
        receiver_id: i64,
        lines: &[LineSubmission],
    ) -> Result<Invoice, AppError> {
        let seller = self.sellers.find(seller_id).await?;
        let receiver = self.receivers.find(receiver_id).await?;

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| AppError::BadRequest("date must be in YYYY-MM-DD format".to_string()))?
            .format("%d-%m-%Y")
            .to_string();

        // Best-effort number, second resolution. Uniqueness is a business
        // convention here, not a constraint.
        let invoice_no = match invoice_no.filter(|n| !n.trim().is_empty()) {
            Some(n) => n,
            None => format!("AUTO-{}", Local::now().format("%Y%m%d%H%M%S")),
        };

        let same_state = seller.state == receiver.state;

        let mut inputs = Vec::with_capacity(lines.len());
        for line in lines {
            // Empty form rows are dropped before the product lookup, so a
            // blank row never fails the whole invoice.
            if line.rate.is_zero() || line.qty.is_zero() {
                continue;
            }
            let product = self.products.find(line.product_id).await?;
            inputs.push(LineInput {
                product_id: product.id,
                gst_rate: product.gst_rate,
                rate: line.rate,
                qty: line.qty,
                discount: line.discount,
            });
        }

        let breakdown = tax::compute_invoice(same_state, &inputs)?;

        let invoice = self
            .invoices
            .create(
                NewInvoice {
                    invoice_no: &invoice_no,
                    date: &date,
                    seller_id,
                    receiver_id,
                    totals: &breakdown.totals,
                },
                &breakdown.lines,
            )
            .await?;

        tracing::info!(
            invoice_no = %invoice.invoice_no,
            items = breakdown.lines.len(),
            total = %invoice.total,
            "invoice created"
        );

        Ok(invoice)
    }

    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        self.invoices.list().await
    }
}
