// src/models/invoice.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use super::{parse_money, party::Party};

/// Persisted invoice header. The tax split is frozen at creation time and is
/// never re-derived; `total == taxable + cgst + sgst + igst` always holds.
#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    pub id: i64,
    pub invoice_no: String,
    pub date: String,
    pub seller_id: i64,
    pub receiver_id: i64,
    pub taxable: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total: Decimal,
}

/// One persisted invoice line. Submitted lines with zero rate or quantity
/// never make it this far.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceItem {
    pub id: i64,
    pub invoice_id: i64,
    pub product_id: i64,
    pub rate: Decimal,
    pub qty: Decimal,
    pub discount: Decimal,
    pub taxable: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
}

/// Computed amounts for one retained line, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct LineAmounts {
    pub product_id: i64,
    pub rate: Decimal,
    pub qty: Decimal,
    pub discount: Decimal,
    pub taxable: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
}

/// Invoice-level aggregates produced by the tax calculator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceTotals {
    pub taxable: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total: Decimal,
}

/// The fully joined graph the document renderer works from.
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    pub invoice: Invoice,
    pub seller: Party,
    pub receiver: Party,
    pub items: Vec<DocumentItem>,
}

/// An invoice line joined with the product fields the document prints.
#[derive(Debug, Clone)]
pub struct DocumentItem {
    pub item: InvoiceItem,
    pub product_name: String,
    pub hsn: String,
    pub gst_rate: Decimal,
}

// --- Raw rows (TEXT money) ---

#[derive(Debug, FromRow)]
pub struct InvoiceRow {
    pub id: i64,
    pub invoice_no: String,
    pub date: String,
    pub seller_id: i64,
    pub receiver_id: i64,
    pub taxable: String,
    pub cgst: String,
    pub sgst: String,
    pub igst: String,
    pub total: String,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = sqlx::Error;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        Ok(Invoice {
            id: row.id,
            invoice_no: row.invoice_no,
            date: row.date,
            seller_id: row.seller_id,
            receiver_id: row.receiver_id,
            taxable: parse_money("taxable", &row.taxable)?,
            cgst: parse_money("cgst", &row.cgst)?,
            sgst: parse_money("sgst", &row.sgst)?,
            igst: parse_money("igst", &row.igst)?,
            total: parse_money("total", &row.total)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct InvoiceItemRow {
    pub id: i64,
    pub invoice_id: i64,
    pub product_id: i64,
    pub rate: String,
    pub qty: String,
    pub discount: String,
    pub taxable: String,
    pub cgst: String,
    pub sgst: String,
    pub igst: String,
}

impl TryFrom<InvoiceItemRow> for InvoiceItem {
    type Error = sqlx::Error;

    fn try_from(row: InvoiceItemRow) -> Result<Self, Self::Error> {
        Ok(InvoiceItem {
            id: row.id,
            invoice_id: row.invoice_id,
            product_id: row.product_id,
            rate: parse_money("rate", &row.rate)?,
            qty: parse_money("qty", &row.qty)?,
            discount: parse_money("discount", &row.discount)?,
            taxable: parse_money("taxable", &row.taxable)?,
            cgst: parse_money("cgst", &row.cgst)?,
            sgst: parse_money("sgst", &row.sgst)?,
            igst: parse_money("igst", &row.igst)?,
        })
    }
}

/// Item row LEFT JOINed with `products`; the product fields are NULL when the
/// product was hard-deleted after the invoice was written.
#[derive(Debug, FromRow)]
pub struct DocumentItemRow {
    pub id: i64,
    pub invoice_id: i64,
    pub product_id: i64,
    pub rate: String,
    pub qty: String,
    pub discount: String,
    pub taxable: String,
    pub cgst: String,
    pub sgst: String,
    pub igst: String,
    pub product_name: Option<String>,
    pub hsn: Option<String>,
    pub gst_rate: Option<String>,
}
