// src/db/invoice_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::invoice::{
        DocumentItem, DocumentItemRow, Invoice, InvoiceDocument, InvoiceItem, InvoiceItemRow,
        InvoiceRow, InvoiceTotals, LineAmounts,
    },
    models::{parse_money, party::Party},
};

/// Header fields for a new invoice; aggregates are computed by the tax
/// calculator before anything is written.
#[derive(Debug)]
pub struct NewInvoice<'a> {
    pub invoice_no: &'a str,
    pub date: &'a str,
    pub seller_id: i64,
    pub receiver_id: i64,
    pub totals: &'a InvoiceTotals,
}

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persists the header and every retained line as one transaction.
    /// A failure on any row rolls the whole invoice back; there is no
    /// placeholder header waiting for a later aggregate update.
    pub async fn create(
        &self,
        header: NewInvoice<'_>,
        lines: &[LineAmounts],
    ) -> Result<Invoice, AppError> {
        let mut tx = self.pool.begin().await?;

        let invoice = Self::insert_header(&mut *tx, &header).await?;
        for line in lines {
            Self::insert_item(&mut *tx, invoice.id, line).await?;
        }

        tx.commit().await?;
        Ok(invoice)
    }

    pub async fn insert_header<'e, E>(
        executor: E,
        header: &NewInvoice<'_>,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, InvoiceRow>(
            "INSERT INTO invoices
                (invoice_no, date, seller_id, receiver_id, taxable, cgst, sgst, igst, total)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id, invoice_no, date, seller_id, receiver_id,
                       taxable, cgst, sgst, igst, total",
        )
        .bind(header.invoice_no)
        .bind(header.date)
        .bind(header.seller_id)
        .bind(header.receiver_id)
        .bind(header.totals.taxable.to_string())
        .bind(header.totals.cgst.to_string())
        .bind(header.totals.sgst.to_string())
        .bind(header.totals.igst.to_string())
        .bind(header.totals.total.to_string())
        .fetch_one(executor)
        .await?;

        Ok(Invoice::try_from(row)?)
    }

    pub async fn insert_item<'e, E>(
        executor: E,
        invoice_id: i64,
        line: &LineAmounts,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "INSERT INTO invoice_items
                (invoice_id, product_id, rate, qty, discount, taxable, cgst, sgst, igst)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(invoice_id)
        .bind(line.product_id)
        .bind(line.rate.to_string())
        .bind(line.qty.to_string())
        .bind(line.discount.to_string())
        .bind(line.taxable.to_string())
        .bind(line.cgst.to_string())
        .bind(line.sgst.to_string())
        .bind(line.igst.to_string())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Invoice>, AppError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, invoice_no, date, seller_id, receiver_id,
                    taxable, cgst, sgst, igst, total
             FROM invoices ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let invoices = rows
            .into_iter()
            .map(Invoice::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(invoices)
    }

    pub async fn find(&self, id: i64) -> Result<Invoice, AppError> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, invoice_no, date, seller_id, receiver_id,
                    taxable, cgst, sgst, igst, total
             FROM invoices WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("invoice"))?;

        Ok(Invoice::try_from(row)?)
    }

    pub async fn list_items(&self, invoice_id: i64) -> Result<Vec<InvoiceItem>, AppError> {
        let rows = sqlx::query_as::<_, InvoiceItemRow>(
            "SELECT id, invoice_id, product_id, rate, qty, discount,
                    taxable, cgst, sgst, igst
             FROM invoice_items WHERE invoice_id = ? ORDER BY id ASC",
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(InvoiceItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Loads the fully joined graph the renderer needs. An invoice whose
    /// seller, receiver or products were deleted afterwards cannot be
    /// rendered any more; that surfaces as a render error, not as a crash or
    /// a silently shorter document.
    pub async fn find_document(&self, id: i64) -> Result<InvoiceDocument, AppError> {
        let invoice = self.find(id).await?;

        let seller = self
            .fetch_party("sellers", invoice.seller_id)
            .await?
            .ok_or_else(|| {
                AppError::Render(format!(
                    "seller {} referenced by invoice {} no longer exists",
                    invoice.seller_id, invoice.invoice_no
                ))
            })?;
        let receiver = self
            .fetch_party("receivers", invoice.receiver_id)
            .await?
            .ok_or_else(|| {
                AppError::Render(format!(
                    "receiver {} referenced by invoice {} no longer exists",
                    invoice.receiver_id, invoice.invoice_no
                ))
            })?;

        let rows = sqlx::query_as::<_, DocumentItemRow>(
            "SELECT ii.id, ii.invoice_id, ii.product_id, ii.rate, ii.qty, ii.discount,
                    ii.taxable, ii.cgst, ii.sgst, ii.igst,
                    p.name AS product_name, p.hsn AS hsn, p.gst_rate AS gst_rate
             FROM invoice_items ii
             LEFT JOIN products p ON ii.product_id = p.id
             WHERE ii.invoice_id = ?
             ORDER BY ii.id ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let item = InvoiceItem::try_from(InvoiceItemRow {
                id: row.id,
                invoice_id: row.invoice_id,
                product_id: row.product_id,
                rate: row.rate,
                qty: row.qty,
                discount: row.discount,
                taxable: row.taxable,
                cgst: row.cgst,
                sgst: row.sgst,
                igst: row.igst,
            })?;

            let (Some(product_name), Some(hsn), Some(gst_rate)) =
                (row.product_name, row.hsn, row.gst_rate)
            else {
                return Err(AppError::Render(format!(
                    "product {} referenced by invoice {} no longer exists",
                    item.product_id, invoice.invoice_no
                )));
            };

            items.push(DocumentItem {
                item,
                product_name,
                hsn,
                gst_rate: parse_money("gst_rate", &gst_rate)?,
            });
        }

        Ok(InvoiceDocument {
            invoice,
            seller,
            receiver,
            items,
        })
    }

    async fn fetch_party(&self, table: &str, id: i64) -> Result<Option<Party>, AppError> {
        let sql = format!(
            "SELECT id, name, state, address, gstin FROM {table} WHERE id = ?"
        );
        let party = sqlx::query_as::<_, Party>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(party)
    }
}
