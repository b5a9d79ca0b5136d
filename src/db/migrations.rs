// src/db/migrations.rs

use sqlx::SqlitePool;

// Create-if-missing schema, run once at boot. Monetary columns are TEXT; see
// models::parse_money for the boundary conversion.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS sellers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        state TEXT NOT NULL,
        address TEXT NOT NULL DEFAULT '',
        gstin TEXT NOT NULL DEFAULT ''
    )",
    "CREATE TABLE IF NOT EXISTS receivers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        state TEXT NOT NULL,
        address TEXT NOT NULL DEFAULT '',
        gstin TEXT NOT NULL DEFAULT ''
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        hsn TEXT NOT NULL DEFAULT '',
        unit TEXT NOT NULL DEFAULT '',
        gst_rate TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS invoices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        invoice_no TEXT NOT NULL,
        date TEXT NOT NULL,
        seller_id INTEGER NOT NULL,
        receiver_id INTEGER NOT NULL,
        taxable TEXT NOT NULL,
        cgst TEXT NOT NULL,
        sgst TEXT NOT NULL,
        igst TEXT NOT NULL,
        total TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS invoice_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        invoice_id INTEGER NOT NULL,
        product_id INTEGER NOT NULL,
        rate TEXT NOT NULL,
        qty TEXT NOT NULL,
        discount TEXT NOT NULL,
        taxable TEXT NOT NULL,
        cgst TEXT NOT NULL,
        sgst TEXT NOT NULL,
        igst TEXT NOT NULL
    )",
];

/// Applies the schema. Every statement is idempotent, so running this on an
/// already-initialized database is a no-op.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
