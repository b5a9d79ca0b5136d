// src/models/product.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use super::parse_money;

/// A product with its HSN classification code and GST percentage (0-100).
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub hsn: String,
    pub unit: String,
    pub gst_rate: Decimal,
}

/// Raw `products` row; `gst_rate` is stored as TEXT.
#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub hsn: String,
    pub unit: String,
    pub gst_rate: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = sqlx::Error;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: row.id,
            name: row.name,
            hsn: row.hsn,
            unit: row.unit,
            gst_rate: parse_money("gst_rate", &row.gst_rate)?,
        })
    }
}
