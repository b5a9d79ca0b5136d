// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    models::product::{Product, ProductRow},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        hsn: &str,
        unit: &str,
        gst_rate: Decimal,
    ) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (name, hsn, unit, gst_rate) VALUES (?, ?, ?, ?)
             RETURNING id, name, hsn, unit, gst_rate",
        )
        .bind(name)
        .bind(hsn)
        .bind(unit)
        .bind(gst_rate.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(Product::try_from(row)?)
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, hsn, unit, gst_rate FROM products ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let products = rows
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    pub async fn find(&self, id: i64) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, hsn, unit, gst_rate FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("product"))?;

        Ok(Product::try_from(row)?)
    }

    /// Hard delete. Invoice items keep the rate and tax split they were
    /// created with; only future lookups of this id will fail.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("product"));
        }
        Ok(())
    }
}
