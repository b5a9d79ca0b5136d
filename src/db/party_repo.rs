// src/db/party_repo.rs

use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    models::party::{Party, PartyKind},
};

/// Repository over one of the two party tables. Construct one with
/// `PartyKind::Seller` and one with `PartyKind::Receiver`.
#[derive(Clone)]
pub struct PartyRepository {
    pool: SqlitePool,
    kind: PartyKind,
}

impl PartyRepository {
    pub fn new(pool: SqlitePool, kind: PartyKind) -> Self {
        Self { pool, kind }
    }

    pub fn kind(&self) -> PartyKind {
        self.kind
    }

    pub async fn create(
        &self,
        name: &str,
        state: &str,
        address: &str,
        gstin: &str,
    ) -> Result<Party, AppError> {
        let sql = format!(
            "INSERT INTO {} (name, state, address, gstin) VALUES (?, ?, ?, ?)
             RETURNING id, name, state, address, gstin",
            self.kind.table()
        );
        let party = sqlx::query_as::<_, Party>(&sql)
            .bind(name)
            .bind(state)
            .bind(address)
            .bind(gstin)
            .fetch_one(&self.pool)
            .await?;

        Ok(party)
    }

    pub async fn list(&self) -> Result<Vec<Party>, AppError> {
        let sql = format!(
            "SELECT id, name, state, address, gstin FROM {} ORDER BY id ASC",
            self.kind.table()
        );
        let parties = sqlx::query_as::<_, Party>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(parties)
    }

    pub async fn find(&self, id: i64) -> Result<Party, AppError> {
        let sql = format!(
            "SELECT id, name, state, address, gstin FROM {} WHERE id = ?",
            self.kind.table()
        );
        sqlx::query_as::<_, Party>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound(self.kind.label()))
    }

    /// Hard delete. Invoices already referencing the party keep their frozen
    /// snapshot values and are not touched.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", self.kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(self.kind.label()));
        }
        Ok(())
    }
}
