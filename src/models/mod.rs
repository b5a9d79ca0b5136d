// src/models/mod.rs

pub mod invoice;
pub mod party;
pub mod product;

use rust_decimal::Decimal;

// SQLite has no decimal column type, so money travels as TEXT and is parsed
// back into `Decimal` right here at the persistence boundary. A stored value
// that fails to parse is a decode error, never a silent zero.
pub(crate) fn parse_money(column: &str, raw: &str) -> Result<Decimal, sqlx::Error> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}
