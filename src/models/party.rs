// src/models/party.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A seller or a receiver. The two live in separate tables with an identical
/// shape, so one record type serves both sides of an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Party {
    pub id: i64,
    pub name: String,
    pub state: String,
    pub address: String,
    pub gstin: String,
}

/// Which party table a repository operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyKind {
    Seller,
    Receiver,
}

impl PartyKind {
    pub fn table(self) -> &'static str {
        match self {
            PartyKind::Seller => "sellers",
            PartyKind::Receiver => "receivers",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PartyKind::Seller => "seller",
            PartyKind::Receiver => "receiver",
        }
    }
}
