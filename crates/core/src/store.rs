use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::client::Client;
use crate::domain::price::PriceHistoryEntry;
use crate::errors::ApplicationError;

/// Errors from a persistence collaborator. The session treats every variant
/// as degradable: it warns and keeps working against in-memory state.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("stored record could not be decoded: {0}")]
    Decode(String),
}

impl From<StoreError> for ApplicationError {
    fn from(value: StoreError) -> Self {
        ApplicationError::Persistence(value.to_string())
    }
}

/// Durability contract behind the catalogue price ledger. Implementations
/// must keep at most one record per effective date (replace on date match,
/// append otherwise) and hand back already-normalized per-liter prices.
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<PriceHistoryEntry>, StoreError>;
    async fn upsert_one(&self, date: NaiveDate, price: Decimal) -> Result<(), StoreError>;
}

/// Durability contract behind the client directory, keyed by the trimmed
/// lowercased name.
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Client>, StoreError>;
    async fn upsert_one(&self, client: &Client) -> Result<(), StoreError>;
}
