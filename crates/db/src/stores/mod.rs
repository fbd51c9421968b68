pub mod client;
pub mod memory;
pub mod price;

pub use client::SqlClientStore;
pub use memory::{InMemoryClientStore, InMemoryPriceStore};
pub use price::SqlPriceStore;

use fuelquote_core::store::StoreError;

pub(crate) fn database_error(error: sqlx::Error) -> StoreError {
    StoreError::Unavailable(error.to_string())
}
