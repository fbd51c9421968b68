use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use fuelquote_core::domain::client::Client;
use fuelquote_core::domain::price::PriceHistoryEntry;
use fuelquote_core::store::{ClientStore, PriceStore, StoreError};

/// Store used by tests and by sessions running without a database; keeps
/// the same date-match-or-append contract as the sqlite adapter.
#[derive(Default)]
pub struct InMemoryPriceStore {
    entries: RwLock<Vec<PriceHistoryEntry>>,
}

#[async_trait]
impl PriceStore for InMemoryPriceStore {
    async fn load_all(&self) -> Result<Vec<PriceHistoryEntry>, StoreError> {
        let entries = self.entries.read().await;
        let mut all = entries.clone();
        all.sort_by_key(|entry| entry.effective_date);
        Ok(all)
    }

    async fn upsert_one(&self, date: NaiveDate, price: Decimal) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|entry| entry.effective_date == date) {
            Some(existing) => existing.price = price,
            None => entries.push(PriceHistoryEntry { effective_date: date, price }),
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryClientStore {
    clients: RwLock<Vec<Client>>,
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn load_all(&self) -> Result<Vec<Client>, StoreError> {
        let clients = self.clients.read().await;
        Ok(clients.clone())
    }

    async fn upsert_one(&self, client: &Client) -> Result<(), StoreError> {
        let key = client.name.trim().to_lowercase();
        let mut clients = self.clients.write().await;
        match clients.iter_mut().find(|existing| existing.name.trim().to_lowercase() == key) {
            Some(existing) => {
                let name = existing.name.clone();
                *existing = Client { name, ..client.clone() };
            }
            None => clients.push(client.clone()),
        }
        Ok(())
    }
}
