use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::Row;
use tracing::warn;

use fuelquote_core::domain::price::PriceHistoryEntry;
use fuelquote_core::store::{PriceStore, StoreError};

use super::database_error;
use crate::DbPool;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Per-liter prices above this are assumed to carry a wrong decimal scale
/// from the external source (e.g. 1500 recorded for 1.500 EUR/l).
const PLAUSIBLE_MAX_PRICE: Decimal = Decimal::TEN;

pub struct SqlPriceStore {
    pool: DbPool,
}

impl SqlPriceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PriceStore for SqlPriceStore {
    async fn load_all(&self) -> Result<Vec<PriceHistoryEntry>, StoreError> {
        let rows = sqlx::query(
            "SELECT effective_date, price FROM price_history ORDER BY effective_date ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let raw_date: String = row.try_get("effective_date").map_err(database_error)?;
            let raw_price: String = row.try_get("price").map_err(database_error)?;

            let effective_date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
                .map_err(|e| StoreError::Decode(format!("bad effective_date `{raw_date}`: {e}")))?;
            let price = raw_price
                .parse::<Decimal>()
                .map_err(|e| StoreError::Decode(format!("bad price `{raw_price}`: {e}")))?;

            let Some(price) = normalize_price(effective_date, price) else {
                continue;
            };
            entries.push(PriceHistoryEntry { effective_date, price });
        }

        Ok(entries)
    }

    async fn upsert_one(&self, date: NaiveDate, price: Decimal) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO price_history (effective_date, price) VALUES (?1, ?2) \
             ON CONFLICT(effective_date) DO UPDATE SET price = excluded.price",
        )
        .bind(date.format(DATE_FORMAT).to_string())
        .bind(price.to_string())
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }
}

/// Defensive cleanup of malformed externally-sourced prices. Out-of-scale
/// values are divided by 10 until they land in a plausible per-liter range;
/// negative values are dropped. The ledger itself never sees raw values.
fn normalize_price(effective_date: NaiveDate, raw: Decimal) -> Option<Decimal> {
    if raw < Decimal::ZERO {
        warn!(%effective_date, %raw, "skipping negative stored price");
        return None;
    }

    let mut price = raw;
    while price >= PLAUSIBLE_MAX_PRICE {
        price /= Decimal::TEN;
    }
    if price != raw {
        // The heuristic mangles genuinely high prices too; keep it loud.
        warn!(%effective_date, %raw, %price, "normalized out-of-scale stored price");
    }
    Some(price)
}
