use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Row;

use fuelquote_core::domain::client::{Client, PricingDefault};
use fuelquote_core::store::{ClientStore, StoreError};

use super::database_error;
use crate::DbPool;

const KIND_DISCOUNT: &str = "discount_m3";
const KIND_MARGIN: &str = "margin_unit";

pub struct SqlClientStore {
    pool: DbPool,
}

impl SqlClientStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientStore for SqlClientStore {
    async fn load_all(&self) -> Result<Vec<Client>, StoreError> {
        let rows = sqlx::query(
            "SELECT name, contact_name, email, phone, payment_days, logistics_cost, \
             pricing_kind, pricing_value FROM clients ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter()
            .map(|row| {
                let raw_payment_days: i64 =
                    row.try_get("payment_days").map_err(database_error)?;
                let payment_days = u32::try_from(raw_payment_days).map_err(|_| {
                    StoreError::Decode(format!("bad payment_days `{raw_payment_days}`"))
                })?;
                let logistics_cost = decode_decimal(&row, "logistics_cost")?;
                let pricing_value = decode_decimal(&row, "pricing_value")?;
                let pricing_kind: String = row.try_get("pricing_kind").map_err(database_error)?;

                let pricing_default = match pricing_kind.as_str() {
                    KIND_DISCOUNT => PricingDefault::DiscountPerCubicMeter(pricing_value),
                    KIND_MARGIN => PricingDefault::MarginPerUnit(pricing_value),
                    other => {
                        return Err(StoreError::Decode(format!("unknown pricing_kind `{other}`")))
                    }
                };

                Ok(Client {
                    name: row.try_get("name").map_err(database_error)?,
                    contact_name: row.try_get("contact_name").map_err(database_error)?,
                    email: row.try_get("email").map_err(database_error)?,
                    phone: row.try_get("phone").map_err(database_error)?,
                    payment_days,
                    logistics_cost,
                    pricing_default,
                })
            })
            .collect()
    }

    async fn upsert_one(&self, client: &Client) -> Result<(), StoreError> {
        let (pricing_kind, pricing_value) = match client.pricing_default {
            PricingDefault::DiscountPerCubicMeter(value) => (KIND_DISCOUNT, value),
            PricingDefault::MarginPerUnit(value) => (KIND_MARGIN, value),
        };

        // `name` keeps its first-saved casing: conflicts update every column
        // except it, matching the in-memory directory.
        sqlx::query(
            "INSERT INTO clients \
             (name_key, name, contact_name, email, phone, payment_days, logistics_cost, pricing_kind, pricing_value) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
             ON CONFLICT(name_key) DO UPDATE SET \
             contact_name = excluded.contact_name, \
             email = excluded.email, \
             phone = excluded.phone, \
             payment_days = excluded.payment_days, \
             logistics_cost = excluded.logistics_cost, \
             pricing_kind = excluded.pricing_kind, \
             pricing_value = excluded.pricing_value",
        )
        .bind(client.name.trim().to_lowercase())
        .bind(client.name.trim())
        .bind(&client.contact_name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(i64::from(client.payment_days))
        .bind(client.logistics_cost.to_string())
        .bind(pricing_kind)
        .bind(pricing_value.to_string())
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }
}

fn decode_decimal(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<Decimal, StoreError> {
    let raw: String = row.try_get(column).map_err(database_error)?;
    raw.parse::<Decimal>()
        .map_err(|e| StoreError::Decode(format!("bad {column} `{raw}`: {e}")))
}
