use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured price quotation handed to whatever surface renders or exports
/// it. The core emits decimals and dates only; formatting is the caller's.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationRecord {
    pub client_name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,

    /// Quoted delivery volume in liters.
    pub volume: Decimal,
    /// Final per-liter price the client pays.
    pub unit_price: Decimal,
    /// Catalogue price and discount, present for discount-from-catalogue
    /// quotations only.
    pub catalogue_price: Option<Decimal>,
    pub discount_per_cubic_meter: Option<Decimal>,
    pub discount_per_unit: Option<Decimal>,

    pub base_cost: Decimal,
    pub interest_cost: Decimal,
    pub factoring_cost: Decimal,
    pub total_cost: Decimal,
    pub margin_per_unit: Decimal,
    pub total_margin: Decimal,
    pub total_revenue: Decimal,

    pub credit_days: u32,
    pub reference_rate_pct: Decimal,
    pub bank_spread_pct: Decimal,
    pub factoring_fee_pct: Decimal,

    pub issued_on: NaiveDate,
    pub valid_until: NaiveDate,
    pub supplier_name: String,
}
