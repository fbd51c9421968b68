use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which pricing default a client carries. A reseller contract either grants
/// an absolute discount off the catalogue price or fixes a target margin the
/// seller wants to clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingDefault {
    /// EUR per cubic meter off the catalogue price (1 m³ = 1000 l).
    DiscountPerCubicMeter(Decimal),
    /// Target margin in EUR per liter baked into the quoted price.
    MarginPerUnit(Decimal),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Case-insensitive unique key within the directory (trimmed).
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Default credit period in days (purchase to expected payment).
    pub payment_days: u32,
    /// Default per-liter logistics cost for deliveries to this client.
    pub logistics_cost: Decimal,
    pub pricing_default: PricingDefault,
}

impl Client {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact_name: None,
            email: None,
            phone: None,
            payment_days: 28,
            logistics_cost: Decimal::ZERO,
            pricing_default: PricingDefault::DiscountPerCubicMeter(Decimal::ZERO),
        }
    }
}
