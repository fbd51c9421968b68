use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One catalogue price record. The ledger keeps at most one entry per
/// `effective_date`; the entry with the latest date is the current price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub effective_date: NaiveDate,
    /// EUR per liter, already normalized by whichever store loaded it.
    pub price: Decimal,
}
