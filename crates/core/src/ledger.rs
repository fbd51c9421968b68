use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::price::PriceHistoryEntry;
use crate::errors::DomainError;

/// Catalogue price ledger: append/update store of (effective date, price)
/// entries. The current price is always recomputed as the entry with the
/// latest date, regardless of insertion order.
///
/// Prices reaching the ledger are assumed already normalized; any cleanup of
/// malformed externally-stored values belongs to the store adapter that
/// loaded them.
#[derive(Clone, Debug, Default)]
pub struct PriceLedger {
    entries: Vec<PriceHistoryEntry>,
}

impl PriceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate from a store's `load_all()` output. Duplicate dates collapse
    /// to the last occurrence, matching upsert semantics.
    pub fn from_entries(entries: impl IntoIterator<Item = PriceHistoryEntry>) -> Self {
        let mut ledger = Self::new();
        for entry in entries {
            if entry.price >= Decimal::ZERO {
                ledger.replace_or_append(entry);
            }
        }
        ledger
    }

    /// Replace the price for an exact date match, otherwise append.
    pub fn upsert(&mut self, effective_date: NaiveDate, price: Decimal) -> Result<(), DomainError> {
        if price < Decimal::ZERO {
            return Err(DomainError::InvalidPrice);
        }
        self.replace_or_append(PriceHistoryEntry { effective_date, price });
        Ok(())
    }

    fn replace_or_append(&mut self, entry: PriceHistoryEntry) {
        match self.entries.iter_mut().find(|e| e.effective_date == entry.effective_date) {
            Some(existing) => existing.price = entry.price,
            None => self.entries.push(entry),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry with the maximum effective date.
    pub fn current_entry(&self) -> Result<&PriceHistoryEntry, DomainError> {
        self.entries
            .iter()
            .max_by_key(|entry| entry.effective_date)
            .ok_or(DomainError::NoPriceAvailable)
    }

    pub fn current_price(&self) -> Result<Decimal, DomainError> {
        self.current_entry().map(|entry| entry.price)
    }

    /// All entries ordered by ascending effective date.
    pub fn history(&self) -> Vec<PriceHistoryEntry> {
        let mut history = self.entries.clone();
        history.sort_by_key(|entry| entry.effective_date);
        history
    }
}
