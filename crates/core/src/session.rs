use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::directory::ClientDirectory;
use crate::domain::client::{Client, PricingDefault};
use crate::domain::price::PriceHistoryEntry;
use crate::domain::quotation::QuotationRecord;
use crate::errors::DomainError;
use crate::ledger::PriceLedger;
use crate::pricing::{self, PricingBreakdown, PricingRequest, PricingStrategy, VolumeTotals};
use crate::quotation::{build_quotation, OfferDetails};
use crate::store::{ClientStore, PriceStore};

/// Market-side inputs for one calculation; client defaults fill whatever the
/// caller leaves unset.
#[derive(Clone, Debug)]
pub struct MarketInputs {
    pub purchase_price: Decimal,
    pub reference_rate_pct: Decimal,
    pub bank_spread_pct: Decimal,
    pub factoring_fee_pct: Decimal,
    /// Overrides the client's default logistics cost when set.
    pub logistics_cost: Option<Decimal>,
    /// Overrides the client's default payment days when set.
    pub credit_days: Option<u32>,
}

/// Result of a quote request. The breakdown is always present; totals and
/// the quotation record are best-effort and skipped when volume or name are
/// missing.
#[derive(Clone, Debug)]
pub struct QuoteOutcome {
    pub breakdown: PricingBreakdown,
    pub totals: Option<VolumeTotals>,
    pub quotation: Option<QuotationRecord>,
}

/// One user session: exclusively owns the price ledger and client directory,
/// with optional write-through to persistence collaborators. A session whose
/// stores are unreachable degrades to in-memory state with a warning instead
/// of failing.
pub struct Session {
    ledger: PriceLedger,
    directory: ClientDirectory,
    price_store: Option<Arc<dyn PriceStore>>,
    client_store: Option<Arc<dyn ClientStore>>,
}

impl Session {
    /// A session with no persistence at all.
    pub fn in_memory() -> Self {
        Self {
            ledger: PriceLedger::new(),
            directory: ClientDirectory::new(),
            price_store: None,
            client_store: None,
        }
    }

    /// Open a session hydrated from the given stores. Load failures leave
    /// the corresponding table empty for this session.
    pub async fn open(
        price_store: Option<Arc<dyn PriceStore>>,
        client_store: Option<Arc<dyn ClientStore>>,
    ) -> Self {
        let ledger = match &price_store {
            Some(store) => match store.load_all().await {
                Ok(entries) => PriceLedger::from_entries(entries),
                Err(error) => {
                    warn!(%error, "price store unavailable, starting with an empty ledger");
                    PriceLedger::new()
                }
            },
            None => PriceLedger::new(),
        };

        let directory = match &client_store {
            Some(store) => match store.load_all().await {
                Ok(clients) => ClientDirectory::from_clients(clients),
                Err(error) => {
                    warn!(%error, "client store unavailable, starting with an empty directory");
                    ClientDirectory::new()
                }
            },
            None => ClientDirectory::new(),
        };

        Self { ledger, directory, price_store, client_store }
    }

    /// Save a catalogue price: ledger first, then write-through. A store
    /// failure keeps the in-memory entry authoritative for this session.
    pub async fn save_price(
        &mut self,
        effective_date: NaiveDate,
        price: Decimal,
    ) -> Result<(), DomainError> {
        self.ledger.upsert(effective_date, price)?;

        if let Some(store) = &self.price_store {
            if let Err(error) = store.upsert_one(effective_date, price).await {
                warn!(%error, %effective_date, "price not persisted, kept in memory only");
            }
        }
        Ok(())
    }

    pub fn current_price(&self) -> Result<Decimal, DomainError> {
        self.ledger.current_price()
    }

    pub fn current_entry(&self) -> Result<&PriceHistoryEntry, DomainError> {
        self.ledger.current_entry()
    }

    pub fn price_history(&self) -> Vec<PriceHistoryEntry> {
        self.ledger.history()
    }

    pub async fn save_client(&mut self, client: Client) -> Result<Client, DomainError> {
        let stored = self.directory.upsert(client)?;

        if let Some(store) = &self.client_store {
            if let Err(error) = store.upsert_one(&stored).await {
                warn!(%error, client = %stored.name, "client not persisted, kept in memory only");
            }
        }
        Ok(stored)
    }

    pub fn clients(&self) -> Vec<Client> {
        self.directory.list()
    }

    pub fn find_client(&self, name: &str) -> Result<Client, DomainError> {
        self.directory.find_by_name(name).cloned()
    }

    /// Assemble a pricing request for a directory client from its defaults
    /// and the supplied market inputs. The discount-from-catalogue shape
    /// needs a catalogue price, so an empty ledger fails here before any
    /// computation.
    pub fn request_for(
        &self,
        client: &Client,
        market: &MarketInputs,
    ) -> Result<PricingRequest, DomainError> {
        let strategy = match client.pricing_default {
            PricingDefault::DiscountPerCubicMeter(discount) => {
                PricingStrategy::DiscountFromCatalogue {
                    catalogue_price: self.ledger.current_price()?,
                    discount_per_cubic_meter: discount,
                }
            }
            PricingDefault::MarginPerUnit(margin) => {
                PricingStrategy::MarginFirst { target_margin: margin }
            }
        };

        Ok(PricingRequest {
            purchase_price: market.purchase_price,
            logistics_cost: market.logistics_cost.unwrap_or(client.logistics_cost),
            credit_days: market.credit_days.unwrap_or(client.payment_days),
            reference_rate_pct: market.reference_rate_pct,
            bank_spread_pct: market.bank_spread_pct,
            factoring_fee_pct: market.factoring_fee_pct,
            strategy,
        })
    }

    /// Compute the breakdown, then build the quotation on a best-effort
    /// basis: a blank name or missing volume skips the quotation with a
    /// warning but never suppresses the breakdown.
    pub fn quote(
        &self,
        request: &PricingRequest,
        offer: &OfferDetails,
    ) -> Result<QuoteOutcome, DomainError> {
        let breakdown = pricing::price(request)?;
        let totals = breakdown.extend(offer.volume).ok();

        let contact = self.directory.find_by_name(&offer.client_name).ok();
        let quotation = match build_quotation(request, &breakdown, offer, contact) {
            Ok(record) => Some(record),
            Err(reason) => {
                warn!(%reason, "quotation skipped, breakdown still available");
                None
            }
        };

        Ok(QuoteOutcome { breakdown, totals, quotation })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{MarketInputs, Session};
    use crate::domain::client::{Client, PricingDefault};
    use crate::domain::price::PriceHistoryEntry;
    use crate::errors::DomainError;
    use crate::pricing::PricingStrategy;
    use crate::quotation::OfferDetails;
    use crate::store::{PriceStore, StoreError};

    struct UnreachableStore;

    #[async_trait]
    impl PriceStore for UnreachableStore {
        async fn load_all(&self) -> Result<Vec<PriceHistoryEntry>, StoreError> {
            Err(StoreError::Unavailable("backend offline".to_owned()))
        }

        async fn upsert_one(&self, _date: NaiveDate, _price: Decimal) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("backend offline".to_owned()))
        }
    }

    fn dec(value: &str) -> Decimal {
        value.parse().expect("valid decimal")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn market() -> MarketInputs {
        MarketInputs {
            purchase_price: dec("1.20"),
            reference_rate_pct: dec("3.80"),
            bank_spread_pct: dec("1.80"),
            factoring_fee_pct: dec("0.30"),
            logistics_cost: None,
            credit_days: None,
        }
    }

    fn discount_client() -> Client {
        Client {
            payment_days: 28,
            logistics_cost: dec("0.030"),
            pricing_default: PricingDefault::DiscountPerCubicMeter(dec("30")),
            ..Client::named("RD Trans")
        }
    }

    #[tokio::test]
    async fn unreachable_store_degrades_to_an_empty_in_memory_session() {
        let mut session = Session::open(Some(Arc::new(UnreachableStore)), None).await;
        assert_eq!(session.current_price(), Err(DomainError::NoPriceAvailable));

        // Saving still succeeds; the entry lives in memory for the session.
        session.save_price(date(2025, 1, 1), dec("1.50")).await.expect("save price");
        assert_eq!(session.current_price(), Ok(dec("1.50")));
    }

    #[tokio::test]
    async fn request_for_discount_client_pulls_catalogue_and_defaults() {
        let mut session = Session::in_memory();
        session.save_price(date(2025, 1, 1), dec("1.50")).await.expect("save price");
        let client = session.save_client(discount_client()).await.expect("save client");

        let request = session.request_for(&client, &market()).expect("request");
        assert_eq!(request.logistics_cost, dec("0.030"));
        assert_eq!(request.credit_days, 28);
        assert_eq!(
            request.strategy,
            PricingStrategy::DiscountFromCatalogue {
                catalogue_price: dec("1.50"),
                discount_per_cubic_meter: dec("30"),
            }
        );
    }

    #[tokio::test]
    async fn discount_request_with_empty_ledger_fails_before_computation() {
        let mut session = Session::in_memory();
        let client = session.save_client(discount_client()).await.expect("save client");

        assert_eq!(
            session.request_for(&client, &market()),
            Err(DomainError::NoPriceAvailable)
        );
    }

    #[tokio::test]
    async fn margin_client_needs_no_catalogue_price() {
        let mut session = Session::in_memory();
        let client = Client {
            pricing_default: PricingDefault::MarginPerUnit(dec("0.03")),
            ..discount_client()
        };
        let client = session.save_client(client).await.expect("save client");

        let request = session.request_for(&client, &market()).expect("request");
        assert_eq!(request.strategy, PricingStrategy::MarginFirst { target_margin: dec("0.03") });
    }

    #[tokio::test]
    async fn market_inputs_override_client_defaults() {
        let mut session = Session::in_memory();
        session.save_price(date(2025, 1, 1), dec("1.50")).await.expect("save price");
        let client = session.save_client(discount_client()).await.expect("save client");

        let market = MarketInputs {
            logistics_cost: Some(dec("0.025")),
            credit_days: Some(14),
            ..market()
        };
        let request = session.request_for(&client, &market).expect("request");
        assert_eq!(request.logistics_cost, dec("0.025"));
        assert_eq!(request.credit_days, 14);
    }

    #[tokio::test]
    async fn quote_skips_the_record_but_keeps_the_breakdown() {
        let mut session = Session::in_memory();
        session.save_price(date(2025, 1, 1), dec("1.50")).await.expect("save price");
        let client = session.save_client(discount_client()).await.expect("save client");
        let request = session.request_for(&client, &market()).expect("request");

        let offer = OfferDetails {
            client_name: String::new(),
            volume: dec("30000"),
            issued_on: date(2025, 3, 1),
            valid_until: date(2025, 3, 4),
            supplier_name: "Fuel Traders".to_owned(),
        };
        let outcome = session.quote(&request, &offer).expect("quote");

        assert!(outcome.quotation.is_none());
        assert!(outcome.totals.is_some());
        assert_eq!(outcome.breakdown.client_price, dec("1.47"));
    }

    #[tokio::test]
    async fn quote_attaches_directory_contacts_when_the_name_matches() {
        let mut session = Session::in_memory();
        session.save_price(date(2025, 1, 1), dec("1.50")).await.expect("save price");
        let client = Client {
            contact_name: Some("J. Novak".to_owned()),
            ..discount_client()
        };
        let client = session.save_client(client).await.expect("save client");
        let request = session.request_for(&client, &market()).expect("request");

        let offer = OfferDetails {
            client_name: "rd trans".to_owned(),
            volume: dec("30000"),
            issued_on: date(2025, 3, 1),
            valid_until: date(2025, 3, 4),
            supplier_name: "Fuel Traders".to_owned(),
        };
        let outcome = session.quote(&request, &offer).expect("quote");

        let quotation = outcome.quotation.expect("quotation present");
        assert_eq!(quotation.contact_name.as_deref(), Some("J. Novak"));
        assert_eq!(quotation.total_revenue, dec("1.47") * dec("30000"));
    }
}
