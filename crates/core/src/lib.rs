pub mod config;
pub mod directory;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod pricing;
pub mod quotation;
pub mod session;
pub mod store;

pub use directory::ClientDirectory;
pub use domain::client::{Client, PricingDefault};
pub use domain::price::PriceHistoryEntry;
pub use domain::quotation::QuotationRecord;
pub use errors::{ApplicationError, DomainError};
pub use ledger::PriceLedger;
pub use pricing::{
    price, CostLine, PricingBreakdown, PricingRequest, PricingStrategy, PricingVariant,
    VolumeTotals,
};
pub use quotation::{build_quotation, OfferDetails};
pub use session::{MarketInputs, QuoteOutcome, Session};
pub use store::{ClientStore, PriceStore, StoreError};
