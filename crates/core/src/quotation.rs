use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::client::Client;
use crate::domain::quotation::QuotationRecord;
use crate::errors::DomainError;
use crate::pricing::{PricingBreakdown, PricingRequest, PricingStrategy};

/// Everything a quotation needs beyond the breakdown itself.
#[derive(Clone, Debug)]
pub struct OfferDetails {
    /// Name printed on the offer; may differ from any directory record.
    pub client_name: String,
    /// Delivery volume in liters.
    pub volume: Decimal,
    pub issued_on: NaiveDate,
    pub valid_until: NaiveDate,
    pub supplier_name: String,
}

/// Assemble the structured quotation record for one priced request.
///
/// Failures here are deliberately non-fatal for callers: a missing name or
/// volume skips the quotation while the breakdown stands on its own.
pub fn build_quotation(
    request: &PricingRequest,
    breakdown: &PricingBreakdown,
    offer: &OfferDetails,
    contact: Option<&Client>,
) -> Result<QuotationRecord, DomainError> {
    let client_name = offer.client_name.trim();
    if client_name.is_empty() {
        return Err(DomainError::InvalidClient);
    }
    let totals = breakdown.extend(offer.volume)?;

    let (catalogue_price, discount_per_cubic_meter, discount_per_unit) = match request.strategy {
        PricingStrategy::DiscountFromCatalogue { catalogue_price, discount_per_cubic_meter } => (
            Some(catalogue_price),
            Some(discount_per_cubic_meter),
            Some(discount_per_cubic_meter / Decimal::ONE_THOUSAND),
        ),
        PricingStrategy::MarginFirst { .. } => (None, None, None),
    };

    Ok(QuotationRecord {
        client_name: client_name.to_owned(),
        contact_name: contact.and_then(|c| c.contact_name.clone()),
        email: contact.and_then(|c| c.email.clone()),
        phone: contact.and_then(|c| c.phone.clone()),
        volume: totals.volume,
        unit_price: breakdown.client_price,
        catalogue_price,
        discount_per_cubic_meter,
        discount_per_unit,
        base_cost: breakdown.base_cost,
        interest_cost: breakdown.interest_cost,
        factoring_cost: breakdown.factoring_cost,
        total_cost: breakdown.total_cost,
        margin_per_unit: breakdown.margin_per_unit,
        total_margin: totals.total_margin,
        total_revenue: totals.total_revenue,
        credit_days: request.credit_days,
        reference_rate_pct: request.reference_rate_pct,
        bank_spread_pct: request.bank_spread_pct,
        factoring_fee_pct: request.factoring_fee_pct,
        issued_on: offer.issued_on,
        valid_until: offer.valid_until,
        supplier_name: offer.supplier_name.clone(),
    })
}
