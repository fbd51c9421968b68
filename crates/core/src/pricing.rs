use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

const DAYS_PER_YEAR: u32 = 365;
const LITERS_PER_CUBIC_METER: u32 = 1000;

/// Which of the two pricing formulas produced a breakdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingVariant {
    DiscountFromCatalogue,
    MarginFirst,
}

/// The two supported pricing formulas. They differ in where the factoring
/// percentage is applied and whether margin is an input or a residual;
/// swapping either silently changes the quoted price, so each carries its
/// own base rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategy {
    /// The client price is the catalogue price minus an EUR/m³ discount;
    /// margin falls out as a residual. Factoring is charged on the client
    /// price.
    DiscountFromCatalogue { catalogue_price: Decimal, discount_per_cubic_meter: Decimal },
    /// A target margin is added on top of financed cost. Factoring is
    /// charged on the preliminary price (cost plus margin, before the fee
    /// itself).
    MarginFirst { target_margin: Decimal },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRequest {
    /// Purchase price of the fuel, EUR per liter.
    pub purchase_price: Decimal,
    /// Delivery cost, EUR per liter.
    pub logistics_cost: Decimal,
    /// Days between purchase and expected client payment.
    pub credit_days: u32,
    /// Reference rate (e.g. 1M EURIBOR) in percent. May be negative.
    pub reference_rate_pct: Decimal,
    /// Bank spread over the reference rate, in percent.
    pub bank_spread_pct: Decimal,
    /// Factoring fee in percent of the invoiced amount.
    pub factoring_fee_pct: Decimal,
    pub strategy: PricingStrategy,
}

/// One itemized line of a breakdown, in the order it was derived.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostLine {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub variant: PricingVariant,
    /// Per-liter price the client pays.
    pub client_price: Decimal,
    pub base_cost: Decimal,
    /// Combined annual financing rate as a fraction, not percent.
    pub annual_rate: Decimal,
    pub interest_cost: Decimal,
    pub factoring_cost: Decimal,
    pub total_cost: Decimal,
    /// Residual for the catalogue variant, the target for margin-first.
    /// May be negative; that is a reported fact, not an error.
    pub margin_per_unit: Decimal,
    pub lines: Vec<CostLine>,
}

/// Volume extension of a per-unit breakdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeTotals {
    pub volume: Decimal,
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub total_margin: Decimal,
}

/// Compute a fully itemized cost/price breakdown for one request. Pure and
/// stateless; validation happens before any arithmetic so an invalid request
/// never yields a partial result.
pub fn price(request: &PricingRequest) -> Result<PricingBreakdown, DomainError> {
    validate(request)?;

    let base_cost = request.purchase_price + request.logistics_cost;
    let annual_rate =
        (request.reference_rate_pct + request.bank_spread_pct) / Decimal::ONE_HUNDRED;
    let credit_fraction = Decimal::from(request.credit_days) / Decimal::from(DAYS_PER_YEAR);
    let interest_cost = base_cost * annual_rate * credit_fraction;

    let mut lines = vec![
        CostLine {
            stage: "base_cost".to_owned(),
            detail: "purchase + logistics".to_owned(),
            amount: base_cost,
        },
        CostLine {
            stage: "interest".to_owned(),
            detail: format!(
                "{} days at {} % + {} % annual",
                request.credit_days, request.reference_rate_pct, request.bank_spread_pct
            ),
            amount: interest_cost,
        },
    ];

    let breakdown = match request.strategy {
        PricingStrategy::DiscountFromCatalogue { catalogue_price, discount_per_cubic_meter } => {
            let discount_per_unit =
                discount_per_cubic_meter / Decimal::from(LITERS_PER_CUBIC_METER);
            let client_price = catalogue_price - discount_per_unit;
            // Factoring is charged on the invoiced client price.
            let factoring_cost = client_price * request.factoring_fee_pct / Decimal::ONE_HUNDRED;
            let total_cost = base_cost + interest_cost + factoring_cost;
            let margin_per_unit = client_price - total_cost;

            lines.push(CostLine {
                stage: "factoring".to_owned(),
                detail: format!("{} % of client price", request.factoring_fee_pct),
                amount: factoring_cost,
            });
            lines.push(CostLine {
                stage: "total_cost".to_owned(),
                detail: "base + interest + factoring".to_owned(),
                amount: total_cost,
            });

            PricingBreakdown {
                variant: PricingVariant::DiscountFromCatalogue,
                client_price,
                base_cost,
                annual_rate,
                interest_cost,
                factoring_cost,
                total_cost,
                margin_per_unit,
                lines,
            }
        }
        PricingStrategy::MarginFirst { target_margin } => {
            let preliminary_price = base_cost + interest_cost + target_margin;
            // Factoring is charged on cost-plus-margin, before the fee
            // itself enters the price.
            let factoring_cost =
                preliminary_price * request.factoring_fee_pct / Decimal::ONE_HUNDRED;
            let total_cost = base_cost + interest_cost + factoring_cost;
            let final_price = total_cost + target_margin;

            lines.push(CostLine {
                stage: "factoring".to_owned(),
                detail: format!("{} % of cost plus target margin", request.factoring_fee_pct),
                amount: factoring_cost,
            });
            lines.push(CostLine {
                stage: "total_cost".to_owned(),
                detail: "base + interest + factoring".to_owned(),
                amount: total_cost,
            });

            PricingBreakdown {
                variant: PricingVariant::MarginFirst,
                client_price: final_price,
                base_cost,
                annual_rate,
                interest_cost,
                factoring_cost,
                total_cost,
                margin_per_unit: target_margin,
                lines,
            }
        }
    };

    Ok(breakdown)
}

impl PricingBreakdown {
    /// Extend the per-unit breakdown to a delivery volume in liters.
    pub fn extend(&self, volume: Decimal) -> Result<VolumeTotals, DomainError> {
        if volume <= Decimal::ZERO {
            return Err(DomainError::InvalidVolume);
        }
        Ok(VolumeTotals {
            volume,
            total_revenue: self.client_price * volume,
            total_cost: self.total_cost * volume,
            total_margin: self.margin_per_unit * volume,
        })
    }
}

fn validate(request: &PricingRequest) -> Result<(), DomainError> {
    // The reference rate is exempt: EURIBOR has traded negative and the
    // combined annual rate may legitimately dip below zero.
    non_negative(request.purchase_price, "purchase_price")?;
    non_negative(request.logistics_cost, "logistics_cost")?;
    non_negative(request.bank_spread_pct, "bank_spread_pct")?;
    non_negative(request.factoring_fee_pct, "factoring_fee_pct")?;

    match request.strategy {
        PricingStrategy::DiscountFromCatalogue { catalogue_price, discount_per_cubic_meter } => {
            non_negative(catalogue_price, "catalogue_price")?;
            non_negative(discount_per_cubic_meter, "discount_per_cubic_meter")?;
        }
        PricingStrategy::MarginFirst { target_margin } => {
            non_negative(target_margin, "target_margin")?;
        }
    }

    Ok(())
}

fn non_negative(value: Decimal, field: &'static str) -> Result<(), DomainError> {
    if value < Decimal::ZERO {
        return Err(DomainError::InvalidInput { field });
    }
    Ok(())
}
