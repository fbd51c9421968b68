use clap::Args;
use rust_decimal::Decimal;

use fuelquote_core::config::AppConfig;
use fuelquote_core::domain::client::{Client, PricingDefault};
use fuelquote_core::errors::DomainError;
use fuelquote_core::pricing::{self, PricingBreakdown, PricingRequest, PricingStrategy};
use fuelquote_core::session::Session;

use crate::commands::CommandResult;

/// Market inputs shared by `price` and `quote`. Anything left unset falls
/// back to the selected client's defaults, then to the configured market
/// defaults.
#[derive(Debug, Args)]
pub struct MarketArgs {
    #[arg(long, help = "Pick defaults (and the quotation contact) from this directory client")]
    pub client: Option<String>,
    #[arg(long, value_name = "EUR_L", help = "Purchase price of the fuel")]
    pub purchase: Option<Decimal>,
    #[arg(long, value_name = "EUR_L", help = "Per-liter logistics cost")]
    pub logistics: Option<Decimal>,
    #[arg(long, value_name = "DAYS", help = "Credit period from purchase to payment")]
    pub credit_days: Option<u32>,
    #[arg(long, value_name = "PCT", help = "Reference rate (1M EURIBOR), percent", allow_hyphen_values = true)]
    pub euribor: Option<Decimal>,
    #[arg(long, value_name = "PCT", help = "Bank spread over the reference rate, percent")]
    pub bank_spread: Option<Decimal>,
    #[arg(long, value_name = "PCT", help = "Factoring fee, percent of the invoiced amount")]
    pub factoring_fee: Option<Decimal>,
    #[arg(
        long,
        value_name = "EUR_M3",
        conflicts_with = "margin",
        help = "Discount off the catalogue price, EUR per m3"
    )]
    pub discount_m3: Option<Decimal>,
    #[arg(long, value_name = "EUR_L", help = "Target margin, EUR per liter (margin-first pricing)")]
    pub margin: Option<Decimal>,
    #[arg(long, value_name = "EUR_L", help = "Catalogue price override; defaults to the ledger")]
    pub catalogue: Option<Decimal>,
}

#[derive(Debug, Args)]
pub struct PriceArgs {
    #[command(flatten)]
    pub market: MarketArgs,
}

/// Resolve explicit flags, client defaults, and configured defaults into one
/// pricing request. Discount pricing without a catalogue price fails here,
/// before any computation.
pub(crate) fn resolve_request(
    session: &Session,
    config: &AppConfig,
    args: &MarketArgs,
) -> Result<(PricingRequest, Option<Client>), DomainError> {
    let client = match &args.client {
        Some(name) => Some(session.find_client(name)?),
        None => None,
    };

    let catalogue_price = |explicit: Option<Decimal>| match explicit {
        Some(price) => Ok(price),
        None => session.current_price(),
    };

    let strategy = if let Some(margin) = args.margin {
        PricingStrategy::MarginFirst { target_margin: margin }
    } else if let Some(discount) = args.discount_m3 {
        PricingStrategy::DiscountFromCatalogue {
            catalogue_price: catalogue_price(args.catalogue)?,
            discount_per_cubic_meter: discount,
        }
    } else {
        match client.as_ref().map(|c| c.pricing_default) {
            Some(PricingDefault::MarginPerUnit(margin)) => {
                PricingStrategy::MarginFirst { target_margin: margin }
            }
            Some(PricingDefault::DiscountPerCubicMeter(discount)) => {
                PricingStrategy::DiscountFromCatalogue {
                    catalogue_price: catalogue_price(args.catalogue)?,
                    discount_per_cubic_meter: discount,
                }
            }
            // No client selected: quote straight off the catalogue price.
            None => PricingStrategy::DiscountFromCatalogue {
                catalogue_price: catalogue_price(args.catalogue)?,
                discount_per_cubic_meter: Decimal::ZERO,
            },
        }
    };

    let request = PricingRequest {
        purchase_price: args.purchase.unwrap_or(config.pricing.purchase_price),
        logistics_cost: args
            .logistics
            .or_else(|| client.as_ref().map(|c| c.logistics_cost))
            .unwrap_or(config.pricing.logistics_cost),
        credit_days: args
            .credit_days
            .or_else(|| client.as_ref().map(|c| c.payment_days))
            .unwrap_or(config.pricing.credit_days),
        reference_rate_pct: args.euribor.unwrap_or(config.pricing.reference_rate_pct),
        bank_spread_pct: args.bank_spread.unwrap_or(config.pricing.bank_spread_pct),
        factoring_fee_pct: args.factoring_fee.unwrap_or(config.pricing.factoring_fee_pct),
        strategy,
    };

    Ok((request, client))
}

pub(crate) fn format_breakdown(breakdown: &PricingBreakdown) -> String {
    let mut lines = vec!["cost and margin breakdown (EUR/l):".to_string()];
    for line in &breakdown.lines {
        lines.push(format!(
            "  {:<12} {:<44} {}",
            line.stage,
            line.detail,
            super::format_unit(line.amount)
        ));
    }
    lines.push(format!("client price: {} EUR/l", super::format_unit(breakdown.client_price)));
    lines.push(format!(
        "margin per liter: {} EUR/l",
        super::format_unit(breakdown.margin_per_unit)
    ));
    lines.join("\n")
}

pub fn run(config: &AppConfig, args: &PriceArgs) -> CommandResult {
    let session = match super::block_on("price", super::open_session(config)) {
        Ok(session) => session,
        Err(failure) => return failure,
    };

    let (request, _client) = match resolve_request(&session, config, &args.market) {
        Ok(resolved) => resolved,
        Err(error) => {
            return CommandResult::failure("price", "domain_validation", error.to_string(), 5)
        }
    };

    match pricing::price(&request) {
        Ok(breakdown) => CommandResult::plain(format_breakdown(&breakdown)),
        Err(error) => CommandResult::failure("price", "domain_validation", error.to_string(), 5),
    }
}
