use clap::Args;
use rust_decimal::Decimal;

use fuelquote_core::config::AppConfig;
use fuelquote_core::domain::client::{Client, PricingDefault};

use crate::commands::CommandResult;

#[derive(Debug, Args)]
pub struct SaveClientArgs {
    #[arg(long, help = "Client name; the case-insensitive directory key")]
    pub name: String,
    #[arg(long, help = "Contact person")]
    pub contact: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long, value_name = "DAYS", help = "Default credit period")]
    pub payment_days: Option<u32>,
    #[arg(long, value_name = "EUR_L", help = "Default per-liter logistics cost")]
    pub logistics: Option<Decimal>,
    #[arg(
        long,
        value_name = "EUR_M3",
        conflicts_with = "margin",
        help = "Default discount off the catalogue price, EUR per m3"
    )]
    pub discount_m3: Option<Decimal>,
    #[arg(long, value_name = "EUR_L", help = "Default target margin, EUR per liter")]
    pub margin: Option<Decimal>,
}

pub fn run(config: &AppConfig, args: &SaveClientArgs) -> CommandResult {
    let pricing_default = match (args.discount_m3, args.margin) {
        (_, Some(margin)) => PricingDefault::MarginPerUnit(margin),
        (Some(discount), None) => PricingDefault::DiscountPerCubicMeter(discount),
        (None, None) => PricingDefault::DiscountPerCubicMeter(Decimal::ZERO),
    };
    let client = Client {
        name: args.name.clone(),
        contact_name: args.contact.clone(),
        email: args.email.clone(),
        phone: args.phone.clone(),
        payment_days: args.payment_days.unwrap_or(config.pricing.credit_days),
        logistics_cost: args.logistics.unwrap_or(config.pricing.logistics_cost),
        pricing_default,
    };

    let outcome = match super::block_on("save-client", async {
        let mut session = super::open_session(config).await;
        session.save_client(client).await
    }) {
        Ok(outcome) => outcome,
        Err(failure) => return failure,
    };

    match outcome {
        Ok(stored) => {
            CommandResult::success("save-client", format!("client `{}` saved", stored.name))
        }
        Err(error) => {
            CommandResult::failure("save-client", "domain_validation", error.to_string(), 5)
        }
    }
}
