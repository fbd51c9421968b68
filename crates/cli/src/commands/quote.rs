use std::fs;
use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;

use fuelquote_core::config::AppConfig;
use fuelquote_core::quotation::OfferDetails;

use crate::commands::price::{format_breakdown, resolve_request, MarketArgs};
use crate::commands::CommandResult;
use crate::render;

#[derive(Debug, Args)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub market: MarketArgs,
    #[arg(long, help = "Client name printed on the offer; defaults to --client")]
    pub name: Option<String>,
    #[arg(long, value_name = "LITERS", help = "Delivery volume")]
    pub volume: Option<Decimal>,
    #[arg(long, value_name = "YYYY-MM-DD", help = "Offer validity; defaults to the configured window")]
    pub valid_until: Option<NaiveDate>,
    #[arg(long, value_name = "PATH", help = "Write the quotation text to a file")]
    pub output: Option<PathBuf>,
}

pub fn run(config: &AppConfig, args: &QuoteArgs) -> CommandResult {
    let session = match super::block_on("quote", super::open_session(config)) {
        Ok(session) => session,
        Err(failure) => return failure,
    };

    let (request, client) = match resolve_request(&session, config, &args.market) {
        Ok(resolved) => resolved,
        Err(error) => {
            return CommandResult::failure("quote", "domain_validation", error.to_string(), 5)
        }
    };

    let issued_on = chrono::Local::now().date_naive();
    let offer = OfferDetails {
        client_name: args
            .name
            .clone()
            .or_else(|| client.as_ref().map(|c| c.name.clone()))
            .unwrap_or_default(),
        volume: args.volume.unwrap_or(Decimal::ZERO),
        issued_on,
        valid_until: args
            .valid_until
            .unwrap_or(issued_on + Duration::days(i64::from(config.quotation.validity_days))),
        supplier_name: config.quotation.supplier_name.clone(),
    };

    let outcome = match session.quote(&request, &offer) {
        Ok(outcome) => outcome,
        Err(error) => {
            return CommandResult::failure("quote", "domain_validation", error.to_string(), 5)
        }
    };

    let mut sections = vec![format_breakdown(&outcome.breakdown)];

    match outcome.quotation {
        Some(record) => {
            let text = match render::render_quotation(&record, &config.quotation.city) {
                Ok(text) => text,
                Err(error) => {
                    return CommandResult::failure("quote", "render", error.to_string(), 6)
                }
            };
            match &args.output {
                Some(path) => {
                    if let Err(error) = fs::write(path, &text) {
                        return CommandResult::failure("quote", "io", error.to_string(), 7);
                    }
                    sections.push(format!("quotation written to {}", path.display()));
                }
                None => sections.push(text),
            }
        }
        None => sections.push(
            "quotation skipped: provide --name (or --client) and a positive --volume".to_string(),
        ),
    }

    CommandResult::plain(sections.join("\n\n"))
}
