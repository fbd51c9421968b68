use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;

use fuelquote_core::config::AppConfig;

use crate::commands::CommandResult;

#[derive(Debug, Args)]
pub struct SavePriceArgs {
    #[arg(long, value_name = "YYYY-MM-DD", help = "Effective date; defaults to today")]
    pub date: Option<NaiveDate>,
    #[arg(long, value_name = "EUR_L", help = "Catalogue price in EUR per liter")]
    pub price: Decimal,
}

pub fn run(config: &AppConfig, args: &SavePriceArgs) -> CommandResult {
    let date = args.date.unwrap_or_else(|| chrono::Local::now().date_naive());

    let outcome = match super::block_on("save-price", async {
        let mut session = super::open_session(config).await;
        session.save_price(date, args.price).await
    }) {
        Ok(outcome) => outcome,
        Err(failure) => return failure,
    };

    match outcome {
        Ok(()) => CommandResult::success(
            "save-price",
            format!("catalogue price {} EUR/l saved for {date}", super::format_unit(args.price)),
        ),
        Err(error) => {
            CommandResult::failure("save-price", "domain_validation", error.to_string(), 5)
        }
    }
}
