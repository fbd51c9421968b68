use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use fuelquote_cli::commands::{
    clients, history, migrate, price, quote, save_client, save_price,
};
use fuelquote_core::config::AppConfig;

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn config_for(url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = url.to_string();
    config.database.max_connections = 1;
    config
}

fn file_backed_config(dir: &tempfile::TempDir) -> AppConfig {
    config_for(&format!("sqlite://{}/fuelquote.db?mode=rwc", dir.path().display()))
}

fn dec(value: &str) -> Decimal {
    value.parse().expect("valid decimal")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn market_args() -> price::MarketArgs {
    price::MarketArgs {
        client: None,
        purchase: Some(dec("1.20")),
        logistics: Some(dec("0.03")),
        credit_days: Some(28),
        euribor: Some(dec("3.80")),
        bank_spread: Some(dec("1.80")),
        factoring_fee: Some(dec("0.30")),
        discount_m3: Some(dec("30")),
        margin: None,
        catalogue: None,
    }
}

#[test]
fn migrate_succeeds_against_an_in_memory_database() {
    let config = config_for("sqlite::memory:");
    let result = migrate::run(&config);
    assert_eq!(result.exit_code, 0, "expected successful migrate run");

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "migrate");
    assert_eq!(payload["status"], "ok");
}

#[test]
fn saved_prices_show_up_in_history() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = file_backed_config(&dir);

    let args = save_price::SavePriceArgs { date: Some(date(2025, 1, 1)), price: dec("1.500") };
    let result = save_price::run(&config, &args);
    assert_eq!(result.exit_code, 0, "save-price should succeed: {}", result.output);

    let args = save_price::SavePriceArgs { date: Some(date(2025, 2, 1)), price: dec("1.600") };
    assert_eq!(save_price::run(&config, &args).exit_code, 0);

    let result = history::run(&config);
    assert_eq!(result.exit_code, 0);
    assert!(result.output.contains("2025-01-01  1.5000"));
    assert!(result.output.contains("current price: 1.6000 (effective 2025-02-01)"));
}

#[test]
fn negative_price_is_a_domain_validation_failure() {
    let config = config_for("sqlite::memory:");
    let args = save_price::SavePriceArgs { date: Some(date(2025, 1, 1)), price: dec("-1") };

    let result = save_price::run(&config, &args);
    assert_eq!(result.exit_code, 5);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "domain_validation");
}

#[test]
fn saved_clients_are_listed_with_their_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = file_backed_config(&dir);

    let args = save_client::SaveClientArgs {
        name: "RD Trans".to_owned(),
        contact: Some("J. Novak".to_owned()),
        email: None,
        phone: None,
        payment_days: Some(28),
        logistics: Some(dec("0.030")),
        discount_m3: Some(dec("30")),
        margin: None,
    };
    let result = save_client::run(&config, &args);
    assert_eq!(result.exit_code, 0, "save-client should succeed: {}", result.output);

    let result = clients::run(&config);
    assert_eq!(result.exit_code, 0);
    assert!(result.output.contains("RD Trans"));
    assert!(result.output.contains("discount 30.00 EUR/m3"));
    assert!(result.output.contains("contact: J. Novak"));
}

#[test]
fn price_breakdown_prints_the_worked_example() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = file_backed_config(&dir);

    let args = save_price::SavePriceArgs { date: Some(date(2025, 1, 1)), price: dec("1.500") };
    assert_eq!(save_price::run(&config, &args).exit_code, 0);

    let result = price::run(&config, &price::PriceArgs { market: market_args() });
    assert_eq!(result.exit_code, 0, "price should succeed: {}", result.output);
    assert!(result.output.contains("client price: 1.4700 EUR/l"));
    assert!(result.output.contains("margin per liter: 0.2303 EUR/l"));
}

#[test]
fn discount_pricing_without_a_catalogue_price_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = file_backed_config(&dir);

    let result = price::run(&config, &price::PriceArgs { market: market_args() });
    assert_eq!(result.exit_code, 5);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["error_class"], "domain_validation");
}

#[test]
fn quote_renders_the_offer_text() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = file_backed_config(&dir);

    let args = save_price::SavePriceArgs { date: Some(date(2025, 1, 1)), price: dec("1.500") };
    assert_eq!(save_price::run(&config, &args).exit_code, 0);

    let args = quote::QuoteArgs {
        market: market_args(),
        name: Some("RD Trans".to_owned()),
        volume: Some(dec("30000")),
        valid_until: Some(date(2025, 3, 4)),
        output: None,
    };
    let result = quote::run(&config, &args);
    assert_eq!(result.exit_code, 0, "quote should succeed: {}", result.output);
    assert!(result.output.contains("PRICE QUOTATION - diesel fuel"));
    assert!(result.output.contains("Client: RD Trans"));
    assert!(result.output.contains("Total delivery value: 44100.00 EUR"));
}

#[test]
fn quote_without_volume_keeps_the_breakdown_and_skips_the_text() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = file_backed_config(&dir);

    let args = save_price::SavePriceArgs { date: Some(date(2025, 1, 1)), price: dec("1.500") };
    assert_eq!(save_price::run(&config, &args).exit_code, 0);

    let args = quote::QuoteArgs {
        market: market_args(),
        name: Some("RD Trans".to_owned()),
        volume: None,
        valid_until: None,
        output: None,
    };
    let result = quote::run(&config, &args);
    assert_eq!(result.exit_code, 0);
    assert!(result.output.contains("client price: 1.4700 EUR/l"));
    assert!(result.output.contains("quotation skipped"));
    assert!(!result.output.contains("PRICE QUOTATION"));
}

#[test]
fn quote_writes_the_offer_to_a_file_when_asked() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = file_backed_config(&dir);

    let args = save_price::SavePriceArgs { date: Some(date(2025, 1, 1)), price: dec("1.500") };
    assert_eq!(save_price::run(&config, &args).exit_code, 0);

    let output_path = dir.path().join("offer.txt");
    let args = quote::QuoteArgs {
        market: market_args(),
        name: Some("RD Trans".to_owned()),
        volume: Some(dec("30000")),
        valid_until: Some(date(2025, 3, 4)),
        output: Some(output_path.clone()),
    };
    let result = quote::run(&config, &args);
    assert_eq!(result.exit_code, 0, "quote should succeed: {}", result.output);

    let text = std::fs::read_to_string(&output_path).expect("offer file");
    assert!(text.contains("Client: RD Trans"));
    assert!(text.contains("Offer valid until: 2025-03-04"));
}
