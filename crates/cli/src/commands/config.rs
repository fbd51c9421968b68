use fuelquote_core::config::AppConfig;

pub fn run(config: &AppConfig) -> String {
    let lines = vec![
        "effective config (source precedence: overrides > env > file > default):".to_string(),
        format!("database.url = {}", config.database.url),
        format!("database.max_connections = {}", config.database.max_connections),
        format!("database.timeout_secs = {}", config.database.timeout_secs),
        format!("logging.level = {}", config.logging.level),
        format!("logging.format = {:?}", config.logging.format),
        format!("pricing.purchase_price = {}", config.pricing.purchase_price),
        format!("pricing.logistics_cost = {}", config.pricing.logistics_cost),
        format!("pricing.credit_days = {}", config.pricing.credit_days),
        format!("pricing.reference_rate_pct = {}", config.pricing.reference_rate_pct),
        format!("pricing.bank_spread_pct = {}", config.pricing.bank_spread_pct),
        format!("pricing.factoring_fee_pct = {}", config.pricing.factoring_fee_pct),
        format!("quotation.supplier_name = {}", config.quotation.supplier_name),
        format!("quotation.city = {}", config.quotation.city),
        format!("quotation.validity_days = {}", config.quotation.validity_days),
    ];
    lines.join("\n")
}
