use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub pricing: PricingConfig,
    pub quotation: QuotationConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Market defaults pre-filled into a calculation when the caller supplies
/// nothing better; mirrors the values a trader would otherwise retype.
#[derive(Clone, Debug)]
pub struct PricingConfig {
    pub purchase_price: Decimal,
    pub logistics_cost: Decimal,
    pub credit_days: u32,
    pub reference_rate_pct: Decimal,
    pub bank_spread_pct: Decimal,
    pub factoring_fee_pct: Decimal,
}

#[derive(Clone, Debug)]
pub struct QuotationConfig {
    pub supplier_name: String,
    pub city: String,
    pub validity_days: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://fuelquote.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
            pricing: PricingConfig {
                purchase_price: Decimal::new(120, 2),
                logistics_cost: Decimal::new(30, 3),
                credit_days: 28,
                reference_rate_pct: Decimal::new(380, 2),
                bank_spread_pct: Decimal::new(180, 2),
                factoring_fee_pct: Decimal::new(30, 2),
            },
            quotation: QuotationConfig {
                supplier_name: "Fuel Traders Corporation s. r. o.".to_string(),
                city: "Bratislava".to_string(),
                validity_days: 3,
            },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("fuelquote.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        if let Some(pricing) = patch.pricing {
            if let Some(purchase_price) = pricing.purchase_price {
                self.pricing.purchase_price = purchase_price;
            }
            if let Some(logistics_cost) = pricing.logistics_cost {
                self.pricing.logistics_cost = logistics_cost;
            }
            if let Some(credit_days) = pricing.credit_days {
                self.pricing.credit_days = credit_days;
            }
            if let Some(reference_rate_pct) = pricing.reference_rate_pct {
                self.pricing.reference_rate_pct = reference_rate_pct;
            }
            if let Some(bank_spread_pct) = pricing.bank_spread_pct {
                self.pricing.bank_spread_pct = bank_spread_pct;
            }
            if let Some(factoring_fee_pct) = pricing.factoring_fee_pct {
                self.pricing.factoring_fee_pct = factoring_fee_pct;
            }
        }

        if let Some(quotation) = patch.quotation {
            if let Some(supplier_name) = quotation.supplier_name {
                self.quotation.supplier_name = supplier_name;
            }
            if let Some(city) = quotation.city {
                self.quotation.city = city;
            }
            if let Some(validity_days) = quotation.validity_days {
                self.quotation.validity_days = validity_days;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("FUELQUOTE_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("FUELQUOTE_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_u32("FUELQUOTE_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("FUELQUOTE_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("FUELQUOTE_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("FUELQUOTE_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("FUELQUOTE_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        if let Some(value) = read_env("FUELQUOTE_PRICING_REFERENCE_RATE_PCT") {
            self.pricing.reference_rate_pct =
                parse_decimal("FUELQUOTE_PRICING_REFERENCE_RATE_PCT", &value)?;
        }
        if let Some(value) = read_env("FUELQUOTE_PRICING_BANK_SPREAD_PCT") {
            self.pricing.bank_spread_pct =
                parse_decimal("FUELQUOTE_PRICING_BANK_SPREAD_PCT", &value)?;
        }
        if let Some(value) = read_env("FUELQUOTE_PRICING_FACTORING_FEE_PCT") {
            self.pricing.factoring_fee_pct =
                parse_decimal("FUELQUOTE_PRICING_FACTORING_FEE_PCT", &value)?;
        }

        if let Some(value) = read_env("FUELQUOTE_QUOTATION_SUPPLIER_NAME") {
            self.quotation.supplier_name = value;
        }
        if let Some(value) = read_env("FUELQUOTE_QUOTATION_VALIDITY_DAYS") {
            self.quotation.validity_days = parse_u32("FUELQUOTE_QUOTATION_VALIDITY_DAYS", &value)?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_logging(&self.logging)?;
        validate_pricing(&self.pricing)?;
        validate_quotation(&self.quotation)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("fuelquote.toml"), PathBuf::from("config/fuelquote.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    match logging.level.trim().to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        other => Err(ConfigError::Validation(format!(
            "unsupported log level `{other}` (expected trace|debug|info|warn|error)"
        ))),
    }
}

fn validate_pricing(pricing: &PricingConfig) -> Result<(), ConfigError> {
    // The reference rate may be negative; everything else must not be.
    for (name, value) in [
        ("pricing.purchase_price", pricing.purchase_price),
        ("pricing.logistics_cost", pricing.logistics_cost),
        ("pricing.bank_spread_pct", pricing.bank_spread_pct),
        ("pricing.factoring_fee_pct", pricing.factoring_fee_pct),
    ] {
        if value < Decimal::ZERO {
            return Err(ConfigError::Validation(format!("{name} must not be negative")));
        }
    }
    Ok(())
}

fn validate_quotation(quotation: &QuotationConfig) -> Result<(), ConfigError> {
    if quotation.supplier_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "quotation.supplier_name must not be empty".to_string(),
        ));
    }
    if quotation.validity_days == 0 {
        return Err(ConfigError::Validation(
            "quotation.validity_days must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    value.parse::<Decimal>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    logging: Option<LoggingPatch>,
    pricing: Option<PricingPatch>,
    quotation: Option<QuotationPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    purchase_price: Option<Decimal>,
    logistics_cost: Option<Decimal>,
    credit_days: Option<u32>,
    reference_rate_pct: Option<Decimal>,
    bank_spread_pct: Option<Decimal>,
    factoring_fee_pct: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct QuotationPatch {
    supplier_name: Option<String>,
    city: Option<String>,
    validity_days: Option<u32>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Mutex, OnceLock};

    use rust_decimal::Decimal;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(Mutex::default)
    }

    #[test]
    fn defaults_load_and_validate() {
        let _guard = env_lock().lock().expect("env lock");
        let config = AppConfig::load(LoadOptions::default()).expect("default config");

        assert_eq!(config.database.url, "sqlite://fuelquote.db");
        assert_eq!(config.pricing.credit_days, 28);
        assert_eq!(config.pricing.reference_rate_pct, Decimal::new(380, 2));
        assert_eq!(config.quotation.validity_days, 3);
    }

    #[test]
    fn toml_patch_overrides_defaults() {
        let _guard = env_lock().lock().expect("env lock");
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[database]\nurl = \"sqlite::memory:\"\n\n\
             [pricing]\nfactoring_fee_pct = 0.25\ncredit_days = 14\n\n\
             [logging]\nformat = \"json\""
        )
        .expect("write patch");

        let options = LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        };
        let config = AppConfig::load(options).expect("patched config");

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.pricing.factoring_fee_pct, Decimal::new(25, 2));
        assert_eq!(config.pricing.credit_days, 14);
        assert_eq!(config.logging.format, LogFormat::Json);
        // Untouched sections keep their defaults.
        assert_eq!(config.pricing.bank_spread_pct, Decimal::new(180, 2));
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let _guard = env_lock().lock().expect("env lock");
        let options = LoadOptions {
            config_path: Some("does/not/exist.toml".into()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        };
        let error = AppConfig::load(options).expect_err("missing file");
        assert!(matches!(error, ConfigError::MissingConfigFile(_)));
    }

    #[test]
    fn env_overrides_beat_file_values() {
        let _guard = env_lock().lock().expect("env lock");
        std::env::set_var("FUELQUOTE_DATABASE_URL", "sqlite::memory:");
        std::env::set_var("FUELQUOTE_PRICING_BANK_SPREAD_PCT", "2.10");

        let result = AppConfig::load(LoadOptions::default());

        std::env::remove_var("FUELQUOTE_DATABASE_URL");
        std::env::remove_var("FUELQUOTE_PRICING_BANK_SPREAD_PCT");

        let config = result.expect("config with env overrides");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.pricing.bank_spread_pct, Decimal::new(210, 2));
    }

    #[test]
    fn malformed_env_override_is_rejected() {
        let _guard = env_lock().lock().expect("env lock");
        std::env::set_var("FUELQUOTE_PRICING_FACTORING_FEE_PCT", "a-lot");

        let result = AppConfig::load(LoadOptions::default());
        std::env::remove_var("FUELQUOTE_PRICING_FACTORING_FEE_PCT");

        assert!(matches!(result, Err(ConfigError::InvalidEnvOverride { .. })));
    }

    #[test]
    fn programmatic_overrides_win_over_everything() {
        let _guard = env_lock().lock().expect("env lock");
        let options = LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:".to_string()),
                log_level: Some("debug".to_string()),
            },
            ..LoadOptions::default()
        };
        let config = AppConfig::load(options).expect("config");

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn non_sqlite_database_url_fails_validation() {
        let _guard = env_lock().lock().expect("env lock");
        let options = LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("postgres://nope".to_string()),
                log_level: None,
            },
            ..LoadOptions::default()
        };
        let error = AppConfig::load(options).expect_err("bad url");
        assert!(matches!(error, ConfigError::Validation(_)));
    }
}
