pub mod clients;
pub mod config;
pub mod history;
pub mod migrate;
pub mod price;
pub mod quote;
pub mod save_client;
pub mod save_price;

use std::future::Future;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use fuelquote_core::config::AppConfig;
use fuelquote_core::session::Session;
use fuelquote_db::{connect_with_settings, migrations, SqlClientStore, SqlPriceStore};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn plain(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Run one async command body on a fresh current-thread runtime.
pub(crate) fn block_on<T>(command: &str, future: impl Future<Output = T>) -> Result<T, CommandResult> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(
        |error| {
            CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            )
        },
    )?;
    Ok(runtime.block_on(future))
}

/// Open the session backing one CLI invocation. An unreachable or
/// unmigratable database degrades to in-memory state with a warning; the
/// calculator stays usable either way.
pub(crate) async fn open_session(config: &AppConfig) -> Session {
    match connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    {
        Ok(pool) => {
            if let Err(error) = migrations::run_pending(&pool).await {
                warn!(%error, "migrations failed, continuing with in-memory state only");
                return Session::in_memory();
            }
            let price_store = Arc::new(SqlPriceStore::new(pool.clone()));
            let client_store = Arc::new(SqlClientStore::new(pool));
            Session::open(Some(price_store), Some(client_store)).await
        }
        Err(error) => {
            warn!(%error, "database unavailable, running with in-memory state only");
            Session::in_memory()
        }
    }
}

/// Per-liter amounts print with 4 decimals, order totals with 2.
pub(crate) fn format_unit(value: Decimal) -> String {
    format!("{:.4}", value)
}

pub(crate) fn format_money(value: Decimal) -> String {
    format!("{:.2}", value)
}
