use fuelquote_core::config::AppConfig;
use fuelquote_db::{connect_with_settings, migrations};

use crate::commands::CommandResult;

pub fn run(config: &AppConfig) -> CommandResult {
    let result = match super::block_on("migrate", async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;
        pool.close().await;
        Ok::<(), (&'static str, String, u8)>(())
    }) {
        Ok(result) => result,
        Err(failure) => return failure,
    };

    match result {
        Ok(()) => CommandResult::success("migrate", "applied pending migrations"),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("migrate", error_class, message, exit_code)
        }
    }
}
