use fuelquote_core::config::AppConfig;

use crate::commands::CommandResult;

pub fn run(config: &AppConfig) -> CommandResult {
    let session = match super::block_on("history", super::open_session(config)) {
        Ok(session) => session,
        Err(failure) => return failure,
    };

    let history = session.price_history();
    if history.is_empty() {
        return CommandResult::plain("no catalogue prices saved yet");
    }

    let mut lines = vec!["catalogue price history (EUR/l):".to_string()];
    for entry in &history {
        lines.push(format!("  {}  {}", entry.effective_date, super::format_unit(entry.price)));
    }
    if let Ok(current) = session.current_entry() {
        lines.push(format!(
            "current price: {} (effective {})",
            super::format_unit(current.price),
            current.effective_date
        ));
    }

    CommandResult::plain(lines.join("\n"))
}
