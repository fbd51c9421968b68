use fuelquote_core::config::AppConfig;
use fuelquote_core::domain::client::PricingDefault;

use crate::commands::CommandResult;

pub fn run(config: &AppConfig) -> CommandResult {
    let session = match super::block_on("clients", super::open_session(config)) {
        Ok(session) => session,
        Err(failure) => return failure,
    };

    let clients = session.clients();
    if clients.is_empty() {
        return CommandResult::plain("no clients in the directory yet");
    }

    let mut lines = vec!["clients:".to_string()];
    for client in &clients {
        let pricing = match client.pricing_default {
            PricingDefault::DiscountPerCubicMeter(discount) => {
                format!("discount {} EUR/m3", super::format_money(discount))
            }
            PricingDefault::MarginPerUnit(margin) => {
                format!("margin {} EUR/l", super::format_unit(margin))
            }
        };
        lines.push(format!(
            "  {}  payment {} days, logistics {} EUR/l, {}",
            client.name,
            client.payment_days,
            super::format_unit(client.logistics_cost),
            pricing
        ));
        if let Some(contact) = &client.contact_name {
            lines.push(format!("      contact: {contact}"));
        }
        if let Some(email) = &client.email {
            lines.push(format!("      email: {email}"));
        }
        if let Some(phone) = &client.phone {
            lines.push(format!("      phone: {phone}"));
        }
    }

    CommandResult::plain(lines.join("\n"))
}
