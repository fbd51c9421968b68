//! Quotation text rendering.
//!
//! The core hands back a structured `QuotationRecord`; this module owns the
//! textual shape of the offer via an embedded Tera template.

use std::collections::HashMap;

use tera::{Context, Tera};

use fuelquote_core::domain::quotation::QuotationRecord;

const TEMPLATE_NAME: &str = "quotation.txt";

const QUOTATION_TEMPLATE: &str = "\
PRICE QUOTATION - diesel fuel

Client: {{ client_name }}
Volume: {{ volume | money }} l

{% if catalogue_price -%}
Base catalogue price: {{ catalogue_price | unit }} EUR/l
Client discount: {{ discount_per_cubic_meter | money }} EUR/m3 (= {{ discount_per_unit | unit }} EUR/l)

{% endif -%}
Unit client price: {{ unit_price | unit }} EUR/l
Total delivery value: {{ total_revenue | money }} EUR

Supplier cost:
- purchase + logistics: {{ base_cost | unit }} EUR/l
- financing ({{ credit_days }} days, reference {{ reference_rate_pct | money }} % + {{ bank_spread_pct | money }} %): {{ interest_cost | unit }} EUR/l
- factoring fee {{ factoring_fee_pct | money }} %: {{ factoring_cost | unit }} EUR/l
- total cost: {{ total_cost | unit }} EUR/l

Estimated supplier margin:
- margin per liter: {{ margin_per_unit | unit }} EUR/l
- total margin on the volume: {{ total_margin | money }} EUR

{% if contact_name -%}
Contact: {{ contact_name }}
{% endif -%}
{% if email -%}
Email: {{ email }}
{% endif -%}
{% if phone -%}
Phone: {{ phone }}
{% endif -%}
Offer valid until: {{ valid_until }}

{{ city }}, {{ issued_on }}

{{ supplier_name }}
";

/// Register the numeric filters the quotation template relies on.
///
/// - `unit`:  4-decimal per-liter amounts, e.g. `base_cost | unit`
/// - `money`: 2-decimal order totals and percentages, e.g. `total | money`
pub fn register_template_filters(tera: &mut Tera) {
    tera.register_filter("unit", tera_unit_filter);
    tera.register_filter("money", tera_money_filter);
}

// Decimals serialize as strings, so the filters accept both strings and
// plain numbers.
fn numeric_value(value: &tera::Value) -> tera::Result<f64> {
    match value {
        tera::Value::Number(n) => Ok(n.as_f64().unwrap_or(0.0)),
        tera::Value::String(s) => s
            .parse::<f64>()
            .map_err(|_| tera::Error::msg(format!("`{s}` is not a numeric value"))),
        tera::Value::Null => Ok(0.0),
        other => Err(tera::Error::msg(format!("cannot format {other} as a number"))),
    }
}

fn tera_unit_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    Ok(tera::Value::String(format!("{:.4}", numeric_value(value)?)))
}

fn tera_money_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    Ok(tera::Value::String(format!("{:.2}", numeric_value(value)?)))
}

pub fn render_quotation(record: &QuotationRecord, city: &str) -> Result<String, tera::Error> {
    let mut tera = Tera::default();
    register_template_filters(&mut tera);
    tera.add_raw_template(TEMPLATE_NAME, QUOTATION_TEMPLATE)?;

    let mut context = Context::from_serialize(record)?;
    context.insert("city", city);

    tera.render(TEMPLATE_NAME, &context)
}
