use rust_decimal::{Decimal, RoundingStrategy};

/// Badge class for a payment status.
pub fn status_color(status: &str) -> &'static str {
    match status.to_lowercase().as_str() {
        "completed" => "bg-green-500",
        "pending" => "bg-yellow-500",
        "failed" => "bg-red-500",
        _ => "bg-gray-500",
    }
}

/// "Name (email)" when a display name is set, the bare email otherwise.
pub fn user_label(display_name: Option<&str>, email: Option<&str>) -> String {
    match (display_name.filter(|n| !n.trim().is_empty()), email) {
        (Some(name), Some(email)) => format!("{} ({})", name, email),
        (None, Some(email)) => email.to_string(),
        _ => "Unknown".to_string(),
    }
}

pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

pub fn format_amount(currency: &str, amount: Decimal) -> String {
    format!("{} {}", currency, format_money(amount))
}
