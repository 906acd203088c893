//! Display formatting for money, dates and status badges.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::config::DisplayConfig;
use crate::OrderStatus;

/// Format `amount` with the currency symbol and thousands separators: `$1,234.50`
pub fn format_money(amount: f64, config: &DisplayConfig) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(config.thousands_separator);
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}{}.{:02}", sign, config.currency_symbol, grouped, fraction)
}

/// Format a date or timestamp as a calendar date ("June 19, 2025").
/// Unparseable input is returned unchanged.
pub fn format_date(value: &str, config: &DisplayConfig) -> String {
    if let Some(datetime) = parse_datetime(value) {
        return datetime.format(&config.date_format).to_string();
    }
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(date) => date.format(&config.date_format).to_string(),
        Err(_) => value.to_string(),
    }
}

/// Format a timestamp with its time of day. Bare dates fall back to `format_date`.
pub fn format_datetime(value: &str, config: &DisplayConfig) -> String {
    match parse_datetime(value) {
        Some(datetime) => datetime.format(&config.datetime_format).to_string(),
        None => format_date(value, config),
    }
}

// Timestamps are shown in the zone they were recorded in
fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.naive_local());
    }
    [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Label and CSS class for a status pill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub css_class: &'static str,
}

impl OrderStatus {
    pub fn badge(&self) -> StatusBadge {
        let css_class = match self {
            OrderStatus::Pending => "badge badge-pending",
            OrderStatus::Shipped => "badge badge-shipped",
            OrderStatus::Delivered => "badge badge-delivered",
            OrderStatus::Cancelled => "badge badge-cancelled",
        };
        StatusBadge {
            label: self.as_str(),
            css_class,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
}

impl StockLevel {
    pub fn classify(current_stock: i64, reorder_level: i64) -> Self {
        if current_stock <= 0 {
            StockLevel::OutOfStock
        } else if current_stock <= reorder_level {
            StockLevel::Low
        } else {
            StockLevel::InStock
        }
    }

    pub fn badge(&self) -> StatusBadge {
        match self {
            StockLevel::OutOfStock => StatusBadge {
                label: "Out of Stock",
                css_class: "badge badge-out-of-stock",
            },
            StockLevel::Low => StatusBadge {
                label: "Low Stock",
                css_class: "badge badge-low-stock",
            },
            StockLevel::InStock => StatusBadge {
                label: "In Stock",
                css_class: "badge badge-in-stock",
            },
        }
    }
}
