use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod edit_form;
pub mod error;
pub mod formatting;
pub mod inventory_form;
pub mod lookup;
pub mod order_status;
pub mod order_view;
pub mod validation;

pub use config::DisplayConfig;
pub use edit_form::{EditDraft, EditField, EditFormState, EditMode};
pub use error::{FormError, LookupError};
pub use inventory_form::{InventoryField, InventoryFormState};
pub use lookup::ContactEmailLookup;
pub use formatting::{StatusBadge, StockLevel};
pub use order_status::{StatusDecision, StatusOption, StatusUpdateState};
pub use order_view::{OrderDetails, OrderSummary, TimelineEntry, TimelineStage};
pub use validation::{SubmitOutcome, TouchedSet, ValidationErrors};

/// A customer company. `customer_id` is 0 until the record has been created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub company_name: String,
    pub industry: String,
    pub address: String,
    pub website: String,
    pub email: String,
    pub phone: String,
}

/// A person at a customer. `contact_id` is 0 until the record has been created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub contact_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub email: String,
    pub phone: String,
}

/// Sellable product, used to populate the inventory product picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub unit_price: f64,
}

/// Stock line for a single product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub inventory_id: i64,
    pub product_id: i64,
    pub current_stock: i64,
    pub reorder_level: i64,
}

/// Editable copy of an inventory line. Empty inputs are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryDraft {
    pub inventory_id: Option<i64>,
    /// 0 means no product selected yet
    pub product_id: Option<i64>,
    pub current_stock: Option<i64>,
    pub reorder_level: Option<i64>,
}

impl From<&Inventory> for InventoryDraft {
    fn from(inventory: &Inventory) -> Self {
        Self {
            inventory_id: Some(inventory.inventory_id),
            product_id: Some(inventory.product_id),
            current_stock: Some(inventory.current_stock),
            reorder_level: Some(inventory.reorder_level),
        }
    }
}

/// Validated inventory payload emitted on save. `inventory_id` is `None` for new rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryChanges {
    pub inventory_id: Option<i64>,
    pub product_id: i64,
    pub current_stock: i64,
    pub reorder_level: i64,
}

/// Fulfilment status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Result<Self, OrderStatusError> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| OrderStatusError::Unknown(value.to_string()))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderStatusError {
    Unknown(String),
}

impl fmt::Display for OrderStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatusError::Unknown(value) => write!(f, "Unknown order status: {}", value),
        }
    }
}

impl std::error::Error for OrderStatusError {}

/// A customer order as shown in the order views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub status: OrderStatus,
    /// ISO 8601 date (YYYY-MM-DD) or RFC 3339 timestamp
    pub order_date: String,
    pub customer_id: i64,
    pub shipping_address: String,
    pub total_amount: f64,
    pub quotation_id: Option<i64>,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// RFC 3339 timestamp
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_item_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount: f64,
    pub line_total: f64,
}

/// Status change requested by the update-status modal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub order_id: i64,
    pub status: OrderStatus,
}

/// Response of the contact email lookup endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailExistsResponse {
    pub exists: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_parse() {
        assert_eq!(OrderStatus::parse("Pending").unwrap(), OrderStatus::Pending);
        assert_eq!(OrderStatus::parse(" shipped ").unwrap(), OrderStatus::Shipped);
        assert_eq!(OrderStatus::parse("DELIVERED").unwrap(), OrderStatus::Delivered);
        assert!(OrderStatus::parse("Returned").is_err());
        assert!(OrderStatus::parse("").is_err());
    }

    #[test]
    fn test_order_status_serializes_by_name() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "\"Cancelled\"");

        let status: OrderStatus = serde_json::from_str("\"Shipped\"").unwrap();
        assert_eq!(status, OrderStatus::Shipped);
    }

    #[test]
    fn test_status_update_wire_shape() {
        let update = StatusUpdate {
            order_id: 42,
            status: OrderStatus::Shipped,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, serde_json::json!({ "orderId": 42, "status": "Shipped" }));
    }

    #[test]
    fn test_inventory_draft_is_an_owned_copy() {
        let source = Inventory {
            inventory_id: 7,
            product_id: 3,
            current_stock: 10,
            reorder_level: 4,
        };

        let mut draft = InventoryDraft::from(&source);
        draft.current_stock = Some(1);

        assert_eq!(source.current_stock, 10);
        assert_eq!(draft.inventory_id, Some(7));
        assert_eq!(draft.product_id, Some(3));
    }
}
