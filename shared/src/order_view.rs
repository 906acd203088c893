//! Derived data for the read-only order detail view.
//!
//! Item totals and `Order::total_amount` are never reconciled: with items the
//! grand total comes from the items, without them it is the order's own total.

use crate::{Order, OrderItem, OrderStatus};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSummary {
    pub total_items: i64,
    pub subtotal: f64,
    pub total_discount: f64,
    pub grand_total: f64,
}

impl OrderSummary {
    pub fn from_items(items: &[OrderItem]) -> Self {
        let total_items = items.iter().map(|item| item.quantity).sum();
        let subtotal = items
            .iter()
            .map(|item| item.unit_price * item.quantity as f64)
            .sum::<f64>();
        let total_discount = items.iter().map(|item| item.discount).sum::<f64>();

        Self {
            total_items,
            subtotal,
            total_discount,
            grand_total: subtotal - total_discount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineStage {
    Created,
    Shipped,
    Delivered,
    Cancelled,
}

impl TimelineStage {
    pub fn label(&self) -> &'static str {
        match self {
            TimelineStage::Created => "Created",
            TimelineStage::Shipped => "Shipped",
            TimelineStage::Delivered => "Delivered",
            TimelineStage::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub stage: TimelineStage,
    pub timestamp: String,
}

/// Status history of `order`. Every stage after creation reuses `updated_at`,
/// the only other timestamp an order carries.
pub fn timeline(order: &Order) -> Vec<TimelineEntry> {
    let mut entries = vec![TimelineEntry {
        stage: TimelineStage::Created,
        timestamp: order.created_at.clone(),
    }];

    let updated = |stage| TimelineEntry {
        stage,
        timestamp: order.updated_at.clone(),
    };

    if order.status != OrderStatus::Pending {
        entries.push(updated(TimelineStage::Shipped));
    }
    match order.status {
        OrderStatus::Delivered => entries.push(updated(TimelineStage::Delivered)),
        OrderStatus::Cancelled => entries.push(updated(TimelineStage::Cancelled)),
        OrderStatus::Pending | OrderStatus::Shipped => {}
    }
    entries
}

/// Everything the order detail modal renders
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// `None` when the order has no items loaded
    pub summary: Option<OrderSummary>,
    pub grand_total: f64,
    pub timeline: Vec<TimelineEntry>,
}

impl OrderDetails {
    pub fn new(order: &Order, items: Option<&[OrderItem]>) -> Self {
        let items = items.unwrap_or_default().to_vec();
        let summary = if items.is_empty() {
            None
        } else {
            Some(OrderSummary::from_items(&items))
        };
        let grand_total = summary.map_or(order.total_amount, |summary| summary.grand_total);

        Self {
            order: order.clone(),
            items,
            summary,
            grand_total,
            timeline: timeline(order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: OrderStatus) -> Order {
        Order {
            order_id: 5,
            status,
            order_date: "2024-03-01".to_string(),
            customer_id: 2,
            shipping_address: "1 Main St".to_string(),
            total_amount: 99.5,
            quotation_id: Some(11),
            created_at: "2024-03-01T09:00:00Z".to_string(),
            updated_at: "2024-03-04T15:30:00Z".to_string(),
        }
    }

    fn item(id: i64, quantity: i64, unit_price: f64, discount: f64) -> OrderItem {
        OrderItem {
            order_item_id: id,
            product_id: id,
            product_name: format!("Item {}", id),
            quantity,
            unit_price,
            discount,
            line_total: unit_price * quantity as f64 - discount,
        }
    }

    fn stages(order: &Order) -> Vec<TimelineStage> {
        timeline(order).into_iter().map(|entry| entry.stage).collect()
    }

    #[test]
    fn test_summary_from_items() {
        let items = vec![item(1, 2, 10.0, 1.0), item(2, 1, 5.0, 0.0)];
        let summary = OrderSummary::from_items(&items);

        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.subtotal, 25.0);
        assert_eq!(summary.total_discount, 1.0);
        assert_eq!(summary.grand_total, 24.0);
    }

    #[test]
    fn test_grand_total_uses_items_when_present() {
        let items = vec![item(1, 2, 10.0, 1.0), item(2, 1, 5.0, 0.0)];
        let details = OrderDetails::new(&order(OrderStatus::Pending), Some(items.as_slice()));

        assert_eq!(details.grand_total, 24.0);
        assert!(details.summary.is_some());
        assert_eq!(details.items.len(), 2);
    }

    #[test]
    fn test_grand_total_falls_back_to_order_total() {
        let details = OrderDetails::new(&order(OrderStatus::Pending), None);
        assert_eq!(details.summary, None);
        assert_eq!(details.grand_total, 99.5);

        let details = OrderDetails::new(&order(OrderStatus::Pending), Some(&[][..]));
        assert_eq!(details.grand_total, 99.5);
    }

    #[test]
    fn test_timeline_by_status() {
        use TimelineStage::*;

        assert_eq!(stages(&order(OrderStatus::Pending)), vec![Created]);
        assert_eq!(stages(&order(OrderStatus::Shipped)), vec![Created, Shipped]);
        assert_eq!(
            stages(&order(OrderStatus::Delivered)),
            vec![Created, Shipped, Delivered]
        );
        assert_eq!(
            stages(&order(OrderStatus::Cancelled)),
            vec![Created, Shipped, Cancelled]
        );
    }

    #[test]
    fn test_timeline_timestamps() {
        let entries = timeline(&order(OrderStatus::Delivered));
        assert_eq!(entries[0].timestamp, "2024-03-01T09:00:00Z");
        assert_eq!(entries[1].timestamp, "2024-03-04T15:30:00Z");
        assert_eq!(entries[2].timestamp, entries[1].timestamp);
        assert_eq!(entries[2].stage.label(), "Delivered");
    }
}
