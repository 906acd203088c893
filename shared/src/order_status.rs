//! Order status transitions and the update-status picker state.

use tracing::debug;

use crate::{Order, OrderStatus, StatusUpdate};

impl OrderStatus {
    /// Whether an order in this status may move to `next`. Delivered and
    /// cancelled orders are final; a shipped order cannot go back to pending.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match self {
            OrderStatus::Cancelled | OrderStatus::Delivered => false,
            OrderStatus::Shipped => next != OrderStatus::Pending,
            OrderStatus::Pending => true,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Delivered)
    }
}

/// One entry of the status picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusOption {
    pub status: OrderStatus,
    pub disabled: bool,
}

/// What confirming the picker should do
#[derive(Debug, Clone, PartialEq)]
pub enum StatusDecision {
    /// Emit the update, then close
    Update(StatusUpdate),
    /// Nothing to emit; just close
    Close,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusUpdateState {
    is_open: bool,
    order_id: Option<i64>,
    current: Option<OrderStatus>,
    selected: Option<OrderStatus>,
}

impl StatusUpdateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the picker for `order`. The selection starts at its current status.
    pub fn open(&mut self, order: Option<&Order>) {
        self.reset(order);
        self.is_open = true;
    }

    pub fn reset(&mut self, order: Option<&Order>) {
        self.order_id = order.map(|o| o.order_id);
        self.current = order.map(|o| o.status);
        self.selected = self.current;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn current_status(&self) -> Option<OrderStatus> {
        self.current
    }

    pub fn selected_status(&self) -> Option<OrderStatus> {
        self.selected
    }

    pub fn select(&mut self, status: OrderStatus) {
        if self.current.is_some() {
            self.selected = Some(status);
        }
    }

    /// Picker entries in display order, with illegal targets disabled
    pub fn options(&self) -> Vec<StatusOption> {
        OrderStatus::ALL
            .into_iter()
            .map(|status| StatusOption {
                status,
                disabled: !self.is_option_enabled(status),
            })
            .collect()
    }

    fn is_option_enabled(&self, candidate: OrderStatus) -> bool {
        match self.current {
            Some(current) if current.is_final() => false,
            Some(current) => candidate == current || current.can_transition_to(candidate),
            None => false,
        }
    }

    /// An order is loaded, the selection differs from its status, and the move is legal
    pub fn can_update(&self) -> bool {
        match (self.current, self.selected) {
            (Some(current), Some(selected)) => {
                selected != current && current.can_transition_to(selected)
            }
            _ => false,
        }
    }

    /// Confirm the picker. Always closes; only emits for a legal change.
    pub fn confirm(&mut self) -> StatusDecision {
        let decision = match (self.order_id, self.selected) {
            (Some(order_id), Some(status)) if self.can_update() => {
                StatusDecision::Update(StatusUpdate { order_id, status })
            }
            _ => {
                debug!("Status update not allowed; closing without changes");
                StatusDecision::Close
            }
        };
        self.close();
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: OrderStatus) -> Order {
        Order {
            order_id: 77,
            status,
            order_date: "2024-03-01".to_string(),
            customer_id: 2,
            shipping_address: "1 Main St".to_string(),
            total_amount: 120.0,
            quotation_id: None,
            created_at: "2024-03-01T09:00:00Z".to_string(),
            updated_at: "2024-03-04T15:30:00Z".to_string(),
        }
    }

    fn open_for(status: OrderStatus) -> StatusUpdateState {
        let mut state = StatusUpdateState::new();
        state.open(Some(&order(status)));
        state
    }

    #[test]
    fn test_transition_rules() {
        use OrderStatus::*;

        for next in OrderStatus::ALL {
            assert!(Pending.can_transition_to(next));
            assert!(!Delivered.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
        assert!(!Shipped.can_transition_to(Pending));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(Shipped.can_transition_to(Cancelled));
    }

    #[test]
    fn test_shipped_back_to_pending_is_blocked() {
        let mut state = open_for(OrderStatus::Shipped);
        state.select(OrderStatus::Pending);

        assert!(!state.can_update());
        assert_eq!(state.confirm(), StatusDecision::Close);
        assert!(!state.is_open());
    }

    #[test]
    fn test_pending_to_shipped_emits_update() {
        let mut state = open_for(OrderStatus::Pending);
        state.select(OrderStatus::Shipped);

        assert!(state.can_update());
        assert_eq!(
            state.confirm(),
            StatusDecision::Update(StatusUpdate {
                order_id: 77,
                status: OrderStatus::Shipped,
            })
        );
        assert!(!state.is_open());
    }

    #[test]
    fn test_cancelled_order_allows_nothing() {
        let mut state = open_for(OrderStatus::Cancelled);
        assert!(state.options().iter().all(|option| option.disabled));

        for candidate in OrderStatus::ALL {
            state.select(candidate);
            assert!(!state.can_update());
        }
        assert_eq!(state.confirm(), StatusDecision::Close);
    }

    #[test]
    fn test_delivered_order_allows_nothing() {
        let state = open_for(OrderStatus::Delivered);
        assert!(state.options().iter().all(|option| option.disabled));
    }

    #[test]
    fn test_shipped_options() {
        let state = open_for(OrderStatus::Shipped);
        let disabled: Vec<OrderStatus> = state
            .options()
            .into_iter()
            .filter(|option| option.disabled)
            .map(|option| option.status)
            .collect();
        assert_eq!(disabled, vec![OrderStatus::Pending]);
    }

    #[test]
    fn test_same_status_is_a_no_op() {
        let mut state = open_for(OrderStatus::Pending);
        assert_eq!(state.selected_status(), Some(OrderStatus::Pending));
        assert!(!state.can_update());
        assert_eq!(state.confirm(), StatusDecision::Close);
    }

    #[test]
    fn test_no_order_disables_update() {
        let mut state = StatusUpdateState::new();
        state.open(None);
        state.select(OrderStatus::Shipped);

        assert_eq!(state.selected_status(), None);
        assert!(!state.can_update());
        assert_eq!(state.confirm(), StatusDecision::Close);
    }

    #[test]
    fn test_reopening_resets_selection() {
        let mut state = open_for(OrderStatus::Pending);
        state.select(OrderStatus::Cancelled);
        state.close();

        state.open(Some(&order(OrderStatus::Shipped)));
        assert_eq!(state.selected_status(), Some(OrderStatus::Shipped));
        assert_eq!(state.current_status(), Some(OrderStatus::Shipped));
    }
}
