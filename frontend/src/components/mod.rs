pub mod edit_modal;
pub mod inventory_modal;
pub mod update_status_modal;
pub mod view_order_modal;
