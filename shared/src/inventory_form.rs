//! Inventory line editor.
//!
//! Unlike the edit form there is no touched gating: every current error is
//! shown in the summary as soon as it exists.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::error::FormError;
use crate::formatting::StockLevel;
use crate::validation::{
    non_negative_message, required_message, SubmitOutcome, ValidationErrors, SELECT_PRODUCT_MESSAGE,
    SUBMIT_FAILED_MESSAGE, SUBMIT_FIELD,
};
use crate::{Inventory, InventoryChanges, InventoryDraft, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InventoryField {
    ProductId,
    CurrentStock,
    ReorderLevel,
}

impl InventoryField {
    pub const ALL: [InventoryField; 3] = [
        InventoryField::ProductId,
        InventoryField::CurrentStock,
        InventoryField::ReorderLevel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InventoryField::ProductId => "product_id",
            InventoryField::CurrentStock => "current_stock",
            InventoryField::ReorderLevel => "reorder_level",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryFormState {
    is_open: bool,
    draft: InventoryDraft,
    /// Raw text of fields whose last input was not a whole number
    unparsable: BTreeMap<InventoryField, String>,
    errors: ValidationErrors,
    is_saving: bool,
}

impl InventoryFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, record: Option<&Inventory>) {
        self.reset(record);
        self.is_open = true;
    }

    /// Copy `record` into a fresh draft and forget all validation state
    pub fn reset(&mut self, record: Option<&Inventory>) {
        self.draft = record.map(InventoryDraft::from).unwrap_or_default();
        self.unparsable.clear();
        self.errors.clear();
        self.is_saving = false;
    }

    pub fn close(&mut self) {
        self.reset(None);
        self.is_open = false;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn draft(&self) -> &InventoryDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    /// True when editing a row that already exists
    pub fn is_editing(&self) -> bool {
        matches!(self.draft.inventory_id, Some(id) if id != 0)
    }

    /// Store raw input for `field`. Blank input clears the value.
    pub fn set_input(&mut self, field: InventoryField, raw: &str) {
        let raw = raw.trim();
        let value = if raw.is_empty() {
            self.unparsable.remove(&field);
            None
        } else {
            match raw.parse::<i64>() {
                Ok(value) => {
                    self.unparsable.remove(&field);
                    Some(value)
                }
                Err(_) => {
                    self.unparsable.insert(field, raw.to_string());
                    None
                }
            }
        };
        *self.slot(field) = value;
    }

    /// Text to show in the input for `field`
    pub fn input_value(&self, field: InventoryField) -> String {
        if let Some(raw) = self.unparsable.get(&field) {
            return raw.clone();
        }
        let value = match field {
            InventoryField::ProductId => self.draft.product_id,
            InventoryField::CurrentStock => self.draft.current_stock,
            InventoryField::ReorderLevel => self.draft.reorder_level,
        };
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn select_product(&mut self, product_id: Option<i64>) {
        self.unparsable.remove(&InventoryField::ProductId);
        self.draft.product_id = product_id;
    }

    /// Products the picker may offer. A new row cannot reuse a product that
    /// already has an inventory line.
    pub fn available_products<'a>(
        &self,
        products: &'a [Product],
        existing: &[Inventory],
    ) -> Vec<&'a Product> {
        if self.is_editing() {
            return products.iter().collect();
        }
        let stocked: BTreeSet<i64> = existing.iter().map(|row| row.product_id).collect();
        products
            .iter()
            .filter(|product| !stocked.contains(&product.product_id))
            .collect()
    }

    pub fn is_low_stock(&self) -> bool {
        match (self.draft.current_stock, self.draft.reorder_level) {
            (Some(current), Some(reorder)) => current <= reorder,
            _ => false,
        }
    }

    pub fn stock_level(&self) -> Option<StockLevel> {
        match (self.draft.current_stock, self.draft.reorder_level) {
            (Some(current), Some(reorder)) => Some(StockLevel::classify(current, reorder)),
            _ => None,
        }
    }

    pub fn validate_field(&mut self, field: InventoryField) -> bool {
        let name = field.name();
        let message = match field {
            InventoryField::ProductId => match self.draft.product_id {
                _ if self.unparsable.contains_key(&field) => Some(SELECT_PRODUCT_MESSAGE.to_string()),
                None => Some(required_message(name)),
                Some(id) if id <= 0 => Some(SELECT_PRODUCT_MESSAGE.to_string()),
                Some(_) => None,
            },
            InventoryField::CurrentStock | InventoryField::ReorderLevel => {
                let value = match field {
                    InventoryField::CurrentStock => self.draft.current_stock,
                    _ => self.draft.reorder_level,
                };
                match value {
                    _ if self.unparsable.contains_key(&field) => Some(non_negative_message(name)),
                    None => Some(required_message(name)),
                    Some(amount) if amount < 0 => Some(non_negative_message(name)),
                    Some(_) => None,
                }
            }
        };

        match message {
            Some(message) => {
                self.errors.set(name, message);
                false
            }
            None => {
                self.errors.remove(name);
                true
            }
        }
    }

    /// Messages for the error summary, in form order
    pub fn error_summary(&self) -> Vec<&str> {
        InventoryField::ALL
            .iter()
            .map(InventoryField::name)
            .chain(std::iter::once(SUBMIT_FIELD))
            .filter_map(|field| self.errors.get(field))
            .collect()
    }

    pub fn submit(&mut self) -> SubmitOutcome<InventoryChanges> {
        if self.is_saving {
            debug!("Inventory save already in progress");
            return SubmitOutcome::Ignored;
        }
        if !self.is_open {
            return self.fail(FormError::Closed);
        }

        self.is_saving = true;
        self.errors.remove(SUBMIT_FIELD);

        let mut valid = true;
        for field in InventoryField::ALL {
            valid &= self.validate_field(field);
        }
        if !valid {
            self.is_saving = false;
            debug!("Inventory save blocked by {} field error(s)", self.errors.len());
            return SubmitOutcome::Invalid;
        }

        match self.to_changes() {
            Ok(changes) => {
                self.is_saving = false;
                SubmitOutcome::Saved(changes)
            }
            Err(e) => self.fail(e),
        }
    }

    fn to_changes(&self) -> Result<InventoryChanges, FormError> {
        Ok(InventoryChanges {
            inventory_id: self.draft.inventory_id.filter(|id| *id != 0),
            product_id: self
                .draft
                .product_id
                .ok_or(FormError::IncompleteDraft("product_id"))?,
            current_stock: self
                .draft
                .current_stock
                .ok_or(FormError::IncompleteDraft("current_stock"))?,
            reorder_level: self
                .draft
                .reorder_level
                .ok_or(FormError::IncompleteDraft("reorder_level"))?,
        })
    }

    fn fail(&mut self, error: FormError) -> SubmitOutcome<InventoryChanges> {
        warn!("Inventory save failed: {}", error);
        self.is_saving = false;
        self.errors.set(SUBMIT_FIELD, SUBMIT_FAILED_MESSAGE);
        SubmitOutcome::Failed
    }

    fn slot(&mut self, field: InventoryField) -> &mut Option<i64> {
        match field {
            InventoryField::ProductId => &mut self.draft.product_id,
            InventoryField::CurrentStock => &mut self.draft.current_stock,
            InventoryField::ReorderLevel => &mut self.draft.reorder_level,
        }
    }
}
