use shared::{
    Inventory, InventoryChanges, InventoryField, InventoryFormState, Product, SubmitOutcome,
};
use web_sys::{HtmlInputElement, HtmlSelectElement, MouseEvent};
use yew::prelude::*;

use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct InventoryModalProps {
    pub show: bool,
    /// Row to edit; `None` adds a new row
    #[prop_or_default]
    pub inventory: Option<Inventory>,
    pub products: Vec<Product>,
    /// Rows that already exist, used to hide products that are already stocked
    #[prop_or_default]
    pub existing_inventory: Vec<Inventory>,
    pub on_save: Callback<InventoryChanges>,
    pub on_close: Callback<()>,
}

#[function_component(InventoryModal)]
pub fn inventory_modal(props: &InventoryModalProps) -> Html {
    let form = use_mut_ref(InventoryFormState::new);
    let redraw = use_force_update();

    use_effect_with((props.show, props.inventory.clone()), {
        let form = form.clone();
        let redraw = redraw.clone();
        move |(show, inventory)| {
            if *show {
                form.borrow_mut().open(inventory.as_ref());
            } else {
                form.borrow_mut().close();
            }
            redraw.force_update();
            || ()
        }
    });

    let close = {
        let form = form.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: ()| {
            form.borrow_mut().close();
            on_close.emit(());
        })
    };

    let on_backdrop_click = {
        let close = close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            close.emit(());
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_cancel = {
        let close = close.clone();
        Callback::from(move |_: MouseEvent| close.emit(()))
    };

    let on_product_change = {
        let form = form.clone();
        let redraw = redraw.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut state = form.borrow_mut();
            state.set_input(InventoryField::ProductId, &select.value());
            state.validate_field(InventoryField::ProductId);
            drop(state);
            redraw.force_update();
        })
    };

    let number_input = |field: InventoryField| {
        let form = form.clone();
        let redraw = redraw.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.borrow_mut().set_input(field, &input.value());
            redraw.force_update();
        })
    };

    let validate_on_blur = |field: InventoryField| {
        let form = form.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: FocusEvent| {
            form.borrow_mut().validate_field(field);
            redraw.force_update();
        })
    };

    let on_submit = {
        let form = form.clone();
        let redraw = redraw.clone();
        let on_save = props.on_save.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let outcome = form.borrow_mut().submit();
            redraw.force_update();

            if let SubmitOutcome::Saved(changes) = outcome {
                Logger::info_with_component(
                    "inventory-modal",
                    &format!("Saving inventory for product {}", changes.product_id),
                );
                on_save.emit(changes);
            }
        })
    };

    if !props.show {
        return html! {};
    }

    let state = form.borrow();
    let draft = state.draft();
    let available = state.available_products(&props.products, &props.existing_inventory);
    let title = if state.is_editing() { "Edit Inventory" } else { "Add Inventory" };
    let errors = state.error_summary();

    let view = html! {
        <div class="inventory-modal-backdrop" onclick={on_backdrop_click}>
            <div class="inventory-modal" onclick={on_modal_click}>
                <div class="inventory-modal-content">
                    <h3 class="inventory-modal-title">{title}</h3>

                    {if !errors.is_empty() {
                        html! {
                            <div class="inventory-modal-errors">
                                <ul>
                                    {for errors.iter().map(|error| html! { <li>{*error}</li> })}
                                </ul>
                            </div>
                        }
                    } else { html! {} }}

                    <form class="inventory-modal-form" onsubmit={on_submit}>
                        <div class="form-group">
                            <label for="inventory-product">{"Product"}</label>
                            <select
                                id="inventory-product"
                                class="inventory-modal-input"
                                onchange={on_product_change}
                                disabled={state.is_saving()}
                            >
                                <option value="" selected={draft.product_id.is_none()}>
                                    {"Select a product"}
                                </option>
                                {for available.iter().map(|product| html! {
                                    <option
                                        value={product.product_id.to_string()}
                                        selected={draft.product_id == Some(product.product_id)}
                                    >
                                        {format!("{} ({})", product.product_name, product.sku)}
                                    </option>
                                })}
                            </select>
                        </div>

                        <div class="form-group">
                            <label for="inventory-current-stock">{"Current Stock"}</label>
                            <input
                                id="inventory-current-stock"
                                type="number"
                                min="0"
                                class="inventory-modal-input"
                                value={state.input_value(InventoryField::CurrentStock)}
                                oninput={number_input(InventoryField::CurrentStock)}
                                onblur={validate_on_blur(InventoryField::CurrentStock)}
                                disabled={state.is_saving()}
                            />
                        </div>

                        <div class="form-group">
                            <label for="inventory-reorder-level">{"Reorder Level"}</label>
                            <input
                                id="inventory-reorder-level"
                                type="number"
                                min="0"
                                class="inventory-modal-input"
                                value={state.input_value(InventoryField::ReorderLevel)}
                                oninput={number_input(InventoryField::ReorderLevel)}
                                onblur={validate_on_blur(InventoryField::ReorderLevel)}
                                disabled={state.is_saving()}
                            />
                        </div>

                        {if state.is_low_stock() {
                            html! {
                                <div class="inventory-low-stock-warning">
                                    {"⚠️ Stock is at or below the reorder level"}
                                </div>
                            }
                        } else { html! {} }}

                        {if let Some(level) = state.stock_level() {
                            let badge = level.badge();
                            html! { <span class={badge.css_class}>{badge.label}</span> }
                        } else { html! {} }}

                        <div class="inventory-modal-buttons">
                            <button type="submit" class="btn btn-primary" disabled={state.is_saving()}>
                                {if state.is_saving() { "Saving..." } else { "Save" }}
                            </button>
                            <button
                                type="button"
                                class="btn btn-secondary"
                                onclick={on_cancel}
                                disabled={state.is_saving()}
                            >
                                {"Cancel"}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    };
    view
}
