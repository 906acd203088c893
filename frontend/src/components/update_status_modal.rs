use shared::{Order, OrderStatus, StatusDecision, StatusUpdate, StatusUpdateState};
use web_sys::{HtmlSelectElement, MouseEvent};
use yew::prelude::*;

use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct UpdateStatusModalProps {
    pub show: bool,
    #[prop_or_default]
    pub order: Option<Order>,
    pub on_update: Callback<StatusUpdate>,
    pub on_close: Callback<()>,
}

#[function_component(UpdateStatusModal)]
pub fn update_status_modal(props: &UpdateStatusModalProps) -> Html {
    let picker = use_mut_ref(StatusUpdateState::new);
    let redraw = use_force_update();

    use_effect_with((props.show, props.order.clone()), {
        let picker = picker.clone();
        let redraw = redraw.clone();
        move |(show, order)| {
            if *show {
                picker.borrow_mut().open(order.as_ref());
            } else {
                picker.borrow_mut().close();
            }
            redraw.force_update();
            || ()
        }
    });

    let close = {
        let picker = picker.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: ()| {
            picker.borrow_mut().close();
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

    let on_select = {
        let picker = picker.clone();
        let redraw = redraw.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            match OrderStatus::parse(&select.value()) {
                Ok(status) => picker.borrow_mut().select(status),
                Err(e) => Logger::warn_with_component("update-status-modal", &e.to_string()),
            }
            redraw.force_update();
        })
    };

    let on_confirm = {
        let picker = picker.clone();
        let on_update = props.on_update.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            let decision = picker.borrow_mut().confirm();
            if let StatusDecision::Update(update) = decision {
                Logger::info_with_component(
                    "update-status-modal",
                    &format!("Order {} -> {}", update.order_id, update.status),
                );
                on_update.emit(update);
            }
            on_close.emit(());
        })
    };

    if !props.show {
        return html! {};
    }

    let state = picker.borrow();
    let current = state.current_status();
    let selected = state.selected_status();

    let view = html! {
        <div class="status-modal-backdrop" onclick={on_backdrop_click}>
            <div class="status-modal" onclick={on_modal_click}>
                <div class="status-modal-content">
                    <h3 class="status-modal-title">
                        {match &props.order {
                            Some(order) => format!("Update Order #{}", order.order_id),
                            None => "Update Order".to_string(),
                        }}
                    </h3>

                    {if let Some(status) = current {
                        let badge = status.badge();
                        html! {
                            <p class="status-modal-current">
                                {"Current status: "}
                                <span class={badge.css_class}>{badge.label}</span>
                            </p>
                        }
                    } else {
                        html! { <p class="status-modal-empty">{"No order selected"}</p> }
                    }}

                    <div class="form-group">
                        <label for="order-status">{"New Status"}</label>
                        <select
                            id="order-status"
                            class="status-modal-select"
                            onchange={on_select}
                            disabled={current.is_none()}
                        >
                            {for state.options().into_iter().map(|option| html! {
                                <option
                                    value={option.status.as_str()}
                                    selected={selected == Some(option.status)}
                                    disabled={option.disabled}
                                >
                                    {option.status.as_str()}
                                </option>
                            })}
                        </select>
                    </div>

                    {if current.map_or(false, |status| status.is_final()) {
                        html! {
                            <small class="status-modal-hint">
                                {"This order is final and can no longer change status."}
                            </small>
                        }
                    } else { html! {} }}

                    <div class="status-modal-buttons">
                        <button
                            type="button"
                            class="btn btn-primary"
                            onclick={on_confirm}
                            disabled={!state.can_update()}
                        >
                            {"Update Status"}
                        </button>
                        <button type="button" class="btn btn-secondary" onclick={on_cancel}>
                            {"Cancel"}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    };
    view
}
