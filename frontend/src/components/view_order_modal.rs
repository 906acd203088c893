use shared::formatting::{format_date, format_datetime, format_money};
use shared::{DisplayConfig, Order, OrderDetails, OrderItem};
use web_sys::MouseEvent;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ViewOrderModalProps {
    pub show: bool,
    #[prop_or_default]
    pub order: Option<Order>,
    /// Line items; `None` while they are not loaded
    #[prop_or_default]
    pub items: Option<Vec<OrderItem>>,
    pub on_close: Callback<()>,
}

/// Read-only order detail view
#[function_component(ViewOrderModal)]
pub fn view_order_modal(props: &ViewOrderModalProps) -> Html {
    let config = use_memo((), |_| DisplayConfig::default());

    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_close.emit(());
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_close_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let order = match (props.show, &props.order) {
        (true, Some(order)) => order,
        _ => return html! {},
    };

    let details = OrderDetails::new(order, props.items.as_deref());
    let money = |amount: f64| format_money(amount, &config);
    let badge = details.order.status.badge();

    html! {
        <div class="order-modal-backdrop" onclick={on_backdrop_click}>
            <div class="order-modal" onclick={on_modal_click}>
                <div class="order-modal-content">
                    <div class="order-modal-header">
                        <h3 class="order-modal-title">{format!("Order #{}", details.order.order_id)}</h3>
                        <span class={badge.css_class}>{badge.label}</span>
                    </div>

                    <dl class="order-modal-facts">
                        <dt>{"Order Date"}</dt>
                        <dd>{format_date(&details.order.order_date, &config)}</dd>
                        <dt>{"Customer"}</dt>
                        <dd>{details.order.customer_id}</dd>
                        <dt>{"Shipping Address"}</dt>
                        <dd>{&details.order.shipping_address}</dd>
                        {if let Some(quotation_id) = details.order.quotation_id {
                            html! {
                                <>
                                    <dt>{"Quotation"}</dt>
                                    <dd>{format!("#{}", quotation_id)}</dd>
                                </>
                            }
                        } else { html! {} }}
                    </dl>

                    {if details.items.is_empty() {
                        html! { <p class="order-modal-empty">{"No items on this order"}</p> }
                    } else {
                        html! {
                            <table class="order-modal-items">
                                <thead>
                                    <tr>
                                        <th>{"Product"}</th>
                                        <th>{"Quantity"}</th>
                                        <th>{"Unit Price"}</th>
                                        <th>{"Discount"}</th>
                                        <th>{"Line Total"}</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {for details.items.iter().map(|item| html! {
                                        <tr key={item.order_item_id}>
                                            <td>{&item.product_name}</td>
                                            <td>{item.quantity}</td>
                                            <td>{money(item.unit_price)}</td>
                                            <td>{money(item.discount)}</td>
                                            <td>{money(item.line_total)}</td>
                                        </tr>
                                    })}
                                </tbody>
                            </table>
                        }
                    }}

                    {if let Some(summary) = details.summary {
                        html! {
                            <div class="order-modal-summary">
                                <div>{format!("Items: {}", summary.total_items)}</div>
                                <div>{format!("Subtotal: {}", money(summary.subtotal))}</div>
                                <div>{format!("Discount: {}", money(summary.total_discount))}</div>
                            </div>
                        }
                    } else { html! {} }}

                    <div class="order-modal-total">
                        {format!("Grand Total: {}", money(details.grand_total))}
                    </div>

                    <ol class="order-modal-timeline">
                        {for details.timeline.iter().map(|entry| html! {
                            <li>
                                <span class="timeline-stage">{entry.stage.label()}</span>
                                {" "}
                                <span class="timeline-time">{format_datetime(&entry.timestamp, &config)}</span>
                            </li>
                        })}
                    </ol>

                    <div class="order-modal-buttons">
                        <button type="button" class="btn btn-secondary" onclick={on_close_click}>
                            {"Close"}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
