use shared::formatting::{format_date, format_money};
use shared::{
    Contact, Customer, DisplayConfig, EditDraft, EditMode, Inventory, InventoryChanges, Order,
    OrderItem, Product, StatusUpdate, StockLevel,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::MouseEvent;
use yew::prelude::*;

mod components;
mod services;

use components::edit_modal::EditModal;
use components::inventory_modal::InventoryModal;
use components::update_status_modal::UpdateStatusModal;
use components::view_order_modal::ViewOrderModal;
use services::api::ApiClient;
use services::logging::Logger;

/// Which modal the admin shell is showing, with the record it was opened for
#[derive(Clone, PartialEq)]
enum ActiveModal {
    None,
    EditCustomer(Option<Customer>),
    EditContact(Option<Contact>),
    Inventory(Option<Inventory>),
    UpdateStatus(Order),
    ViewOrder(Order, Option<Vec<OrderItem>>),
}

#[derive(Clone, Default, PartialEq)]
struct AdminData {
    customers: Vec<Customer>,
    contacts: Vec<Contact>,
    products: Vec<Product>,
    inventory: Vec<Inventory>,
    orders: Vec<Order>,
}

/// Load every list the shell shows. A list that fails to load is logged and left empty.
async fn load_admin_data(api: &ApiClient) -> AdminData {
    AdminData {
        customers: or_empty("customers", api.get_customers().await),
        contacts: or_empty("contacts", api.get_contacts().await),
        products: or_empty("products", api.get_products().await),
        inventory: or_empty("inventory", api.get_inventory().await),
        orders: or_empty("orders", api.get_orders().await),
    }
}

fn or_empty<T: Default>(what: &str, result: anyhow::Result<T>) -> T {
    result.unwrap_or_else(|e| {
        Logger::error_with_component("app", &format!("Failed to load {}: {:#}", what, e));
        T::default()
    })
}

#[function_component(App)]
fn app() -> Html {
    let api_client = use_memo((), |_| ApiClient::new());
    let config = use_memo((), |_| DisplayConfig::default());
    let data = use_state(AdminData::default);
    let loading = use_state(|| true);
    let modal = use_state(|| ActiveModal::None);

    let refresh = {
        let api_client = api_client.clone();
        let data = data.clone();
        let loading = loading.clone();
        Callback::from(move |_: ()| {
            let api_client = api_client.clone();
            let data = data.clone();
            let loading = loading.clone();
            spawn_local(async move {
                loading.set(true);
                let loaded = load_admin_data(&api_client).await;
                Logger::debug_with_component(
                    "app",
                    &format!(
                        "Loaded {} customers, {} contacts, {} inventory rows, {} orders",
                        loaded.customers.len(),
                        loaded.contacts.len(),
                        loaded.inventory.len(),
                        loaded.orders.len()
                    ),
                );
                data.set(loaded);
                loading.set(false);
            });
        })
    };

    {
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            refresh.emit(());
            || ()
        });
    }

    let close_modal = {
        let modal = modal.clone();
        Callback::from(move |_: ()| modal.set(ActiveModal::None))
    };

    // Persist, then close and reload. On failure the modal stays open.
    let saved = {
        let modal = modal.clone();
        let refresh = refresh.clone();
        move |what: &'static str, result: anyhow::Result<()>| match result {
            Ok(()) => {
                Logger::info_with_component("app", &format!("Saved {}", what));
                modal.set(ActiveModal::None);
                refresh.emit(());
            }
            Err(e) => {
                Logger::error_with_component("app", &format!("Failed to save {}: {:#}", what, e));
            }
        }
    };

    let on_edit_save = {
        let api_client = api_client.clone();
        let saved = saved.clone();
        Callback::from(move |draft: EditDraft| {
            let api_client = api_client.clone();
            let saved = saved.clone();
            spawn_local(async move {
                match draft {
                    EditDraft::Customer(customer) => {
                        saved("customer", api_client.save_customer(&customer).await.map(|_| ()))
                    }
                    EditDraft::Contact(contact) => {
                        saved("contact", api_client.save_contact(&contact).await.map(|_| ()))
                    }
                }
            });
        })
    };

    let on_inventory_save = {
        let api_client = api_client.clone();
        let saved = saved.clone();
        Callback::from(move |changes: InventoryChanges| {
            let api_client = api_client.clone();
            let saved = saved.clone();
            spawn_local(async move {
                saved("inventory", api_client.save_inventory(&changes).await.map(|_| ()));
            });
        })
    };

    let on_status_update = {
        let api_client = api_client.clone();
        let refresh = refresh.clone();
        Callback::from(move |update: StatusUpdate| {
            let api_client = api_client.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match api_client.update_order_status(&update).await {
                    Ok(order) => {
                        Logger::info_with_component(
                            "app",
                            &format!("Order {} is now {}", order.order_id, order.status),
                        );
                        refresh.emit(());
                    }
                    Err(e) => Logger::error_with_component(
                        "app",
                        &format!("Failed to update order {}: {:#}", update.order_id, e),
                    ),
                }
            });
        })
    };

    let open = |next: ActiveModal| {
        let modal = modal.clone();
        Callback::from(move |_: MouseEvent| modal.set(next.clone()))
    };

    let view_order = |order: Order| {
        let api_client = api_client.clone();
        let modal = modal.clone();
        Callback::from(move |_: MouseEvent| {
            let api_client = api_client.clone();
            let modal = modal.clone();
            let order = order.clone();
            spawn_local(async move {
                let items = match api_client.get_order_items(order.order_id).await {
                    Ok(items) => Some(items),
                    Err(e) => {
                        Logger::warn_with_component(
                            "app",
                            &format!("Failed to load items for order {}: {:#}", order.order_id, e),
                        );
                        None
                    }
                };
                modal.set(ActiveModal::ViewOrder(order, items));
            });
        })
    };

    let (edit_show, edit_mode, edit_record) = match &*modal {
        ActiveModal::EditCustomer(customer) => {
            (true, EditMode::Customer, customer.clone().map(EditDraft::Customer))
        }
        ActiveModal::EditContact(contact) => {
            (true, EditMode::Contact, contact.clone().map(EditDraft::Contact))
        }
        _ => (false, EditMode::Customer, None),
    };
    let (inventory_show, inventory_record) = match &*modal {
        ActiveModal::Inventory(row) => (true, row.clone()),
        _ => (false, None),
    };
    let status_order = match &*modal {
        ActiveModal::UpdateStatus(order) => Some(order.clone()),
        _ => None,
    };
    let (viewed_order, viewed_items) = match &*modal {
        ActiveModal::ViewOrder(order, items) => (Some(order.clone()), items.clone()),
        _ => (None, None),
    };

    let product_name = |product_id: i64| {
        data.products
            .iter()
            .find(|product| product.product_id == product_id)
            .map(|product| product.product_name.clone())
            .unwrap_or_else(|| format!("Product #{}", product_id))
    };

    html! {
        <div class="admin-app">
            <header class="admin-header">
                <h1>{"Business Admin"}</h1>
                {if *loading { html! { <span class="admin-loading">{"Loading..."}</span> } } else { html! {} }}
            </header>

            <section class="admin-section">
                <div class="admin-section-header">
                    <h2>{"Customers"}</h2>
                    <button class="btn btn-primary" onclick={open(ActiveModal::EditCustomer(None))}>
                        {"New Customer"}
                    </button>
                </div>
                <table class="admin-table">
                    <thead>
                        <tr><th>{"Company"}</th><th>{"Industry"}</th><th>{"Email"}</th><th>{"Phone"}</th><th></th></tr>
                    </thead>
                    <tbody>
                        {for data.customers.iter().map(|customer| html! {
                            <tr key={customer.customer_id}>
                                <td>{&customer.company_name}</td>
                                <td>{&customer.industry}</td>
                                <td>{&customer.email}</td>
                                <td>{&customer.phone}</td>
                                <td>
                                    <button class="btn btn-small" onclick={open(ActiveModal::EditCustomer(Some(customer.clone())))}>
                                        {"Edit"}
                                    </button>
                                </td>
                            </tr>
                        })}
                    </tbody>
                </table>
            </section>

            <section class="admin-section">
                <div class="admin-section-header">
                    <h2>{"Contacts"}</h2>
                    <button class="btn btn-primary" onclick={open(ActiveModal::EditContact(None))}>
                        {"New Contact"}
                    </button>
                </div>
                <table class="admin-table">
                    <thead>
                        <tr><th>{"Name"}</th><th>{"Position"}</th><th>{"Email"}</th><th>{"Phone"}</th><th></th></tr>
                    </thead>
                    <tbody>
                        {for data.contacts.iter().map(|contact| html! {
                            <tr key={contact.contact_id}>
                                <td>{format!("{} {}", contact.first_name, contact.last_name)}</td>
                                <td>{&contact.position}</td>
                                <td>{&contact.email}</td>
                                <td>{&contact.phone}</td>
                                <td>
                                    <button class="btn btn-small" onclick={open(ActiveModal::EditContact(Some(contact.clone())))}>
                                        {"Edit"}
                                    </button>
                                </td>
                            </tr>
                        })}
                    </tbody>
                </table>
            </section>

            <section class="admin-section">
                <div class="admin-section-header">
                    <h2>{"Inventory"}</h2>
                    <button class="btn btn-primary" onclick={open(ActiveModal::Inventory(None))}>
                        {"Add Inventory"}
                    </button>
                </div>
                <table class="admin-table">
                    <thead>
                        <tr><th>{"Product"}</th><th>{"Stock"}</th><th>{"Reorder Level"}</th><th>{"Status"}</th><th></th></tr>
                    </thead>
                    <tbody>
                        {for data.inventory.iter().map(|row| {
                            let badge = StockLevel::classify(row.current_stock, row.reorder_level).badge();
                            html! {
                                <tr key={row.inventory_id}>
                                    <td>{product_name(row.product_id)}</td>
                                    <td>{row.current_stock}</td>
                                    <td>{row.reorder_level}</td>
                                    <td><span class={badge.css_class}>{badge.label}</span></td>
                                    <td>
                                        <button class="btn btn-small" onclick={open(ActiveModal::Inventory(Some(row.clone())))}>
                                            {"Edit"}
                                        </button>
                                    </td>
                                </tr>
                            }
                        })}
                    </tbody>
                </table>
            </section>

            <section class="admin-section">
                <h2>{"Orders"}</h2>
                <table class="admin-table">
                    <thead>
                        <tr><th>{"Order"}</th><th>{"Date"}</th><th>{"Status"}</th><th>{"Total"}</th><th></th></tr>
                    </thead>
                    <tbody>
                        {for data.orders.iter().map(|order| {
                            let badge = order.status.badge();
                            html! {
                                <tr key={order.order_id}>
                                    <td>{format!("#{}", order.order_id)}</td>
                                    <td>{format_date(&order.order_date, &config)}</td>
                                    <td><span class={badge.css_class}>{badge.label}</span></td>
                                    <td>{format_money(order.total_amount, &config)}</td>
                                    <td>
                                        <button class="btn btn-small" onclick={view_order(order.clone())}>
                                            {"View"}
                                        </button>
                                        <button class="btn btn-small" onclick={open(ActiveModal::UpdateStatus(order.clone()))}>
                                            {"Status"}
                                        </button>
                                    </td>
                                </tr>
                            }
                        })}
                    </tbody>
                </table>
            </section>

            <EditModal
                show={edit_show}
                mode={edit_mode}
                record={edit_record}
                on_save={on_edit_save}
                on_close={close_modal.clone()}
            />
            <InventoryModal
                show={inventory_show}
                inventory={inventory_record}
                products={data.products.clone()}
                existing_inventory={data.inventory.clone()}
                on_save={on_inventory_save}
                on_close={close_modal.clone()}
            />
            <UpdateStatusModal
                show={status_order.is_some()}
                order={status_order}
                on_update={on_status_update}
                on_close={close_modal.clone()}
            />
            <ViewOrderModal
                show={viewed_order.is_some()}
                order={viewed_order}
                items={viewed_items}
                on_close={close_modal}
            />
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
