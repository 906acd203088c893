use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use gloo::net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{
    Contact, ContactEmailLookup, Customer, EmailExistsResponse, Inventory, InventoryChanges,
    LookupError, Order, OrderItem, Product, StatusUpdate,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// API client for the admin backend
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = Request::get(&self.url(path))
            .send()
            .await
            .with_context(|| format!("Network error fetching {}", path))?;
        read_json(response, path).await
    }

    async fn send<T: DeserializeOwned>(&self, request: Request, path: &str) -> Result<T> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Network error sending {}", path))?;
        read_json(response, path).await
    }

    /// POST to `collection` for new records, PUT to `collection/{id}` otherwise
    async fn upsert<B, T>(&self, collection: &str, id: Option<i64>, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let (path, builder) = match id {
            Some(id) => {
                let path = format!("{}/{}", collection, id);
                let builder = Request::put(&self.url(&path));
                (path, builder)
            }
            None => (collection.to_string(), Request::post(&self.url(collection))),
        };
        let request = builder
            .json(body)
            .with_context(|| format!("Failed to serialize request for {}", path))?;
        self.send(request, &path).await
    }

    pub async fn get_customers(&self) -> Result<Vec<Customer>> {
        self.get("/api/customers").await
    }

    pub async fn get_contacts(&self) -> Result<Vec<Contact>> {
        self.get("/api/contacts").await
    }

    pub async fn get_products(&self) -> Result<Vec<Product>> {
        self.get("/api/products").await
    }

    pub async fn get_inventory(&self) -> Result<Vec<Inventory>> {
        self.get("/api/inventory").await
    }

    pub async fn get_orders(&self) -> Result<Vec<Order>> {
        self.get("/api/orders").await
    }

    pub async fn get_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>> {
        self.get(&format!("/api/orders/{}/items", order_id)).await
    }

    /// Create the customer when its id is 0, otherwise update it
    pub async fn save_customer(&self, customer: &Customer) -> Result<Customer> {
        let id = Some(customer.customer_id).filter(|id| *id != 0);
        self.upsert("/api/customers", id, customer).await
    }

    /// Create the contact when its id is 0, otherwise update it
    pub async fn save_contact(&self, contact: &Contact) -> Result<Contact> {
        let id = Some(contact.contact_id).filter(|id| *id != 0);
        self.upsert("/api/contacts", id, contact).await
    }

    pub async fn save_inventory(&self, changes: &InventoryChanges) -> Result<Inventory> {
        self.upsert("/api/inventory", changes.inventory_id, changes).await
    }

    pub async fn update_order_status(&self, update: &StatusUpdate) -> Result<Order> {
        let path = format!("/api/orders/{}/status", update.order_id);
        let request = Request::patch(&self.url(&path))
            .json(update)
            .context("Failed to serialize status update")?;
        self.send(request, &path).await
    }

    pub async fn contact_email_exists(&self, email: &str) -> Result<bool> {
        let path = "/api/contacts/email-exists";
        let response = Request::get(&self.url(path))
            .query([("email", email)])
            .send()
            .await
            .context("Network error checking contact email")?;
        let body: EmailExistsResponse = read_json(response, path).await?;
        Ok(body.exists)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl ContactEmailLookup for ApiClient {
    async fn email_exists(&self, email: &str) -> Result<bool, LookupError> {
        self.contact_email_exists(email)
            .await
            .map_err(|e| LookupError::Request(format!("{:#}", e)))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
    if !response.ok() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        bail!("Server error {} from {}: {}", status, path, error_text);
    }
    response
        .json::<T>()
        .await
        .with_context(|| format!("Failed to parse response from {}", path))
}
