//! Source-system (wholesale ERP) API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::clients::send_with_retry;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::source::{CreditNote, Customer, Invoice, Order, Page, PickTicket};

/// Fetch contract the orchestrators consume.
#[async_trait]
pub trait SourceApi: Send + Sync {
    async fn get_invoice(&self, id: i32) -> Result<Invoice, ApiError>;
    async fn get_credit_note(&self, id: i32) -> Result<CreditNote, ApiError>;
    async fn get_pick_ticket(&self, id: i32) -> Result<PickTicket, ApiError>;
    async fn get_customer(&self, id: i32) -> Result<Customer, ApiError>;
    async fn get_orders_by_number(&self, order_number: i64) -> Result<Vec<Order>, ApiError>;
    async fn list_customers(&self, page: u32) -> Result<Page<Customer>, ApiError>;
}

#[derive(Clone)]
pub struct UphanceClient {
    client: Client,
    base_url: String,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    next_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CustomersPage {
    customers: Vec<Customer>,
    meta: PageMeta,
}

#[derive(Debug, Deserialize)]
struct OrdersPage {
    sales_orders: Vec<Order>,
}

impl UphanceClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.source_base_url.trim_end_matches('/').to_string(),
            api_token: config.source_api_token.clone(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = send_with_retry(
            self.client
                .get(&url)
                .header("accept", "application/json")
                .bearer_auth(&self.api_token)
                .query(query),
        )
        .await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl SourceApi for UphanceClient {
    async fn get_invoice(&self, id: i32) -> Result<Invoice, ApiError> {
        #[derive(Deserialize)]
        struct Wrapper {
            invoice: Invoice,
        }
        let wrapper: Wrapper = self.get_json(&format!("invoices/{}", id), &[]).await?;
        Ok(wrapper.invoice)
    }

    async fn get_credit_note(&self, id: i32) -> Result<CreditNote, ApiError> {
        #[derive(Deserialize)]
        struct Wrapper {
            credit_note: CreditNote,
        }
        let wrapper: Wrapper = self.get_json(&format!("credit_notes/{}", id), &[]).await?;
        Ok(wrapper.credit_note)
    }

    async fn get_pick_ticket(&self, id: i32) -> Result<PickTicket, ApiError> {
        #[derive(Deserialize)]
        struct Wrapper {
            pick_ticket: PickTicket,
        }
        let wrapper: Wrapper = self.get_json(&format!("pick_tickets/{}", id), &[]).await?;
        Ok(wrapper.pick_ticket)
    }

    async fn get_customer(&self, id: i32) -> Result<Customer, ApiError> {
        #[derive(Deserialize)]
        struct Wrapper {
            customer: Customer,
        }
        let wrapper: Wrapper = self.get_json(&format!("customers/{}", id), &[]).await?;
        Ok(wrapper.customer)
    }

    async fn get_orders_by_number(&self, order_number: i64) -> Result<Vec<Order>, ApiError> {
        let page: OrdersPage = self
            .get_json("sales_orders", &[("order_number", order_number.to_string())])
            .await?;
        Ok(page.sales_orders)
    }

    async fn list_customers(&self, page: u32) -> Result<Page<Customer>, ApiError> {
        let response: CustomersPage = self
            .get_json("customers", &[("page", page.to_string())])
            .await?;
        Ok(Page {
            objects: response.customers,
            next_page: response.meta.next_page,
        })
    }
}
