//! Carrier-system (parcel shipping) API client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::clients::send_with_retry;
use crate::config::AppConfig;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
pub struct ParcelRequest {
    pub parcel: ParcelPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParcelPayload {
    /// Only set on updates, so the carrier treats it as update-in-place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    pub address: String,
    pub address_2: String,
    pub order_number: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_state: Option<String>,
    pub parcel_items: Vec<ParcelItem>,
    pub weight: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    pub total_order_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_order_value_currency: Option<String>,
    pub customs_shipping_type: i32,
    pub is_return: bool,
    pub shipment: ShipmentRef,
    pub request_label: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipmentRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParcelItem {
    pub description: String,
    pub quantity: i64,
    pub sku: String,
    pub weight: String,
    pub value: String,
    pub product_id: String,
    pub properties: ParcelItemProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParcelItemProperties {
    pub color: String,
    pub size: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedParcel {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteShippingMethod {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub carrier: String,
    pub min_weight: f64,
    pub max_weight: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub countries: Vec<RemoteCarrierCountry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCarrierCountry {
    pub id: i64,
    pub name: String,
    pub iso_2: String,
    pub iso_3: String,
    #[serde(default)]
    pub price: f64,
}

/// Remote call contract the orchestrators and cache refreshes consume.
#[async_trait]
pub trait CarrierApi: Send + Sync {
    async fn create_parcel(&self, payload: &ParcelRequest) -> Result<CreatedParcel, ApiError>;
    async fn update_parcel(&self, payload: &ParcelRequest) -> Result<(), ApiError>;
    async fn cancel_parcel(&self, id: &str) -> Result<(), ApiError>;
    async fn list_shipping_methods(&self) -> Result<Vec<RemoteShippingMethod>, ApiError>;
}

#[derive(Clone)]
pub struct SendcloudClient {
    client: Client,
    base_url: String,
    public_key: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct ParcelResponse {
    parcel: CreatedParcel,
}

#[derive(Debug, Deserialize)]
struct ShippingMethodsResponse {
    shipping_methods: Vec<RemoteShippingMethod>,
}

impl SendcloudClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.carrier_base_url.trim_end_matches('/').to_string(),
            public_key: config.carrier_public_key.clone(),
            secret_key: config.carrier_secret_key.clone(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client
            .request(method, &url)
            .basic_auth(&self.public_key, Some(&self.secret_key))
    }
}

#[async_trait]
impl CarrierApi for SendcloudClient {
    async fn create_parcel(&self, payload: &ParcelRequest) -> Result<CreatedParcel, ApiError> {
        let response =
            send_with_retry(self.request(reqwest::Method::POST, "parcels").json(payload)).await?;
        let parsed: ParcelResponse = response.json().await?;
        Ok(parsed.parcel)
    }

    async fn update_parcel(&self, payload: &ParcelRequest) -> Result<(), ApiError> {
        send_with_retry(self.request(reqwest::Method::PUT, "parcels").json(payload)).await?;
        Ok(())
    }

    async fn cancel_parcel(&self, id: &str) -> Result<(), ApiError> {
        send_with_retry(self.request(reqwest::Method::POST, &format!("parcels/{}/cancel", id)))
            .await?;
        Ok(())
    }

    async fn list_shipping_methods(&self) -> Result<Vec<RemoteShippingMethod>, ApiError> {
        let response = send_with_retry(self.request(reqwest::Method::GET, "shipping_methods")).await?;
        let parsed: ShippingMethodsResponse = response.json().await?;
        Ok(parsed.shipping_methods)
    }
}
