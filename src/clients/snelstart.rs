//! Ledger-system (bookkeeping) API client
//!
//! Wire shapes keep the ledger's Dutch field names; the Rust side uses
//! descriptive names with serde renames.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::clients::send_with_retry;
use crate::config::AppConfig;
use crate::error::ApiError;

/// Sales booking payload ("verkoopboeking").
#[derive(Debug, Clone, Serialize)]
pub struct BookingPayload {
    #[serde(rename = "factuurnummer")]
    pub invoice_number: String,
    #[serde(rename = "klant")]
    pub customer: RelationRef,
    #[serde(rename = "boekingsregels")]
    pub booking_lines: Vec<BookingLine>,
    #[serde(rename = "factuurbedrag")]
    pub invoice_amount: String,
    #[serde(rename = "betalingstermijn")]
    pub payment_term_days: i32,
    #[serde(rename = "factuurdatum")]
    pub invoice_date: String,
    #[serde(rename = "btw")]
    pub tax_lines: Vec<TaxLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingLine {
    #[serde(rename = "omschrijving")]
    pub description: String,
    #[serde(rename = "grootboek")]
    pub ledger_account: LedgerAccountRef,
    #[serde(rename = "bedrag")]
    pub amount: String,
    #[serde(rename = "btwSoort")]
    pub tax_category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerAccountRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxLine {
    #[serde(rename = "btwSoort")]
    pub tax_category: String,
    #[serde(rename = "btwBedrag")]
    pub tax_amount: String,
}

/// Business relation payload ("relatie").
#[derive(Debug, Clone, Serialize)]
pub struct RelationPayload {
    #[serde(rename = "relatieSoort")]
    pub relation_kinds: Vec<String>,
    #[serde(rename = "naam")]
    pub name: String,
    #[serde(rename = "adres", skip_serializing_if = "Option::is_none")]
    pub address: Option<RelationAddress>,
    #[serde(rename = "btwNummer", skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationAddress {
    #[serde(rename = "contactpersoon")]
    pub contact_person: String,
    #[serde(rename = "straat")]
    pub street: Option<String>,
    #[serde(rename = "postcode")]
    pub postcode: Option<String>,
    #[serde(rename = "plaats")]
    pub city: Option<String>,
    #[serde(rename = "land")]
    pub country: CountryRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountryRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedBooking {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRelation {
    pub id: String,
    #[serde(rename = "naam")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTaxRate {
    pub id: String,
    #[serde(rename = "btwSoort")]
    pub name: String,
    #[serde(rename = "btwPercentage")]
    pub percentage: f64,
    #[serde(rename = "datumVanaf")]
    pub valid_from: NaiveDateTime,
    #[serde(rename = "datumTotEnMet", default)]
    pub valid_until: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteLedgerAccount {
    pub id: String,
    #[serde(rename = "omschrijving")]
    pub description: String,
    #[serde(rename = "nummer")]
    pub number: i32,
    #[serde(rename = "grootboekfunctie", default)]
    pub account_kind: Option<String>,
    #[serde(rename = "btwSoort", default)]
    pub vat_code: Option<String>,
    #[serde(rename = "nonactief", default)]
    pub inactive: bool,
    #[serde(rename = "modifiedOn", default)]
    pub modified_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCountry {
    pub id: String,
    #[serde(rename = "naam")]
    pub name: String,
    #[serde(rename = "landcode")]
    pub country_code: String,
    #[serde(rename = "landcodeIso", default)]
    pub iso_code: Option<String>,
}

/// Remote call contract the orchestrators and cache refreshes consume.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    async fn create_booking(&self, payload: &BookingPayload) -> Result<CreatedBooking, ApiError>;
    async fn update_booking(&self, id: &str, payload: &BookingPayload) -> Result<(), ApiError>;
    async fn delete_booking(&self, id: &str) -> Result<(), ApiError>;
    /// Exact-name search; the filter value is escaped by the client.
    async fn search_relations(&self, name: &str) -> Result<Vec<RemoteRelation>, ApiError>;
    async fn create_relation(&self, payload: &RelationPayload) -> Result<RemoteRelation, ApiError>;
    async fn update_relation(
        &self,
        id: &str,
        payload: &RelationPayload,
    ) -> Result<RemoteRelation, ApiError>;
    async fn list_tax_rates(&self) -> Result<Vec<RemoteTaxRate>, ApiError>;
    async fn list_accounts(&self) -> Result<Vec<RemoteLedgerAccount>, ApiError>;
    async fn list_countries(&self) -> Result<Vec<RemoteCountry>, ApiError>;
}

#[derive(Clone)]
pub struct SnelstartClient {
    client: Client,
    base_url: String,
    subscription_key: String,
    access_token: String,
}

impl SnelstartClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.ledger_base_url.trim_end_matches('/').to_string(),
            subscription_key: config.ledger_subscription_key.clone(),
            access_token: config.ledger_access_token.clone(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client
            .request(method, &url)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .bearer_auth(&self.access_token)
    }

    async fn get_list<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let response = send_with_retry(self.request(reqwest::Method::GET, path)).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl LedgerApi for SnelstartClient {
    async fn create_booking(&self, payload: &BookingPayload) -> Result<CreatedBooking, ApiError> {
        let response = send_with_retry(
            self.request(reqwest::Method::POST, "verkoopboekingen")
                .json(payload),
        )
        .await?;
        Ok(response.json().await?)
    }

    async fn update_booking(&self, id: &str, payload: &BookingPayload) -> Result<(), ApiError> {
        send_with_retry(
            self.request(reqwest::Method::PUT, &format!("verkoopboekingen/{}", id))
                .json(payload),
        )
        .await?;
        Ok(())
    }

    async fn delete_booking(&self, id: &str) -> Result<(), ApiError> {
        send_with_retry(self.request(reqwest::Method::DELETE, &format!("verkoopboekingen/{}", id)))
            .await?;
        Ok(())
    }

    async fn search_relations(&self, name: &str) -> Result<Vec<RemoteRelation>, ApiError> {
        // OData filter; single quotes in the name are doubled to escape them.
        let escaped = name.replace('\'', "''");
        let response = send_with_retry(
            self.request(reqwest::Method::GET, "relaties")
                .query(&[("$filter", format!("Naam eq '{}'", escaped))]),
        )
        .await?;
        Ok(response.json().await?)
    }

    async fn create_relation(&self, payload: &RelationPayload) -> Result<RemoteRelation, ApiError> {
        let response = send_with_retry(
            self.request(reqwest::Method::POST, "relaties").json(payload),
        )
        .await?;
        Ok(response.json().await?)
    }

    async fn update_relation(
        &self,
        id: &str,
        payload: &RelationPayload,
    ) -> Result<RemoteRelation, ApiError> {
        let response = send_with_retry(
            self.request(reqwest::Method::PUT, &format!("relaties/{}", id))
                .json(payload),
        )
        .await?;
        Ok(response.json().await?)
    }

    async fn list_tax_rates(&self) -> Result<Vec<RemoteTaxRate>, ApiError> {
        self.get_list("btwtarieven").await
    }

    async fn list_accounts(&self) -> Result<Vec<RemoteLedgerAccount>, ApiError> {
        self.get_list("grootboeken").await
    }

    async fn list_countries(&self) -> Result<Vec<RemoteCountry>, ApiError> {
        self.get_list("landen").await
    }
}
