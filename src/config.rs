//! Process configuration
//!
//! Read once from the environment at startup and passed explicitly into the
//! clients and orchestrators. Credentials are expected to be already-issued
//! tokens; refresh flows live outside this service.

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    pub source_base_url: String,
    pub source_api_token: String,
    pub ledger_base_url: String,
    pub ledger_subscription_key: String,
    pub ledger_access_token: String,
    pub carrier_base_url: String,
    pub carrier_public_key: String,
    pub carrier_secret_key: String,
    /// Shipping method used when no country override applies
    pub default_shipping_method: Option<String>,
    /// Shared secret checked against the `secret` query parameter on webhooks
    pub webhook_secret: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            source_base_url: env::var("SOURCE_BASE_URL")
                .unwrap_or_else(|_| "https://api.uphance.com/".to_string()),
            source_api_token: env::var("SOURCE_API_TOKEN")?,
            ledger_base_url: env::var("LEDGER_BASE_URL")
                .unwrap_or_else(|_| "https://b2bapi.snelstart.nl/v2/".to_string()),
            ledger_subscription_key: env::var("LEDGER_SUBSCRIPTION_KEY")?,
            ledger_access_token: env::var("LEDGER_ACCESS_TOKEN")?,
            carrier_base_url: env::var("CARRIER_BASE_URL")
                .unwrap_or_else(|_| "https://panel.sendcloud.sc/api/v2/".to_string()),
            carrier_public_key: env::var("CARRIER_PUBLIC_KEY")?,
            carrier_secret_key: env::var("CARRIER_SECRET_KEY")?,
            default_shipping_method: env::var("DEFAULT_SHIPPING_METHOD").ok(),
            webhook_secret: env::var("WEBHOOK_SECRET").ok(),
        })
    }
}
