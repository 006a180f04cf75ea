// src/lib.rs

use axum::routing::post;
use axum::Router;
use sea_orm::DatabaseConnection;

use crate::clients::{SendcloudClient, SnelstartClient, UphanceClient};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub uphance: UphanceClient,
    pub snelstart: SnelstartClient,
    pub sendcloud: SendcloudClient,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let uphance = UphanceClient::new(&config);
        let snelstart = SnelstartClient::new(&config);
        let sendcloud = SendcloudClient::new(&config);
        Self {
            db,
            config,
            uphance,
            snelstart,
            sendcloud,
        }
    }
}

/// Webhook router; one POST endpoint per document kind.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/invoices/webhook", post(handlers::invoice::webhook))
        .route(
            "/api/v1/credit-notes/webhook",
            post(handlers::credit_note::webhook),
        )
        .route(
            "/api/v1/pick-tickets/webhook",
            post(handlers::pick_ticket::webhook),
        )
        .with_state(state)
}

pub mod entities {
    pub mod prelude;

    pub mod cached_carrier_countries;
    pub mod cached_countries;
    pub mod cached_ledger_accounts;
    pub mod cached_shipping_methods;
    pub mod cached_tax_rates;
    pub mod country_mappings;
    pub mod credit_notes;
    pub mod customers;
    pub mod invoices;
    pub mod mutations;
    pub mod pick_tickets;
    pub mod shipping_method_countries;
    pub mod tax_mappings;
}

pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
