use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::entities::mutations::Trigger;
use crate::handlers::authorized;
use crate::models::webhook::{InvoiceWebhook, WebhookQuery};
use crate::services::{invoices, SyncOutcome};
use crate::AppState;

pub async fn webhook(
    State(state): State<AppState>,
    Query(query): Query<WebhookQuery>,
    Json(body): Json<Value>,
) -> StatusCode {
    if !authorized(state.config.webhook_secret.as_deref(), query.secret.as_deref()) {
        return StatusCode::FORBIDDEN;
    }

    let envelope: InvoiceWebhook = match serde_json::from_value(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!("Undecodable invoice webhook body: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };
    let Some(invoice) = envelope.invoice else {
        tracing::warn!("Invoice webhook '{}' without an invoice body", envelope.event);
        return StatusCode::BAD_REQUEST;
    };

    let result = match envelope.event.as_str() {
        "invoice_create" => {
            invoices::try_create_invoice(
                &state.db,
                &state.uphance,
                &state.snelstart,
                &invoice,
                Trigger::Webhook,
            )
            .await
        }
        "invoice_update" => {
            invoices::try_update_invoice(
                &state.db,
                &state.uphance,
                &state.snelstart,
                &invoice,
                Trigger::Webhook,
            )
            .await
        }
        "invoice_delete" => {
            invoices::try_delete_invoice(&state.db, &state.snelstart, &invoice, Trigger::Webhook)
                .await
        }
        other => {
            tracing::warn!("Unknown invoice webhook event '{}'", other);
            return StatusCode::BAD_REQUEST;
        }
    };

    match result {
        Ok(SyncOutcome::Synchronized) => StatusCode::OK,
        Ok(SyncOutcome::Failed(message)) => {
            tracing::warn!("Invoice webhook sync failed: {}", message);
            StatusCode::OK
        }
        Err(e) => {
            tracing::error!("Database error while handling invoice webhook: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
