use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::entities::mutations::Trigger;
use crate::handlers::authorized;
use crate::models::webhook::{CreditNoteWebhook, WebhookQuery};
use crate::services::{credit_notes, SyncOutcome};
use crate::AppState;

pub async fn webhook(
    State(state): State<AppState>,
    Query(query): Query<WebhookQuery>,
    Json(body): Json<Value>,
) -> StatusCode {
    if !authorized(state.config.webhook_secret.as_deref(), query.secret.as_deref()) {
        return StatusCode::FORBIDDEN;
    }

    let envelope: CreditNoteWebhook = match serde_json::from_value(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!("Undecodable credit note webhook body: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };
    let Some(credit_note) = envelope.credit_note else {
        tracing::warn!(
            "Credit note webhook '{}' without a credit note body",
            envelope.event
        );
        return StatusCode::BAD_REQUEST;
    };

    let result = match envelope.event.as_str() {
        "credit_note_create" => {
            credit_notes::try_create_credit_note(
                &state.db,
                &state.uphance,
                &state.snelstart,
                &credit_note,
                Trigger::Webhook,
            )
            .await
        }
        "credit_note_update" => {
            credit_notes::try_update_credit_note(
                &state.db,
                &state.uphance,
                &state.snelstart,
                &credit_note,
                Trigger::Webhook,
            )
            .await
        }
        "credit_note_delete" => {
            credit_notes::try_delete_credit_note(
                &state.db,
                &state.snelstart,
                &credit_note,
                Trigger::Webhook,
            )
            .await
        }
        other => {
            tracing::warn!("Unknown credit note webhook event '{}'", other);
            return StatusCode::BAD_REQUEST;
        }
    };

    match result {
        Ok(SyncOutcome::Synchronized) => StatusCode::OK,
        Ok(SyncOutcome::Failed(message)) => {
            tracing::warn!("Credit note webhook sync failed: {}", message);
            StatusCode::OK
        }
        Err(e) => {
            tracing::error!("Database error while handling credit note webhook: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
