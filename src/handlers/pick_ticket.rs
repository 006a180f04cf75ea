use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::entities::mutations::Trigger;
use crate::handlers::authorized;
use crate::models::webhook::{PickTicketWebhook, WebhookQuery};
use crate::services::{pick_tickets, SyncOutcome};
use crate::AppState;

pub async fn webhook(
    State(state): State<AppState>,
    Query(query): Query<WebhookQuery>,
    Json(body): Json<Value>,
) -> StatusCode {
    if !authorized(state.config.webhook_secret.as_deref(), query.secret.as_deref()) {
        return StatusCode::FORBIDDEN;
    }

    let envelope: PickTicketWebhook = match serde_json::from_value(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!("Undecodable pick ticket webhook body: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };
    let Some(pick_ticket) = envelope.pick_ticket else {
        tracing::warn!(
            "Pick ticket webhook '{}' without a pick ticket body",
            envelope.event
        );
        return StatusCode::BAD_REQUEST;
    };

    let default_method = state.config.default_shipping_method.as_deref();
    let result = match envelope.event.as_str() {
        "pick_ticket_create" => {
            pick_tickets::try_create_pick_ticket(
                &state.db,
                &state.sendcloud,
                &pick_ticket,
                default_method,
                Trigger::Webhook,
            )
            .await
        }
        "pick_ticket_update" => {
            pick_tickets::try_update_pick_ticket(
                &state.db,
                &state.sendcloud,
                &pick_ticket,
                default_method,
                Trigger::Webhook,
            )
            .await
        }
        "pick_ticket_delete" => {
            pick_tickets::try_delete_pick_ticket(
                &state.db,
                &state.sendcloud,
                &pick_ticket,
                Trigger::Webhook,
            )
            .await
        }
        other => {
            tracing::warn!("Unknown pick ticket webhook event '{}'", other);
            return StatusCode::BAD_REQUEST;
        }
    };

    match result {
        Ok(SyncOutcome::Synchronized) => StatusCode::OK,
        Ok(SyncOutcome::Failed(message)) => {
            tracing::warn!("Pick ticket webhook sync failed: {}", message);
            StatusCode::OK
        }
        Err(e) => {
            tracing::error!("Database error while handling pick ticket webhook: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
