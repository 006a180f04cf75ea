//! Webhook envelope shapes
//!
//! The source system posts `{"event": "...", "<document>": {...}}`. The
//! document key matches the document kind, so each endpoint has its own
//! envelope struct.

use serde::Deserialize;

use crate::models::source::{CreditNote, Invoice, PickTicket};

#[derive(Debug, Deserialize)]
pub struct InvoiceWebhook {
    pub event: String,
    pub invoice: Option<Invoice>,
}

#[derive(Debug, Deserialize)]
pub struct CreditNoteWebhook {
    pub event: String,
    pub credit_note: Option<CreditNote>,
}

#[derive(Debug, Deserialize)]
pub struct PickTicketWebhook {
    pub event: String,
    pub pick_ticket: Option<PickTicket>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookQuery {
    pub secret: Option<String>,
}
