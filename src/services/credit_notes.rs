//! Credit note synchronization
//!
//! A credit note becomes a sales booking with every amount sign-inverted.
//! Credit notes do not carry the customer directly; it is resolved through
//! the sales order the credit note references. An optional freeform
//! adjustment line is mapped through the tax mapping matching its own
//! implied percentage.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

use crate::clients::snelstart::{BookingPayload, LedgerApi, RelationRef};
use crate::clients::uphance::SourceApi;
use crate::entities::mutations::{EntityKind, Method, Trigger};
use crate::entities::prelude::TaxMappings;
use crate::error::SyncError;
use crate::models::source;
use crate::services::bookings::FreeformLine;
use crate::services::{bookings, customers, linkage, mutations, record_failure, SyncOutcome};

async fn resolve_customer(
    source_api: &impl SourceApi,
    credit_note: &source::CreditNote,
) -> Result<source::Customer, SyncError> {
    let orders = source_api
        .get_orders_by_number(credit_note.order_number)
        .await
        .map_err(|e| {
            SyncError::api(
                format!(
                    "An error occurred while retrieving orders for credit note {}",
                    credit_note.id
                ),
                e,
            )
        })?;
    let order = orders.first().ok_or_else(|| {
        SyncError::Other(format!(
            "No order found with order number {} for credit note {}",
            credit_note.order_number, credit_note.id
        ))
    })?;

    source_api.get_customer(order.company_id).await.map_err(|e| {
        SyncError::api(
            format!(
                "An error occurred while retrieving customer {} for credit note {}",
                order.company_id, credit_note.id
            ),
            e,
        )
    })
}

async fn build_booking_payload(
    db: &DatabaseConnection,
    source_api: &impl SourceApi,
    ledger: &impl LedgerApi,
    credit_note: &source::CreditNote,
    trigger: Trigger,
) -> Result<BookingPayload, SyncError> {
    let customer = resolve_customer(source_api, credit_note).await?;
    let relation = customers::match_or_create_relation(db, ledger, &customer, trigger).await?;

    let freeform = credit_note.freeform_amount.map(|amount| FreeformLine {
        amount,
        tax: credit_note.freeform_tax.unwrap_or_default(),
        description: credit_note
            .freeform_description
            .clone()
            .unwrap_or_default(),
    });

    let mappings = TaxMappings::find().all(db).await?;
    let (booking_lines, tax_lines) = bookings::construct_order_and_tax_lines(
        &credit_note.line_items,
        None,
        freeform,
        Decimal::NEGATIVE_ONE,
        &mappings,
    )?;

    let invoice_date = credit_note
        .created_at
        .unwrap_or_else(Utc::now)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();

    Ok(BookingPayload {
        invoice_number: credit_note.credit_note_number.to_string(),
        customer: RelationRef { id: relation.id },
        booking_lines,
        invoice_amount: bookings::format_amount(credit_note.grand_total * Decimal::NEGATIVE_ONE),
        payment_term_days: 0,
        invoice_date,
        tax_lines,
    })
}

pub async fn try_create_credit_note(
    db: &DatabaseConnection,
    source_api: &impl SourceApi,
    ledger: &impl LedgerApi,
    credit_note: &source::CreditNote,
    trigger: Trigger,
) -> Result<SyncOutcome, DbErr> {
    let entity = linkage::get_or_create_credit_note(db, credit_note).await?;

    let payload = match build_booking_payload(db, source_api, ledger, credit_note, trigger).await {
        Ok(payload) => payload,
        Err(e) => {
            return record_failure(
                db,
                EntityKind::CreditNote,
                entity.id,
                Method::Create,
                trigger,
                format!(
                    "A synchronization error occurred for credit note {}: {}",
                    credit_note.id, e
                ),
            )
            .await;
        }
    };

    match ledger.create_booking(&payload).await {
        Ok(booking) => {
            if !linkage::set_credit_note_remote_id(db, entity.id, &booking.id).await? {
                tracing::warn!(
                    "Credit note {} was linked concurrently; keeping the stored remote id",
                    credit_note.id
                );
            }
            mutations::record(
                db,
                EntityKind::CreditNote,
                entity.id,
                Method::Create,
                trigger,
                true,
                None,
            )
            .await?;
            tracing::info!("Successfully synchronized credit note {}", credit_note.id);
            Ok(SyncOutcome::Synchronized)
        }
        Err(e) => {
            record_failure(
                db,
                EntityKind::CreditNote,
                entity.id,
                Method::Create,
                trigger,
                format!(
                    "An error occurred while adding a booking for credit note {}: {}",
                    credit_note.credit_note_number, e
                ),
            )
            .await
        }
    }
}

pub async fn try_update_credit_note(
    db: &DatabaseConnection,
    source_api: &impl SourceApi,
    ledger: &impl LedgerApi,
    credit_note: &source::CreditNote,
    trigger: Trigger,
) -> Result<SyncOutcome, DbErr> {
    let entity = linkage::get_or_create_credit_note(db, credit_note).await?;
    let entity = linkage::refresh_credit_note_display(db, entity, credit_note).await?;

    let Some(remote_id) = entity.remote_id.clone() else {
        return record_failure(
            db,
            EntityKind::CreditNote,
            entity.id,
            Method::Update,
            trigger,
            format!(
                "Unable to update credit note {} because it has no remote id",
                credit_note.id
            ),
        )
        .await;
    };

    let payload = match build_booking_payload(db, source_api, ledger, credit_note, trigger).await {
        Ok(payload) => payload,
        Err(e) => {
            return record_failure(
                db,
                EntityKind::CreditNote,
                entity.id,
                Method::Update,
                trigger,
                format!(
                    "A synchronization error occurred for credit note {}: {}",
                    credit_note.id, e
                ),
            )
            .await;
        }
    };

    match ledger.update_booking(&remote_id, &payload).await {
        Ok(()) => {
            mutations::record(
                db,
                EntityKind::CreditNote,
                entity.id,
                Method::Update,
                trigger,
                true,
                None,
            )
            .await?;
            tracing::info!("Successfully updated credit note {}", credit_note.id);
            Ok(SyncOutcome::Synchronized)
        }
        Err(e) => {
            record_failure(
                db,
                EntityKind::CreditNote,
                entity.id,
                Method::Update,
                trigger,
                format!(
                    "An error occurred while updating the booking for credit note {}: {}",
                    credit_note.credit_note_number, e
                ),
            )
            .await
        }
    }
}

/// Delete the remote booking; the stored remote id stays in place.
pub async fn try_delete_credit_note(
    db: &DatabaseConnection,
    ledger: &impl LedgerApi,
    credit_note: &source::CreditNote,
    trigger: Trigger,
) -> Result<SyncOutcome, DbErr> {
    let entity = linkage::get_or_create_credit_note(db, credit_note).await?;

    let Some(remote_id) = entity.remote_id.clone() else {
        return record_failure(
            db,
            EntityKind::CreditNote,
            entity.id,
            Method::Delete,
            trigger,
            format!(
                "Unable to delete credit note {} because it has no remote id",
                credit_note.id
            ),
        )
        .await;
    };

    match ledger.delete_booking(&remote_id).await {
        Ok(()) => {
            mutations::record(
                db,
                EntityKind::CreditNote,
                entity.id,
                Method::Delete,
                trigger,
                true,
                None,
            )
            .await?;
            tracing::info!("Successfully deleted booking for credit note {}", credit_note.id);
            Ok(SyncOutcome::Synchronized)
        }
        Err(e) => {
            record_failure(
                db,
                EntityKind::CreditNote,
                entity.id,
                Method::Delete,
                trigger,
                format!(
                    "An error occurred while deleting the booking for credit note {}: {}",
                    credit_note.credit_note_number, e
                ),
            )
            .await
        }
    }
}
