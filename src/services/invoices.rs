//! Invoice synchronization
//!
//! An invoice becomes a sales booking in the ledger. The customer is
//! synchronized first (its own mutation record), then the booking lines and
//! tax lines are derived from the line items and shipping, and finally the
//! booking is created, updated, or deleted remotely. Deleting never clears
//! the stored remote id.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

use crate::clients::snelstart::{BookingPayload, LedgerApi, RelationRef};
use crate::clients::uphance::SourceApi;
use crate::entities::mutations::{EntityKind, Method, Trigger};
use crate::entities::prelude::TaxMappings;
use crate::error::SyncError;
use crate::models::source;
use crate::services::{bookings, customers, linkage, mutations, record_failure, SyncOutcome};

async fn build_booking_payload(
    db: &DatabaseConnection,
    source_api: &impl SourceApi,
    ledger: &impl LedgerApi,
    invoice: &source::Invoice,
    trigger: Trigger,
) -> Result<BookingPayload, SyncError> {
    let customer = source_api.get_customer(invoice.company_id).await.map_err(|e| {
        SyncError::api(
            format!(
                "An error occurred while retrieving customer {} for invoice {}",
                invoice.company_id, invoice.id
            ),
            e,
        )
    })?;
    let relation = customers::match_or_create_relation(db, ledger, &customer, trigger).await?;

    let mappings = TaxMappings::find().all(db).await?;
    let (booking_lines, tax_lines) = bookings::construct_order_and_tax_lines(
        &invoice.line_items,
        Some((invoice.shipping_cost, invoice.shipping_tax)),
        None,
        Decimal::ONE,
        &mappings,
    )?;

    let invoice_date = invoice
        .created_at
        .unwrap_or_else(Utc::now)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();

    Ok(BookingPayload {
        invoice_number: invoice.invoice_number.to_string(),
        customer: RelationRef { id: relation.id },
        booking_lines,
        invoice_amount: bookings::format_amount(invoice.grand_total),
        payment_term_days: bookings::parse_payment_term_days(invoice.payment_terms.as_deref()),
        invoice_date,
        tax_lines,
    })
}

pub async fn try_create_invoice(
    db: &DatabaseConnection,
    source_api: &impl SourceApi,
    ledger: &impl LedgerApi,
    invoice: &source::Invoice,
    trigger: Trigger,
) -> Result<SyncOutcome, DbErr> {
    let entity = linkage::get_or_create_invoice(db, invoice).await?;

    let payload = match build_booking_payload(db, source_api, ledger, invoice, trigger).await {
        Ok(payload) => payload,
        Err(e) => {
            return record_failure(
                db,
                EntityKind::Invoice,
                entity.id,
                Method::Create,
                trigger,
                format!("A synchronization error occurred for invoice {}: {}", invoice.id, e),
            )
            .await;
        }
    };

    match ledger.create_booking(&payload).await {
        Ok(booking) => {
            if !linkage::set_invoice_remote_id(db, entity.id, &booking.id).await? {
                tracing::warn!(
                    "Invoice {} was linked concurrently; keeping the stored remote id",
                    invoice.id
                );
            }
            mutations::record(db, EntityKind::Invoice, entity.id, Method::Create, trigger, true, None)
                .await?;
            tracing::info!("Successfully synchronized invoice {}", invoice.id);
            Ok(SyncOutcome::Synchronized)
        }
        Err(e) => {
            record_failure(
                db,
                EntityKind::Invoice,
                entity.id,
                Method::Create,
                trigger,
                format!(
                    "An error occurred while adding a booking for invoice {}: {}",
                    invoice.invoice_number, e
                ),
            )
            .await
        }
    }
}

pub async fn try_update_invoice(
    db: &DatabaseConnection,
    source_api: &impl SourceApi,
    ledger: &impl LedgerApi,
    invoice: &source::Invoice,
    trigger: Trigger,
) -> Result<SyncOutcome, DbErr> {
    let entity = linkage::get_or_create_invoice(db, invoice).await?;
    let entity = linkage::refresh_invoice_display(db, entity, invoice).await?;

    let Some(remote_id) = entity.remote_id.clone() else {
        return record_failure(
            db,
            EntityKind::Invoice,
            entity.id,
            Method::Update,
            trigger,
            format!(
                "Unable to update invoice {} because it has no remote id",
                invoice.id
            ),
        )
        .await;
    };

    let payload = match build_booking_payload(db, source_api, ledger, invoice, trigger).await {
        Ok(payload) => payload,
        Err(e) => {
            return record_failure(
                db,
                EntityKind::Invoice,
                entity.id,
                Method::Update,
                trigger,
                format!("A synchronization error occurred for invoice {}: {}", invoice.id, e),
            )
            .await;
        }
    };

    match ledger.update_booking(&remote_id, &payload).await {
        Ok(()) => {
            mutations::record(db, EntityKind::Invoice, entity.id, Method::Update, trigger, true, None)
                .await?;
            tracing::info!("Successfully updated invoice {}", invoice.id);
            Ok(SyncOutcome::Synchronized)
        }
        Err(e) => {
            record_failure(
                db,
                EntityKind::Invoice,
                entity.id,
                Method::Update,
                trigger,
                format!(
                    "An error occurred while updating the booking for invoice {}: {}",
                    invoice.invoice_number, e
                ),
            )
            .await
        }
    }
}

/// Delete the remote booking. The stored remote id is kept so the history of
/// what was linked stays inspectable.
pub async fn try_delete_invoice(
    db: &DatabaseConnection,
    ledger: &impl LedgerApi,
    invoice: &source::Invoice,
    trigger: Trigger,
) -> Result<SyncOutcome, DbErr> {
    let entity = linkage::get_or_create_invoice(db, invoice).await?;

    let Some(remote_id) = entity.remote_id.clone() else {
        return record_failure(
            db,
            EntityKind::Invoice,
            entity.id,
            Method::Delete,
            trigger,
            format!(
                "Unable to delete invoice {} because it has no remote id",
                invoice.id
            ),
        )
        .await;
    };

    match ledger.delete_booking(&remote_id).await {
        Ok(()) => {
            mutations::record(db, EntityKind::Invoice, entity.id, Method::Delete, trigger, true, None)
                .await?;
            tracing::info!("Successfully deleted booking for invoice {}", invoice.id);
            Ok(SyncOutcome::Synchronized)
        }
        Err(e) => {
            record_failure(
                db,
                EntityKind::Invoice,
                entity.id,
                Method::Delete,
                trigger,
                format!(
                    "An error occurred while deleting the booking for invoice {}: {}",
                    invoice.invoice_number, e
                ),
            )
            .await
        }
    }
}
