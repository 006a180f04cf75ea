//! Entity linkage store
//!
//! One row per (kind, source_id) mapping a source-system identifier to the
//! downstream identifier. `get_or_create_*` is idempotent and safe under a
//! create race for different callers: the unique key on source_id guarantees
//! a single row, and losing the insert race falls back to the winner's row.
//!
//! `set_*_remote_id` is a conditional update (`WHERE remote_id IS NULL`), so
//! a remote id is persisted at most once per entity; later operations must
//! read the stored id instead of re-deriving it.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};
use rust_decimal::prelude::ToPrimitive;

use crate::entities::{credit_notes, customers, invoices, pick_tickets, prelude::*};
use crate::models::source;

pub async fn get_or_create_customer(
    db: &DatabaseConnection,
    customer: &source::Customer,
) -> Result<customers::Model, DbErr> {
    if let Some(existing) = Customers::find()
        .filter(customers::Column::SourceId.eq(customer.id))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let now = Utc::now().naive_utc();
    let row = customers::ActiveModel {
        source_id: Set(customer.id),
        source_name: Set(Some(customer.name.clone())),
        created: Set(now),
        updated: Set(now),
        ..Default::default()
    };

    match row.insert(db).await {
        Ok(model) => Ok(model),
        Err(e) => {
            // Lost a concurrent create race; the winner's row is authoritative.
            match Customers::find()
                .filter(customers::Column::SourceId.eq(customer.id))
                .one(db)
                .await?
            {
                Some(existing) => Ok(existing),
                None => Err(e),
            }
        }
    }
}

pub async fn get_or_create_invoice(
    db: &DatabaseConnection,
    invoice: &source::Invoice,
) -> Result<invoices::Model, DbErr> {
    if let Some(existing) = Invoices::find()
        .filter(invoices::Column::SourceId.eq(invoice.id))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let now = Utc::now().naive_utc();
    let row = invoices::ActiveModel {
        source_id: Set(invoice.id),
        invoice_number: Set(Some(invoice.invoice_number.to_string())),
        invoice_total: Set((invoice.items_total + invoice.items_tax).to_f64()),
        created: Set(now),
        updated: Set(now),
        ..Default::default()
    };

    match row.insert(db).await {
        Ok(model) => Ok(model),
        Err(e) => {
            match Invoices::find()
                .filter(invoices::Column::SourceId.eq(invoice.id))
                .one(db)
                .await?
            {
                Some(existing) => Ok(existing),
                None => Err(e),
            }
        }
    }
}

pub async fn get_or_create_credit_note(
    db: &DatabaseConnection,
    credit_note: &source::CreditNote,
) -> Result<credit_notes::Model, DbErr> {
    if let Some(existing) = CreditNotes::find()
        .filter(credit_notes::Column::SourceId.eq(credit_note.id))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let now = Utc::now().naive_utc();
    let row = credit_notes::ActiveModel {
        source_id: Set(credit_note.id),
        credit_note_number: Set(Some(credit_note.credit_note_number.to_string())),
        credit_note_total: Set((credit_note.items_total + credit_note.items_tax).to_f64()),
        created: Set(now),
        updated: Set(now),
        ..Default::default()
    };

    match row.insert(db).await {
        Ok(model) => Ok(model),
        Err(e) => {
            match CreditNotes::find()
                .filter(credit_notes::Column::SourceId.eq(credit_note.id))
                .one(db)
                .await?
            {
                Some(existing) => Ok(existing),
                None => Err(e),
            }
        }
    }
}

pub async fn get_or_create_pick_ticket(
    db: &DatabaseConnection,
    pick_ticket: &source::PickTicket,
) -> Result<pick_tickets::Model, DbErr> {
    if let Some(existing) = PickTickets::find()
        .filter(pick_tickets::Column::SourceId.eq(pick_ticket.id))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let now = Utc::now().naive_utc();
    let row = pick_tickets::ActiveModel {
        source_id: Set(pick_ticket.id),
        shipment_number: Set(Some(pick_ticket.shipment_number)),
        order_id: Set(pick_ticket.order_id),
        sale_id: Set(Some(pick_ticket.sale_id)),
        created: Set(now),
        updated: Set(now),
        ..Default::default()
    };

    match row.insert(db).await {
        Ok(model) => Ok(model),
        Err(e) => {
            match PickTickets::find()
                .filter(pick_tickets::Column::SourceId.eq(pick_ticket.id))
                .one(db)
                .await?
            {
                Some(existing) => Ok(existing),
                None => Err(e),
            }
        }
    }
}

/// Persist a remote id, but only if none is set yet. Returns whether this
/// call won the write; `false` means another writer linked the entity first.
macro_rules! set_remote_id_fn {
    ($name:ident, $module:ident, $entity:ident) => {
        pub async fn $name(
            db: &DatabaseConnection,
            entity_id: i32,
            remote_id: &str,
        ) -> Result<bool, DbErr> {
            let result = $entity::update_many()
                .col_expr($module::Column::RemoteId, Expr::value(remote_id))
                .col_expr($module::Column::Updated, Expr::value(Utc::now().naive_utc()))
                .filter($module::Column::Id.eq(entity_id))
                .filter($module::Column::RemoteId.is_null())
                .exec(db)
                .await?;
            Ok(result.rows_affected == 1)
        }
    };
}

set_remote_id_fn!(set_customer_remote_id, customers, Customers);
set_remote_id_fn!(set_invoice_remote_id, invoices, Invoices);
set_remote_id_fn!(set_credit_note_remote_id, credit_notes, CreditNotes);
set_remote_id_fn!(set_pick_ticket_remote_id, pick_tickets, PickTickets);

/// Refresh the cached display fields from the latest source snapshot.
pub async fn refresh_invoice_display(
    db: &DatabaseConnection,
    model: invoices::Model,
    invoice: &source::Invoice,
) -> Result<invoices::Model, DbErr> {
    let mut active = model.into_active_model();
    active.invoice_number = Set(Some(invoice.invoice_number.to_string()));
    active.invoice_total = Set((invoice.items_total + invoice.items_tax).to_f64());
    active.updated = Set(Utc::now().naive_utc());
    active.update(db).await
}

pub async fn refresh_credit_note_display(
    db: &DatabaseConnection,
    model: credit_notes::Model,
    credit_note: &source::CreditNote,
) -> Result<credit_notes::Model, DbErr> {
    let mut active = model.into_active_model();
    active.credit_note_number = Set(Some(credit_note.credit_note_number.to_string()));
    active.credit_note_total = Set((credit_note.items_total + credit_note.items_tax).to_f64());
    active.updated = Set(Utc::now().naive_utc());
    active.update(db).await
}

pub async fn refresh_pick_ticket_display(
    db: &DatabaseConnection,
    model: pick_tickets::Model,
    pick_ticket: &source::PickTicket,
) -> Result<pick_tickets::Model, DbErr> {
    let mut active = model.into_active_model();
    active.shipment_number = Set(Some(pick_ticket.shipment_number));
    active.order_id = Set(pick_ticket.order_id);
    active.sale_id = Set(Some(pick_ticket.sale_id));
    active.updated = Set(Utc::now().naive_utc());
    active.update(db).await
}

pub async fn refresh_customer_names(
    db: &DatabaseConnection,
    model: customers::Model,
    source_name: &str,
    remote_name: Option<&str>,
) -> Result<customers::Model, DbErr> {
    let mut active = model.into_active_model();
    active.source_name = Set(Some(source_name.to_string()));
    if let Some(remote_name) = remote_name {
        active.remote_name = Set(Some(remote_name.to_string()));
    }
    active.updated = Set(Utc::now().naive_utc());
    active.update(db).await
}
