//! Mutation ledger
//!
//! Exactly one record per orchestrator invocation, success or failure. The
//! orchestrators are structured so every exit path passes through `record`;
//! the ledger is the authoritative account of what was synchronized and why
//! something was not.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

use crate::entities::mutations::{self, EntityKind, Method, Trigger};

pub async fn record(
    db: &DatabaseConnection,
    entity_kind: EntityKind,
    entity_id: i32,
    method: Method,
    trigger: Trigger,
    success: bool,
    message: Option<String>,
) -> Result<(), DbErr> {
    if !success {
        tracing::error!(
            "{:?} {:?} on {:?} {} failed: {}",
            trigger,
            method,
            entity_kind,
            entity_id,
            message.as_deref().unwrap_or("(no message)")
        );
    }

    mutations::ActiveModel {
        created: Set(Utc::now().naive_utc()),
        method: Set(method),
        trigger: Set(trigger),
        entity_kind: Set(entity_kind),
        entity_id: Set(entity_id),
        success: Set(success),
        message: Set(message),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(())
}
