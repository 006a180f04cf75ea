//! Synchronization services
//!
//! Converters are pure where possible; orchestrators tie linkage, conversion,
//! the remote call, and the mutation record together. An orchestrator only
//! returns `Err` for failures of the local database itself; every business
//! failure is recorded as a mutation and reported as a failed outcome.

use sea_orm::{DatabaseConnection, DbErr};

use crate::entities::mutations::{EntityKind, Method, Trigger};

pub mod bookings;
pub mod credit_notes;
pub mod customers;
pub mod invoices;
pub mod linkage;
pub mod mutations;
pub mod pick_tickets;
pub mod reference_cache;

/// Result of one orchestrator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synchronized,
    Failed(String),
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Synchronized)
    }
}

/// Record a failed mutation and surface the same message as the outcome.
pub(crate) async fn record_failure(
    db: &DatabaseConnection,
    entity_kind: EntityKind,
    entity_id: i32,
    method: Method,
    trigger: Trigger,
    message: String,
) -> Result<SyncOutcome, DbErr> {
    mutations::record(
        db,
        entity_kind,
        entity_id,
        method,
        trigger,
        false,
        Some(message.clone()),
    )
    .await?;
    Ok(SyncOutcome::Failed(message))
}
