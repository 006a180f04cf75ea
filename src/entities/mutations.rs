//! SeaORM Entity for the mutation audit log
//!
//! Append-only: exactly one row is written per synchronization attempt,
//! successful or not. Rows are never updated or deleted by the sync flow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "mutations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created: DateTime,
    pub method: Method,
    pub trigger: Trigger,
    pub entity_kind: EntityKind,
    /// Primary key of the linked entity row in the table named by entity_kind
    pub entity_id: i32,
    pub success: bool,
    pub message: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum Method {
    #[sea_orm(num_value = 0)]
    Create,
    #[sea_orm(num_value = 1)]
    Update,
    #[sea_orm(num_value = 2)]
    Delete,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum Trigger {
    #[sea_orm(num_value = 0)]
    Webhook,
    #[sea_orm(num_value = 1)]
    Manual,
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum EntityKind {
    #[sea_orm(string_value = "customer")]
    Customer,
    #[sea_orm(string_value = "invoice")]
    Invoice,
    #[sea_orm(string_value = "credit_note")]
    CreditNote,
    #[sea_orm(string_value = "pick_ticket")]
    PickTicket,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
