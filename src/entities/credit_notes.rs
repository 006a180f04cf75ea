//! SeaORM Entity for the credit note linkage table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_notes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Credit note id in the source system
    #[sea_orm(unique)]
    pub source_id: i32,
    /// Booking id in the ledger system, null until linked
    #[sea_orm(unique)]
    pub remote_id: Option<String>,
    pub credit_note_number: Option<String>,
    pub credit_note_total: Option<f64>,
    pub created: DateTime,
    pub updated: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
