//! SeaORM Entity for the invoice linkage table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Invoice id in the source system
    #[sea_orm(unique)]
    pub source_id: i32,
    /// Booking id in the ledger system, null until linked
    #[sea_orm(unique)]
    pub remote_id: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_total: Option<f64>,
    pub created: DateTime,
    pub updated: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
