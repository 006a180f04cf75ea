//! SeaORM Entity for the customer linkage table
//!
//! Maps a source-system customer id to the ledger relation id, with cached
//! display names for the admin listing.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Customer id in the source system
    #[sea_orm(unique)]
    pub source_id: i32,
    /// Relation id in the ledger system, null until linked
    #[sea_orm(unique)]
    pub remote_id: Option<String>,
    pub source_name: Option<String>,
    pub remote_name: Option<String>,
    pub created: DateTime,
    pub updated: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
