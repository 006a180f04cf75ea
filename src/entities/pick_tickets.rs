//! SeaORM Entity for the pick ticket linkage table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "pick_tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Pick ticket id in the source system
    #[sea_orm(unique)]
    pub source_id: i32,
    /// Parcel id in the carrier system, null until linked
    #[sea_orm(unique)]
    pub remote_id: Option<String>,
    pub shipment_number: Option<i32>,
    pub order_id: Option<i32>,
    pub sale_id: Option<i32>,
    pub created: DateTime,
    pub updated: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
