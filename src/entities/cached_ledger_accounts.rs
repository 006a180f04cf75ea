//! SeaORM Entity for cached ledger chart-of-accounts codes

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cached_ledger_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub remote_id: String,
    pub description: String,
    pub number: i32,
    pub account_kind: Option<String>,
    pub vat_code: Option<String>,
    pub inactive: bool,
    pub modified_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
