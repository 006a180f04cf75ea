//! SeaORM Entity for operator-curated tax mappings
//!
//! Maps a source tax percentage to the ledger tax category and the ledger
//! accounts for product and shipping lines. A missing mapping is a hard
//! synchronization failure, never a default.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tax_mappings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Source-system tax percentage this mapping applies to
    #[sea_orm(unique)]
    pub tax_amount: f64,
    /// Ledger tax category name, used on booking and tax lines
    pub name: String,
    /// Ledger account (remote id) for product lines
    pub ledger_account_id: String,
    /// Ledger account (remote id) for the shipping cost line
    pub shipping_ledger_account_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
