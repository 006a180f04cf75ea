//! SeaORM Entity for operator-curated country mappings
//!
//! Optional per-country overrides: a shipping method for pick tickets going
//! to the country, and a ledger country for address conversion when the
//! source country code does not match the ledger vocabulary automatically.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "country_mappings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Country code as known in the source system
    #[sea_orm(unique)]
    pub country_code: String,
    pub shipping_method_id: Option<i32>,
    pub ledger_country_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cached_shipping_methods::Entity",
        from = "Column::ShippingMethodId",
        to = "super::cached_shipping_methods::Column::Id"
    )]
    ShippingMethod,
    #[sea_orm(
        belongs_to = "super::cached_countries::Entity",
        from = "Column::LedgerCountryId",
        to = "super::cached_countries::Column::Id"
    )]
    LedgerCountry,
}

impl Related<super::cached_shipping_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShippingMethod.def()
    }
}

impl Related<super::cached_countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerCountry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
