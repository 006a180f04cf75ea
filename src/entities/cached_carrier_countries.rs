//! SeaORM Entity for cached carrier countries
//!
//! Refreshed together with shipping methods: the carrier reports the
//! serviceable countries per method.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cached_carrier_countries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub remote_id: i64,
    pub name: String,
    pub iso_2: String,
    pub iso_3: String,
    pub price: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::shipping_method_countries::Entity")]
    ShippingMethodCountries,
}

impl Related<super::shipping_method_countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShippingMethodCountries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
