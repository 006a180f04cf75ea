//! SeaORM Entity for cached carrier shipping methods

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cached_shipping_methods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub remote_id: i64,
    pub name: String,
    pub carrier: String,
    pub min_weight: f64,
    pub max_weight: f64,
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

impl Related<super::cached_carrier_countries::Entity> for Entity {
    fn to() -> RelationDef {
        super::shipping_method_countries::Relation::CarrierCountry.def()
    }

    fn via() -> Option<RelationDef> {
        Some(
            super::shipping_method_countries::Relation::ShippingMethod
                .def()
                .rev(),
        )
    }
}

impl ActiveModelBehavior for ActiveModel {}
