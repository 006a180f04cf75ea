//! SeaORM Entity for the shipping method / carrier country join table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "shipping_method_countries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub shipping_method_id: i32,
    pub carrier_country_id: i32,
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
        belongs_to = "super::cached_carrier_countries::Entity",
        from = "Column::CarrierCountryId",
        to = "super::cached_carrier_countries::Column::Id"
    )]
    CarrierCountry,
}

impl Related<super::cached_shipping_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShippingMethod.def()
    }
}

impl Related<super::cached_carrier_countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarrierCountry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
