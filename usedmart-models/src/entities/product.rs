//! `SeaORM` Entity for listings

use crate::enums::product::{ProductCondition, ProductStatus};
use sea_orm::{entity::prelude::*, FromJsonQueryResult};
use serde::{Deserialize, Serialize};
use usedmart_macros::IntoActiveValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub seller_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    /// Minor currency units.
    pub price: i64,
    pub condition: ProductCondition,
    pub location: Option<String>,
    pub images: Option<ImageUrls>,
    pub status: ProductStatus,
    pub view_count: i64,
    pub rejection_reason: Option<String>,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, IntoActiveValue, FromJsonQueryResult,
)]
pub struct ImageUrls(pub Vec<String>);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::SellerId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Seller,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
