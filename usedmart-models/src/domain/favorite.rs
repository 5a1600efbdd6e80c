use super::{common::PageParams, product::ProductInfo};
use crate::entities::favorite::{Entity as FavoriteEntity, Model as FavoriteModel};
use chrono::{DateTime, Utc};
use sea_orm::{DeriveIntoActiveModel, DerivePartialModel, FromQueryResult};
use serde::{Deserialize, Serialize};
use serde_aux::prelude::*;
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddFavorite {
    #[validate(range(min = 1, message = "productId is required"))]
    pub product_id: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel)]
#[sea_orm(active_model = "crate::entities::favorite::ActiveModel")]
pub struct NewFavorite {
    pub profile_id: i32,
    pub product_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, DerivePartialModel, FromQueryResult)]
#[serde(rename_all = "camelCase")]
#[sea_orm(entity = "FavoriteEntity")]
pub struct FavoriteInfo {
    pub id: i32,
    pub profile_id: i32,
    pub product_id: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<FavoriteModel> for FavoriteInfo {
    fn from(f: FavoriteModel) -> Self {
        Self {
            id: f.id,
            profile_id: f.profile_id,
            product_id: f.product_id,
            created_at: f.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteProduct {
    pub favorited_at: Option<DateTime<Utc>>,
    pub product: ProductInfo,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePageParams {
    #[serde(flatten)]
    #[validate(nested)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCheckParams {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    #[validate(range(min = 1, message = "productId is required"))]
    pub product_id: i32,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCheck {
    pub product_id: i32,
    pub favorited: bool,
}
