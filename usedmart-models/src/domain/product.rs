use super::{
    category::CategoryInfo,
    common::{PageParams, TimeRangeParams},
    profile::ProfileBrief,
};
use crate::{
    entities::product::{Entity as ProductEntity, ImageUrls, Model as ProductModel},
    enums::product::{ProductCondition, ProductSort, ProductStatus},
};
use chrono::{DateTime, Utc};
use sea_orm::{DeriveIntoActiveModel, DerivePartialModel, FromQueryResult};
use serde::{Deserialize, Serialize};
use serde_aux::prelude::*;
use validator::Validate;

/// Catalog query string: `?category=&search=&sort=&status=&page=&pageSize=`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchParams {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub category: Option<i32>,
    #[validate(length(max = 100, message = "search is too long"))]
    pub search: Option<String>,
    pub sort: Option<ProductSort>,
    pub status: Option<ProductStatus>,
    pub condition: Option<ProductCondition>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub min_price: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub max_price: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub seller_id: Option<i32>,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: PageParams,
    #[serde(flatten)]
    #[validate(nested)]
    pub time_range: TimeRangeParams,
}

/// Resolved catalog filter. `category_ids` already contains the requested
/// category and all of its descendants.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_ids: Option<Vec<i32>>,
    pub search: Option<String>,
    pub sort: ProductSort,
    pub statuses: Option<Vec<ProductStatus>>,
    pub condition: Option<ProductCondition>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub seller_id: Option<i32>,
    pub time_range: TimeRangeParams,
    pub page: PageParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, DerivePartialModel, FromQueryResult)]
#[serde(rename_all = "camelCase")]
#[sea_orm(entity = "ProductEntity")]
pub struct ProductInfo {
    pub id: i32,
    pub seller_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub condition: ProductCondition,
    pub location: Option<String>,
    pub images: Option<ImageUrls>,
    pub status: ProductStatus,
    pub view_count: i64,
    pub rejection_reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ProductModel> for ProductInfo {
    fn from(p: ProductModel) -> Self {
        Self {
            id: p.id,
            seller_id: p.seller_id,
            category_id: p.category_id,
            title: p.title,
            description: p.description,
            price: p.price,
            condition: p.condition,
            location: p.location,
            images: p.images,
            status: p.status,
            view_count: p.view_count,
            rejection_reason: p.rejection_reason,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Listing summary attached to conversations, orders and favorites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, DerivePartialModel, FromQueryResult)]
#[serde(rename_all = "camelCase")]
#[sea_orm(entity = "ProductEntity")]
pub struct ProductBrief {
    pub id: i32,
    pub seller_id: i32,
    pub title: String,
    pub price: i64,
    pub images: Option<ImageUrls>,
    pub status: ProductStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductInfo,
    pub seller: Option<ProfileBrief>,
    pub category: Option<CategoryInfo>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub category_id: Option<i32>,
    #[validate(length(min = 1, max = 120, message = "title must be 1-120 characters"))]
    pub title: String,
    #[validate(length(max = 5000, message = "description is too long"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price cannot be negative"))]
    pub price: i64,
    pub condition: ProductCondition,
    pub location: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateProduct {
    pub fn into_new(self, seller_id: i32, status: ProductStatus) -> NewProduct {
        NewProduct {
            seller_id,
            category_id: self.category_id,
            title: self.title,
            description: self.description,
            price: self.price,
            condition: self.condition,
            location: self.location,
            images: Some(ImageUrls(self.images)),
            status,
            view_count: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel)]
#[sea_orm(active_model = "crate::entities::product::ActiveModel")]
pub struct NewProduct {
    pub seller_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub condition: ProductCondition,
    pub location: Option<String>,
    pub images: Option<ImageUrls>,
    pub status: ProductStatus,
    pub view_count: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[sea_orm(active_model = "crate::entities::product::ActiveModel")]
/// Nullable fields: absent leaves the column alone, `null` clears it.
pub struct UpdateProduct {
    pub id: i32,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub category_id: Option<Option<i32>>,
    #[validate(length(min = 1, max = 120, message = "title must be 1-120 characters"))]
    pub title: String,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    #[validate(range(min = 0, message = "price cannot be negative"))]
    pub price: i64,
    pub condition: ProductCondition,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub images: Option<Option<ImageUrls>>,
}

impl UpdateProduct {
    #[inline]
    pub fn image_count(&self) -> usize {
        match &self.images {
            Some(Some(images)) => images.0.len(),
            _ => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeProductStatus {
    #[validate(range(min = 1, message = "id is required"))]
    pub id: i32,
    pub status: ProductStatus,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RejectProduct {
    #[validate(range(min = 1, message = "id is required"))]
    pub id: i32,
    #[validate(length(min = 1, max = 500, message = "reason is required"))]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let update: UpdateProduct = serde_json::from_str(
            r#"{"id":3,"title":"Desk","price":100,"condition":"good","description":null,"location":"Lyon"}"#,
        )
        .unwrap();

        assert_eq!(update.description, Some(None));
        assert_eq!(update.location, Some(Some("Lyon".to_string())));
        assert_eq!(update.category_id, None);
        assert_eq!(update.images, None);
        assert_eq!(update.image_count(), 0);
    }
}
