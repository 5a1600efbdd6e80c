use super::common::PageParams;
use crate::{
    entities::category::{ActiveModel, Entity as CategoryEntity, Model as CategoryModel},
    enums::common::Status,
    initializer::SeedableTrait,
};
use chrono::{DateTime, Utc};
use sea_orm::{DeriveIntoActiveModel, DerivePartialModel, FromQueryResult, IntoActiveModel};
use serde::{Deserialize, Serialize};
use serde_aux::prelude::*;
use usedmart_utils::tree::TreeNode;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPageParams {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub parent_id: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub status: Option<i16>,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: PageParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, DerivePartialModel, FromQueryResult)]
#[serde(rename_all = "camelCase")]
#[sea_orm(entity = "CategoryEntity")]
pub struct CategoryInfo {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<i32>,
    pub sort: i32,
    pub status: Status,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<CategoryModel> for CategoryInfo {
    fn from(c: CategoryModel) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            icon: c.icon,
            parent_id: c.parent_id,
            sort: c.sort,
            status: c.status,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTree {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub parent_id: Option<i32>,
    pub sort: i32,
    pub status: Status,
    pub children: Vec<CategoryTree>,
}

impl From<CategoryInfo> for CategoryTree {
    fn from(c: CategoryInfo) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            icon: c.icon,
            parent_id: c.parent_id,
            sort: c.sort,
            status: c.status,
            children: Vec::new(),
        }
    }
}

impl TreeNode for CategoryTree {
    type Id = i32;

    fn id(&self) -> i32 {
        self.id
    }

    fn parent_id(&self) -> Option<i32> {
        self.parent_id
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }

    fn sort_key(&self) -> i32 {
        self.sort
    }

    fn compare(&self, other: &Self) -> std::cmp::Ordering {
        self.sort
            .cmp(&other.sort)
            .then_with(|| self.name.cmp(&other.name))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    #[validate(length(min = 1, max = 64, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 64, message = "slug is required"))]
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<i32>,
    pub sort: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel)]
pub struct NewCategoryWithId {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub parent_id: Option<i32>,
    pub sort: i32,
}

impl SeedableTrait for NewCategoryWithId {
    type ActiveModel = ActiveModel;
    type Entity = CategoryEntity;

    fn get_active_model(&self) -> Self::ActiveModel {
        self.clone().into_active_model()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    pub id: i32,
    #[validate(length(min = 1, max = 64, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 64, message = "slug is required"))]
    pub slug: String,
    pub description: Option<Option<String>>,
    pub icon: Option<Option<String>>,
    pub parent_id: Option<Option<i32>>,
    pub sort: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel, Validate, Deserialize)]
pub struct ChangeCategoryStatus {
    pub id: i32,
    pub status: Status,
}
