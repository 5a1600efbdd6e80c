use super::common::PageParams;
use crate::{
    entities::permission::{ActiveModel, Entity as PermissionEntity},
    enums::common::EntityType,
    initializer::SeedableTrait,
};
use chrono::{DateTime, Utc};
use sea_orm::{DeriveIntoActiveModel, DerivePartialModel, FromQueryResult, IntoActiveModel};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PermissionPageParams {
    pub code: Option<String>,
    pub resource: Option<EntityType>,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: PageParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, DerivePartialModel, FromQueryResult)]
#[serde(rename_all = "camelCase")]
#[sea_orm(entity = "PermissionEntity")]
pub struct PermissionInfo {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub resource: EntityType,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel, Validate, Deserialize)]
pub struct NewPermission {
    #[validate(length(min = 1, max = 128, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 3, max = 64, message = "code must look like resource:operation"))]
    pub code: String,
    pub resource: EntityType,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel)]
pub struct NewPermissionWithId {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub resource: EntityType,
    pub description: Option<String>,
}

impl SeedableTrait for NewPermissionWithId {
    type ActiveModel = ActiveModel;
    type Entity = PermissionEntity;

    fn get_active_model(&self) -> Self::ActiveModel {
        self.clone().into_active_model()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel, Validate, Deserialize)]
pub struct UpdatePermission {
    pub id: i32,
    #[validate(length(min = 1, max = 128, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 3, max = 64, message = "code must look like resource:operation"))]
    pub code: String,
    pub resource: EntityType,
    pub description: Option<Option<String>>,
}
