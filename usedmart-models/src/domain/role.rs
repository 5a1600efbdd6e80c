use super::{
    common::{PageParams, TimeRangeParams},
    permission::PermissionInfo,
};
use crate::{
    entities::{
        role::{ActiveModel, Entity as RoleEntity, Model as RoleModel},
        role_permission::{ActiveModel as RolePermissionActiveModel, Entity as RolePermissionEntity},
    },
    enums::{common::Status, role::RoleType},
    initializer::SeedableTrait,
};
use chrono::{DateTime, Utc};
use sea_orm::{DeriveIntoActiveModel, DerivePartialModel, FromQueryResult, IntoActiveModel};
use serde::{Deserialize, Serialize};
use serde_aux::prelude::*;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RolePageParams {
    pub name: Option<String>,
    pub code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub status: Option<i16>,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: PageParams,
    #[serde(flatten)]
    #[validate(nested)]
    pub time_range: TimeRangeParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, DerivePartialModel, FromQueryResult)]
#[serde(rename_all = "camelCase")]
#[sea_orm(entity = "RoleEntity")]
pub struct RoleInfo {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub r#type: RoleType,
    pub status: Status,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel, Validate, Deserialize)]
pub struct NewRole {
    #[validate(length(min = 1, max = 128, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "code is required"))]
    pub code: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel)]
pub struct NewRoleWithId {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub r#type: RoleType,
}

impl SeedableTrait for NewRoleWithId {
    type ActiveModel = ActiveModel;
    type Entity = RoleEntity;

    fn get_active_model(&self) -> Self::ActiveModel {
        self.clone().into_active_model()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel, Validate, Deserialize)]
pub struct UpdateRole {
    pub id: i32,
    #[validate(length(min = 1, max = 128, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "code is required"))]
    pub code: String,
    pub description: Option<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel, Validate, Deserialize)]
pub struct ChangeRoleStatus {
    pub id: i32,
    pub status: Status,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimpleRole {
    pub id: i32,
    pub code: String,
}

impl From<RoleModel> for SimpleRole {
    fn from(role: RoleModel) -> Self {
        Self {
            id: role.id,
            code: role.code,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel)]
#[sea_orm(active_model = "crate::entities::role_permission::ActiveModel")]
pub struct NewRolePermission {
    pub role_id: i32,
    pub permission_id: i32,
}

impl SeedableTrait for NewRolePermission {
    type ActiveModel = RolePermissionActiveModel;
    type Entity = RolePermissionEntity;

    fn get_active_model(&self) -> Self::ActiveModel {
        self.clone().into_active_model()
    }
}

/// One checkbox of the role/permission matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissionPair {
    #[validate(range(min = 1, message = "roleId is required"))]
    pub role_id: i32,
    #[validate(range(min = 1, message = "permissionId is required"))]
    pub permission_id: i32,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResult {
    pub role_id: i32,
    pub permission_id: i32,
    pub granted: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMatrix {
    pub roles: Vec<RoleInfo>,
    pub permissions: Vec<PermissionInfo>,
    pub grants: Vec<RolePermissionPair>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue::Set;

    #[test]
    fn test_grant_row_targets_join_table() {
        let active = NewRolePermission {
            role_id: 2,
            permission_id: 7,
        }
        .get_active_model();
        assert_eq!(active.role_id, Set(2));
        assert_eq!(active.permission_id, Set(7));
    }
}
