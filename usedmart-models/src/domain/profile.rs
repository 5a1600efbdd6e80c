use super::common::{PageParams, TimeRangeParams};
use crate::{
    domain::role::SimpleRole,
    entities::profile::{ActiveModel, Entity as ProfileEntity, Model as ProfileModel},
    enums::common::Status,
    initializer::SeedableTrait,
};
use chrono::{DateTime, Utc};
use sea_orm::{DeriveIntoActiveModel, DerivePartialModel, FromQueryResult, IntoActiveModel};
use serde::{Deserialize, Serialize};
use serde_aux::prelude::*;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePageParams {
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub status: Option<i16>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub role_id: Option<i32>,
    #[serde(flatten)]
    #[validate(nested)]
    pub page: PageParams,
    #[serde(flatten)]
    #[validate(nested)]
    pub time_range: TimeRangeParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, DerivePartialModel, FromQueryResult)]
#[serde(rename_all = "camelCase")]
#[sea_orm(entity = "ProfileEntity")]
pub struct ProfileInfo {
    pub id: i32,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub role_id: Option<i32>,
    pub status: Status,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ProfileModel> for ProfileInfo {
    fn from(profile: ProfileModel) -> Self {
        ProfileInfo {
            id: profile.id,
            username: profile.username,
            full_name: profile.full_name,
            email: profile.email,
            phone: profile.phone,
            avatar_url: profile.avatar_url,
            bio: profile.bio,
            location: profile.location,
            role_id: profile.role_id,
            status: profile.status,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Public face of a profile shown next to listings and messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, DerivePartialModel, FromQueryResult)]
#[serde(rename_all = "camelCase")]
#[sea_orm(entity = "ProfileEntity")]
pub struct ProfileBrief {
    pub id: i32,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
}

/// The caller's own profile with its authorization snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetail {
    #[serde(flatten)]
    pub profile: ProfileInfo,
    pub role: Option<SimpleRole>,
    pub permissions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, DeriveIntoActiveModel, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    #[validate(length(min = 3, max = 64, message = "username must be 3-64 characters"))]
    pub username: String,
    #[validate(length(min = 6, max = 128, message = "password must be at least 6 characters"))]
    pub password: String,
    pub full_name: Option<String>,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(url(message = "invalid avatar url"))]
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub role_id: Option<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, DeriveIntoActiveModel)]
pub struct NewProfileWithId {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<i32>,
}

impl SeedableTrait for NewProfileWithId {
    type ActiveModel = ActiveModel;
    type Entity = ProfileEntity;

    fn get_active_model(&self) -> Self::ActiveModel {
        self.clone().into_active_model()
    }
}

/// Self-service profile edit. The id comes from the bearer token.
#[derive(Clone, Debug, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMyProfile {
    pub full_name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub avatar_url: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub location: Option<Option<String>>,
}

impl UpdateMyProfile {
    pub fn with_id(self, id: i32) -> UpdateProfile {
        UpdateProfile {
            id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            avatar_url: self.avatar_url,
            bio: self.bio,
            location: self.location,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub id: i32,
    pub full_name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub avatar_url: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub location: Option<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    #[serde(default)]
    #[validate(required(message = "Old password is required"))]
    pub old_password: Option<String>,
    #[serde(default)]
    #[validate(
        required(message = "New password is required"),
        length(min = 6, max = 128, message = "password must be at least 6 characters")
    )]
    pub new_password: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel)]
pub struct ChangeProfilePassword {
    pub id: i32,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel, Validate, Deserialize)]
pub struct ChangeProfileStatus {
    pub id: i32,
    pub status: Status,
}

/// `roleId: null` removes the role.
#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignProfileRole {
    pub id: i32,
    pub role_id: Option<i32>,
}
