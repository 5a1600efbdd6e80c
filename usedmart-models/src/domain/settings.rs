use crate::{
    entities::system_settings::{ActiveModel, Entity as SystemSettingEntity, Model as SystemSettingModel},
    initializer::SeedableTrait,
};
use chrono::{DateTime, Utc};
use sea_orm::{DeriveIntoActiveModel, DerivePartialModel, FromQueryResult, IntoActiveModel};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, DerivePartialModel, FromQueryResult)]
#[serde(rename_all = "camelCase")]
#[sea_orm(entity = "SystemSettingEntity")]
pub struct SystemSettingInfo {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub category: String,
    pub is_public: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<SystemSettingModel> for SystemSettingInfo {
    fn from(s: SystemSettingModel) -> Self {
        Self {
            key: s.key,
            value: s.value,
            description: s.description,
            category: s.category,
            is_public: s.is_public,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SettingItem {
    #[validate(length(min = 1, max = 64, message = "key must be 1-64 characters"))]
    pub key: String,
    #[validate(length(max = 4096, message = "value is too long"))]
    pub value: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_public: Option<bool>,
}

/// Batch upsert body for `PUT /settings`.
#[derive(Clone, Debug, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSettings {
    #[validate(length(min = 1, message = "at least one setting is required"), nested)]
    pub items: Vec<SettingItem>,
}

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel)]
pub struct NewSystemSetting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub category: String,
    pub is_public: bool,
}

impl SeedableTrait for NewSystemSetting {
    type ActiveModel = ActiveModel;
    type Entity = SystemSettingEntity;

    fn get_active_model(&self) -> Self::ActiveModel {
        self.clone().into_active_model()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SettingKeyPath {
    #[validate(length(min = 1, max = 64, message = "key must be 1-64 characters"))]
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str) -> SettingItem {
        SettingItem {
            key: key.into(),
            value: "on".into(),
            description: None,
            category: None,
            is_public: None,
        }
    }

    #[test]
    fn test_batch_validates_each_item() {
        let ok = UpsertSettings {
            items: vec![item("maintenance_mode")],
        };
        assert!(ok.validate().is_ok());

        let bad = UpsertSettings {
            items: vec![item("currency"), item("")],
        };
        assert!(bad.validate().is_err());
        assert!(UpsertSettings { items: vec![] }.validate().is_err());
    }
}
