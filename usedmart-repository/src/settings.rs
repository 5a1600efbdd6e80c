use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, Order, QueryFilter, QueryOrder, TransactionTrait,
};
use usedmart_error::StorageResult;
use usedmart_models::{
    domain::prelude::{NewSystemSetting, SettingItem, SystemSettingInfo},
    entities::prelude::{SystemSetting, SystemSettingColumn},
};

/// Category of settings created through the admin API without one.
pub const DEFAULT_SETTING_CATEGORY: &str = "general";

pub struct SettingsRepository;

impl SettingsRepository {
    pub async fn find_all<C>(db: Option<&C>) -> StorageResult<Vec<SystemSettingInfo>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            SystemSetting::find()
                .order_by(SystemSettingColumn::Category, Order::Asc)
                .order_by(SystemSettingColumn::Key, Order::Asc)
                .into_partial_model::<SystemSettingInfo>()
                .all(conn)
                .await?
        }))
    }

    pub async fn find_public<C>(db: Option<&C>) -> StorageResult<Vec<SystemSettingInfo>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            SystemSetting::find()
                .filter(SystemSettingColumn::IsPublic.eq(true))
                .order_by(SystemSettingColumn::Key, Order::Asc)
                .into_partial_model::<SystemSettingInfo>()
                .all(conn)
                .await?
        }))
    }

    pub async fn find_by_key<C>(key: &str, db: Option<&C>) -> StorageResult<Option<SystemSettingInfo>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            SystemSetting::find_by_id(key.to_string())
                .into_partial_model::<SystemSettingInfo>()
                .one(conn)
                .await?
        }))
    }

    /// Every `(key, value)` pair, the input of `MarketSettings::from_pairs`.
    pub async fn find_pairs<C>(db: Option<&C>) -> StorageResult<Vec<(String, String)>>
    where
        C: ConnectionTrait,
    {
        Ok(Self::find_all(db)
            .await?
            .into_iter()
            .map(|s| (s.key, s.value))
            .collect())
    }

    /// Inserts new keys and updates existing ones in one transaction.
    /// Optional fields left out keep their stored value.
    pub async fn upsert<C>(items: Vec<SettingItem>, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        with_conn!(db, |conn| {
            let txn = conn.begin().await?;
            let mut written = 0;
            for item in &items {
                match SystemSetting::find_by_id(item.key.clone()).one(&txn).await? {
                    Some(existing) => {
                        let mut setting = existing.into_active_model();
                        setting.value = Set(item.value.clone());
                        if let Some(description) = &item.description {
                            setting.description = Set(Some(description.clone()));
                        }
                        if let Some(category) = &item.category {
                            setting.category = Set(category.clone());
                        }
                        if let Some(is_public) = item.is_public {
                            setting.is_public = Set(is_public);
                        }
                        setting.update(&txn).await?;
                    }
                    None => {
                        NewSystemSetting {
                            key: item.key.clone(),
                            value: item.value.clone(),
                            description: item.description.clone(),
                            category: item
                                .category
                                .clone()
                                .unwrap_or_else(|| DEFAULT_SETTING_CATEGORY.to_string()),
                            is_public: item.is_public.unwrap_or(false),
                        }
                        .into_active_model()
                        .insert(&txn)
                        .await?;
                    }
                }
                written += 1;
            }
            txn.commit().await?;
            Ok(written)
        })
    }

    pub async fn delete<C>(key: &str, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            SystemSetting::delete_by_id(key.to_string())
                .exec(conn)
                .await?
                .rows_affected
        }))
    }
}
