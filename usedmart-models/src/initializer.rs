use crate::idens;
use async_trait::async_trait;
use sea_orm::{
    sea_query::{IndexCreateStatement, TableCreateStatement, TableDropStatement},
    ActiveModelTrait, DatabaseBackend, DatabaseTransaction, DbErr, EntityTrait,
};
use std::{any::Any, collections::HashMap};
use usedmart_error::{init::InitContextError, UMError, UMResult};

/// One table of the schema: DDL plus optional seed rows.
///
/// Implemented by the iden enums through `SeedableInitializer` /
/// `UnseedableInitializer`.
#[async_trait]
pub trait UMInitializer: Send + Sync {
    fn order(&self) -> i32;

    fn name(&self) -> &str;

    /// Whether the table carries an `updated_at` column that needs a trigger.
    fn has_update_col(&self) -> bool;

    fn to_create_table_stmt(&self, backend: DatabaseBackend) -> TableCreateStatement;

    fn to_drop_table_stmt(&self, backend: DatabaseBackend) -> TableDropStatement;

    fn to_create_indexes_stmt(&self, backend: DatabaseBackend)
        -> Option<Vec<IndexCreateStatement>>;

    async fn seeding_data(
        &self,
        transaction: &DatabaseTransaction,
        ctx: &mut InitContext,
    ) -> Result<(), DbErr>;
}

pub trait SeedableTrait: Send + Sync + 'static {
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>;
    type Entity: EntityTrait;

    fn get_active_model(&self) -> Self::ActiveModel;
}

#[async_trait]
pub trait DataSeederTrait<T: SeedableTrait + Clone> {
    async fn get_seed_data(&self, ctx: &mut InitContext) -> Result<Option<Vec<T>>, DbErr>;
}

#[async_trait]
pub trait SeedableInitializerTrait<T: SeedableTrait + Clone>:
    UMInitializer + DataSeederTrait<T>
{
    /// Inserts the seed rows and publishes them to `ctx` under the table name
    /// so later initializers can reference their ids.
    async fn seed_data(
        &self,
        transaction: &DatabaseTransaction,
        ctx: &mut InitContext,
    ) -> Result<(), DbErr> {
        let Some(rows) = self.get_seed_data(ctx).await? else {
            return Ok(());
        };
        if rows.is_empty() {
            return Ok(());
        }

        let active_models: Vec<T::ActiveModel> =
            rows.iter().map(SeedableTrait::get_active_model).collect();
        T::Entity::insert_many(active_models).exec(transaction).await?;

        tracing::debug!(table = self.name(), rows = rows.len(), "seeded");
        ctx.set(self.name(), rows);
        Ok(())
    }
}

/// Every table in creation order. Referenced tables come first.
pub fn initializers() -> Vec<Box<dyn UMInitializer>> {
    let mut initializers: Vec<Box<dyn UMInitializer>> = vec![
        Box::new(idens::system_settings::SystemSettings::Table),
        Box::new(idens::roles::Roles::Table),
        Box::new(idens::permissions::Permissions::Table),
        Box::new(idens::role_permissions::RolePermissions::Table),
        Box::new(idens::profiles::Profiles::Table),
        Box::new(idens::categories::Categories::Table),
        Box::new(idens::products::Products::Table),
        Box::new(idens::orders::Orders::Table),
        Box::new(idens::messages::Messages::Table),
        Box::new(idens::favorites::Favorites::Table),
    ];

    initializers.sort_by_key(|init| init.order());
    initializers
}

/// Seed rows shared between initializers, keyed by table name.
#[derive(Default)]
pub struct InitContext {
    data: HashMap<String, Vec<Box<dyn Any + Send + Sync>>>,
}

impl InitContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: 'static + Send + Sync>(&mut self, key: &str, values: Vec<T>) {
        let boxed = values
            .into_iter()
            .map(|v| Box::new(v) as Box<dyn Any + Send + Sync>)
            .collect();
        self.data.insert(key.into(), boxed);
    }

    /// Fails when `key` was never seeded or holds a different type.
    pub fn get<T: 'static>(&self, key: &str) -> UMResult<Vec<&T>> {
        let values = self
            .data
            .get(key)
            .ok_or_else(|| UMError::InitContextError(InitContextError::KeyNotFound(key.into())))?;

        values
            .iter()
            .map(|value| {
                value.downcast_ref::<T>().ok_or_else(|| {
                    UMError::InitContextError(InitContextError::TypeMismatch(key.into()))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_roundtrip_and_mismatch() {
        let mut ctx = InitContext::new();
        ctx.set("roles", vec![1_i32, 2, 3]);

        let ids = ctx.get::<i32>("roles").unwrap();
        assert_eq!(ids.into_iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(matches!(
            ctx.get::<String>("roles"),
            Err(UMError::InitContextError(InitContextError::TypeMismatch(_)))
        ));
        assert!(matches!(
            ctx.get::<i32>("missing"),
            Err(UMError::InitContextError(InitContextError::KeyNotFound(_)))
        ));
    }

    #[test]
    fn test_initializers_are_ordered() {
        let names: Vec<String> = initializers().iter().map(|i| i.name().to_string()).collect();
        let pos = |n: &str| names.iter().position(|x| x == n).unwrap();
        assert!(pos("roles") < pos("role_permissions"));
        assert!(pos("permissions") < pos("role_permissions"));
        assert!(pos("roles") < pos("profiles"));
        assert!(pos("profiles") < pos("products"));
        assert!(pos("categories") < pos("products"));
        assert!(pos("products") < pos("messages"));
        assert_eq!(names.len(), 10);
    }
}
