use sea_orm::DatabaseConnection;
use usedmart_models::settings::{Db, Inner, Settings, Sqlite};
use usedmart_storage::UMDbManager;

pub fn memory_settings() -> Settings {
    Settings::from_inner(Inner {
        db: Db {
            sqlite: Sqlite {
                path: ":memory:".into(),
                ..Default::default()
            },
        },
        ..Default::default()
    })
}

/// Fresh in-memory database with the schema and seed data applied.
pub async fn setup_db() -> DatabaseConnection {
    UMDbManager::connect(&memory_settings())
        .await
        .expect("in-memory database should migrate")
}
