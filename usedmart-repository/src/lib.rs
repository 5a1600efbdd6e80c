use sea_orm::DatabaseConnection;
use usedmart_common::UMAppContext;
use usedmart_error::storage::StorageError;
use usedmart_models::DbManager;
use usedmart_storage::UMDbManager;

/// Evaluates `$body` with `$conn` bound to the caller's connection, or to the
/// pooled connection when `$db` is `None`.
macro_rules! with_conn {
    ($db:expr, |$conn:ident| $body:expr) => {
        match $db {
            Some($conn) => $body,
            None => {
                let pooled = $crate::get_db_connection().await?;
                let $conn = &pooled;
                $body
            }
        }
    };
}

pub mod category;
pub mod favorite;
pub mod message;
pub mod order;
pub mod permission;
pub mod product;
pub mod profile;
pub mod role;
pub mod settings;
pub mod stats;

pub use category::CategoryRepository;
pub use favorite::FavoriteRepository;
pub use message::MessageRepository;
pub use order::OrderRepository;
pub use permission::PermissionRepository;
pub use product::{ProductRepository, ProductViewCounter};
pub use profile::ProfileRepository;
pub use role::RoleRepository;
pub use settings::{SettingsRepository, DEFAULT_SETTING_CATEGORY};
pub use stats::StatsRepository;

#[inline]
pub async fn get_db_connection() -> Result<DatabaseConnection, StorageError> {
    let ctx = UMAppContext::instance()
        .await
        .map_err(|_| StorageError::StorageUnavailable)?;
    ctx.db_manager()
        .map_err(|_| StorageError::StorageUnavailable)?
        .downcast_ref::<UMDbManager>()
        .ok_or(StorageError::StorageUnavailable)?
        .get_connection()
}
