use crate::{
    CategoryRepository, FavoriteRepository, MessageRepository, OrderRepository,
    PermissionRepository, ProductRepository, ProfileRepository, RoleRepository,
};
use sea_orm::{ConnectionTrait, Iterable};
use usedmart_error::StorageResult;
use usedmart_models::{
    domain::prelude::MarketStats,
    enums::{order::OrderStatus, product::ProductStatus},
};

pub struct StatsRepository;

impl StatsRepository {
    pub async fn collect<C>(db: Option<&C>) -> StorageResult<MarketStats>
    where
        C: ConnectionTrait,
    {
        let mut stats = MarketStats {
            total_profiles: ProfileRepository::count(db).await?,
            total_products: ProductRepository::count(db).await?,
            total_orders: OrderRepository::count(db).await?,
            completed_orders: OrderRepository::count_by_status(OrderStatus::Completed, db).await?,
            total_messages: MessageRepository::count(db).await?,
            total_categories: CategoryRepository::count(db).await?,
            total_favorites: FavoriteRepository::count(db).await?,
            total_roles: RoleRepository::count(db).await?,
            total_permissions: PermissionRepository::count(db).await?,
            ..Default::default()
        };

        for status in ProductStatus::iter() {
            let count = ProductRepository::count_by_status(status, db).await?;
            match status {
                ProductStatus::Active => stats.active_products = count,
                ProductStatus::Pending => stats.pending_products = count,
                ProductStatus::Sold => stats.sold_products = count,
                _ => {}
            }
            stats
                .products_by_status
                .insert(status.as_str().to_string(), count);
        }
        Ok(stats)
    }
}
