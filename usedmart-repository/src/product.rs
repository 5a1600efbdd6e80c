use async_trait::async_trait;
use sea_orm::{
    prelude::Expr, sea_query::Condition, ActiveModelTrait, ActiveValue::Set, ColumnTrait,
    ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QueryTrait, Select,
};
use std::sync::Arc;
use tracing::debug;
use usedmart_core::ViewCounter;
use usedmart_error::{storage::StorageError, StorageResult};
use usedmart_models::{
    cache::UMBaseCache,
    domain::prelude::{NewProduct, PageResult, ProductBrief, ProductFilter, ProductInfo},
    entities::prelude::{Product, ProductActiveModel, ProductColumn, ProductModel},
    enums::product::{ProductSort, ProductStatus},
};

/// Statuses that occupy one of the seller's listing slots.
pub const OPEN_LISTING_STATUSES: [ProductStatus; 3] = [
    ProductStatus::Pending,
    ProductStatus::Active,
    ProductStatus::Inactive,
];

pub struct ProductRepository;

impl ProductRepository {
    pub async fn create<C>(product: NewProduct, db: Option<&C>) -> StorageResult<ProductModel>
    where
        C: ConnectionTrait,
    {
        let active = product.into_active_model();
        Ok(with_conn!(db, |conn| active.insert(conn).await?))
    }

    pub async fn update<C>(product: ProductActiveModel, db: Option<&C>) -> StorageResult<ProductModel>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| product.update(conn).await?))
    }

    /// `rejection_reason` is left untouched when `None`.
    pub async fn update_status<C>(
        id: i32,
        status: ProductStatus,
        rejection_reason: Option<Option<String>>,
        db: Option<&C>,
    ) -> StorageResult<ProductModel>
    where
        C: ConnectionTrait,
    {
        let mut product = ProductActiveModel {
            id: Set(id),
            status: Set(status),
            ..Default::default()
        };
        if let Some(reason) = rejection_reason {
            product.rejection_reason = Set(reason);
        }
        Ok(with_conn!(db, |conn| product.update(conn).await?))
    }

    /// Moves the product to `status` only while it is still in one of
    /// `from`. The check and the write are one statement, so two callers
    /// racing for the same listing cannot both win.
    pub async fn transition_status<C>(
        id: i32,
        from: &[ProductStatus],
        status: ProductStatus,
        db: Option<&C>,
    ) -> StorageResult<()>
    where
        C: ConnectionTrait,
    {
        let result = with_conn!(db, |conn| {
            Product::update_many()
                .col_expr(ProductColumn::Status, Expr::value(status))
                .filter(ProductColumn::Id.eq(id))
                .filter(ProductColumn::Status.is_in(from.iter().copied()))
                .exec(conn)
                .await?
        });
        if result.rows_affected == 0 {
            return Err(StorageError::InvalidState(format!(
                "product {id} is no longer {}",
                from.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(" or ")
            )));
        }
        Ok(())
    }

    pub async fn update_view_count<C>(id: i32, count: i64, db: Option<&C>) -> StorageResult<()>
    where
        C: ConnectionTrait,
    {
        let result = with_conn!(db, |conn| {
            Product::update_many()
                .col_expr(ProductColumn::ViewCount, Expr::value(count))
                .filter(ProductColumn::Id.eq(id))
                .exec(conn)
                .await?
        });
        if result.rows_affected == 0 {
            return Err(StorageError::EntityNotFound(format!("product {id}")));
        }
        Ok(())
    }

    pub async fn delete<C>(id: i32, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Product::delete_by_id(id).exec(conn).await?.rows_affected
        }))
    }

    pub async fn find_by_id<C>(id: i32, db: Option<&C>) -> StorageResult<Option<ProductModel>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Product::find_by_id(id).one(conn).await?))
    }

    pub async fn find_briefs<C>(ids: Vec<i32>, db: Option<&C>) -> StorageResult<Vec<ProductBrief>>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(with_conn!(db, |conn| {
            Product::find()
                .filter(ProductColumn::Id.is_in(ids))
                .into_partial_model::<ProductBrief>()
                .all(conn)
                .await?
        }))
    }

    pub async fn find_infos<C>(ids: Vec<i32>, db: Option<&C>) -> StorageResult<Vec<ProductInfo>>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(with_conn!(db, |conn| {
            Product::find()
                .filter(ProductColumn::Id.is_in(ids))
                .into_partial_model::<ProductInfo>()
                .all(conn)
                .await?
        }))
    }

    pub async fn page<C>(filter: ProductFilter, db: Option<&C>) -> StorageResult<PageResult<ProductInfo>>
    where
        C: ConnectionTrait,
    {
        let (page, page_size) = (filter.page.page(), filter.page.page_size());
        let query = Self::filtered(filter);

        with_conn!(db, |conn| {
            let total = query.clone().count(conn).await?;
            let records = query
                .into_partial_model::<ProductInfo>()
                .paginate(conn, page_size as u64)
                .fetch_page((page - 1) as u64)
                .await?;
            Ok(PageResult::new(records, total, page, page_size))
        })
    }

    fn filtered(filter: ProductFilter) -> Select<Product> {
        let query = Product::find()
            .apply_if(filter.statuses, |q, statuses| {
                q.filter(ProductColumn::Status.is_in(statuses))
            })
            .apply_if(filter.category_ids, |q, ids| {
                q.filter(ProductColumn::CategoryId.is_in(ids))
            })
            .apply_if(
                filter.search.filter(|s| !s.trim().is_empty()),
                |q, search| {
                    let pattern = format!("%{}%", search.trim());
                    q.filter(
                        Condition::any()
                            .add(ProductColumn::Title.like(pattern.clone()))
                            .add(ProductColumn::Description.like(pattern)),
                    )
                },
            )
            .apply_if(filter.condition, |q, condition| {
                q.filter(ProductColumn::Condition.eq(condition))
            })
            .apply_if(filter.min_price, |q, min| q.filter(ProductColumn::Price.gte(min)))
            .apply_if(filter.max_price, |q, max| q.filter(ProductColumn::Price.lte(max)))
            .apply_if(filter.seller_id, |q, seller_id| {
                q.filter(ProductColumn::SellerId.eq(seller_id))
            })
            .apply_if(filter.time_range.start_time, |q, start_time| {
                q.filter(ProductColumn::CreatedAt.gte(start_time))
            })
            .apply_if(filter.time_range.end_time, |q, end_time| {
                q.filter(ProductColumn::CreatedAt.lte(end_time))
            });

        match filter.sort {
            ProductSort::Newest => query
                .order_by(ProductColumn::CreatedAt, Order::Desc)
                .order_by(ProductColumn::Id, Order::Desc),
            ProductSort::Oldest => query
                .order_by(ProductColumn::CreatedAt, Order::Asc)
                .order_by(ProductColumn::Id, Order::Asc),
            ProductSort::PriceAsc => query
                .order_by(ProductColumn::Price, Order::Asc)
                .order_by(ProductColumn::Id, Order::Desc),
            ProductSort::PriceDesc => query
                .order_by(ProductColumn::Price, Order::Desc)
                .order_by(ProductColumn::Id, Order::Desc),
            ProductSort::Popular => query
                .order_by(ProductColumn::ViewCount, Order::Desc)
                .order_by(ProductColumn::Id, Order::Desc),
        }
    }

    /// Listings that count against `max_products_per_user`.
    pub async fn count_open_by_seller<C>(seller_id: i32, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Product::find()
                .filter(ProductColumn::SellerId.eq(seller_id))
                .filter(ProductColumn::Status.is_in(OPEN_LISTING_STATUSES))
                .count(conn)
                .await?
        }))
    }

    pub async fn count_by_status<C>(status: ProductStatus, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Product::find()
                .filter(ProductColumn::Status.eq(status))
                .count(conn)
                .await?
        }))
    }

    pub async fn count<C>(db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Product::find().count(conn).await?))
    }
}

/// Writes counted views to `products.view_count` and into the product view
/// cache. The cached count is the base for the next increment.
pub struct ProductViewCounter {
    cache: Arc<dyn UMBaseCache<Value = i64> + Send + Sync>,
    db: Option<DatabaseConnection>,
}

impl ProductViewCounter {
    /// With `db` unset the pooled connection is used.
    pub fn new(
        cache: Arc<dyn UMBaseCache<Value = i64> + Send + Sync>,
        db: Option<DatabaseConnection>,
    ) -> Self {
        Self { cache, db }
    }
}

#[async_trait]
impl ViewCounter for ProductViewCounter {
    async fn store_view_count(&self, product_id: i32, count: i64) -> StorageResult<()> {
        ProductRepository::update_view_count(product_id, count, self.db.as_ref()).await?;
        self.cache.set(product_id.to_string(), count).await?;
        debug!(product_id, count, "View count stored");
        Ok(())
    }

    async fn cached_view_count(&self, product_id: i32) -> StorageResult<Option<i64>> {
        self.cache.get(product_id.to_string()).await
    }
}
