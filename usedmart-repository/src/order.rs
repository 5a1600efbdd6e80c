use crate::ProductRepository;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, Order as SortOrder, PaginatorTrait, QueryFilter, QueryOrder, QueryTrait,
    TransactionTrait,
};
use tracing::info;
use usedmart_error::StorageResult;
use usedmart_models::{
    domain::prelude::{NewOrder, OrderFilter, OrderInfo, PageResult},
    entities::prelude::{Order, OrderActiveModel, OrderColumn, OrderModel},
    enums::{order::OrderStatus, product::ProductStatus},
};

pub struct OrderRepository;

impl OrderRepository {
    pub async fn create<C>(order: NewOrder, db: Option<&C>) -> StorageResult<OrderModel>
    where
        C: ConnectionTrait,
    {
        let active = order.into_active_model();
        Ok(with_conn!(db, |conn| active.insert(conn).await?))
    }

    pub async fn find_by_id<C>(id: i32, db: Option<&C>) -> StorageResult<Option<OrderModel>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Order::find_by_id(id).one(conn).await?))
    }

    pub async fn page<C>(filter: OrderFilter, db: Option<&C>) -> StorageResult<PageResult<OrderInfo>>
    where
        C: ConnectionTrait,
    {
        let query = Order::find()
            .apply_if(filter.buyer_id, |q, buyer_id| {
                q.filter(OrderColumn::BuyerId.eq(buyer_id))
            })
            .apply_if(filter.seller_id, |q, seller_id| {
                q.filter(OrderColumn::SellerId.eq(seller_id))
            })
            .apply_if(filter.product_id, |q, product_id| {
                q.filter(OrderColumn::ProductId.eq(product_id))
            })
            .apply_if(filter.status, |q, status| {
                q.filter(OrderColumn::Status.eq(status))
            })
            .apply_if(filter.time_range.start_time, |q, start_time| {
                q.filter(OrderColumn::CreatedAt.gte(start_time))
            })
            .apply_if(filter.time_range.end_time, |q, end_time| {
                q.filter(OrderColumn::CreatedAt.lte(end_time))
            })
            .order_by(OrderColumn::CreatedAt, SortOrder::Desc)
            .order_by(OrderColumn::Id, SortOrder::Desc);
        let (page, page_size) = (filter.page.page(), filter.page.page_size());

        with_conn!(db, |conn| {
            let total = query.clone().count(conn).await?;
            let records = query
                .into_partial_model::<OrderInfo>()
                .paginate(conn, page_size as u64)
                .fetch_page((page - 1) as u64)
                .await?;
            Ok(PageResult::new(records, total, page, page_size))
        })
    }

    /// Moves the order to `status`. When `product_status` is given the
    /// order's product is moved with it, atomically, and only if the product
    /// is still active. Otherwise nothing is written and
    /// `StorageError::InvalidState` is returned.
    pub async fn update_status<C>(
        order: OrderModel,
        status: OrderStatus,
        product_status: Option<ProductStatus>,
        db: Option<&C>,
    ) -> StorageResult<OrderModel>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let (order_id, product_id) = (order.id, order.product_id);
        let mut active: OrderActiveModel = order.into_active_model();
        active.status = Set(status);

        with_conn!(db, |conn| {
            let txn = conn.begin().await?;
            if let Some(product_status) = product_status {
                ProductRepository::transition_status(
                    product_id,
                    &[ProductStatus::Active],
                    product_status,
                    Some(&txn),
                )
                .await?;
            }
            let updated = active.update(&txn).await?;
            txn.commit().await?;
            info!(order_id, %status, "Order status changed");
            Ok(updated)
        })
    }

    pub async fn count<C>(db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Order::find().count(conn).await?))
    }

    pub async fn count_by_status<C>(status: OrderStatus, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Order::find()
                .filter(OrderColumn::Status.eq(status))
                .count(conn)
                .await?
        }))
    }
}
