use sea_orm::{
    prelude::Expr, sea_query::Condition, ActiveModelTrait, ColumnTrait, ConnectionTrait,
    EntityTrait, IntoActiveModel, Order, PaginatorTrait, QueryFilter, QueryOrder, QueryTrait,
};
use usedmart_error::StorageResult;
use usedmart_models::{
    domain::prelude::{MessageInfo, MessagePageParams, NewMessage, PageResult},
    entities::prelude::{Message, MessageColumn, MessageModel},
};

pub struct MessageRepository;

impl MessageRepository {
    pub async fn create<C>(message: NewMessage, db: Option<&C>) -> StorageResult<MessageModel>
    where
        C: ConnectionTrait,
    {
        let active = message.into_active_model();
        Ok(with_conn!(db, |conn| active.insert(conn).await?))
    }

    pub async fn delete<C>(id: i32, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Message::delete_by_id(id).exec(conn).await?.rows_affected
        }))
    }

    /// Every row the profile sent or received, newest first.
    pub async fn find_for_profile<C>(profile_id: i32, db: Option<&C>) -> StorageResult<Vec<MessageInfo>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Message::find()
                .filter(
                    Condition::any()
                        .add(MessageColumn::SenderId.eq(profile_id))
                        .add(MessageColumn::ReceiverId.eq(profile_id)),
                )
                .order_by(MessageColumn::CreatedAt, Order::Desc)
                .order_by(MessageColumn::Id, Order::Desc)
                .into_partial_model::<MessageInfo>()
                .all(conn)
                .await?
        }))
    }

    /// Both directions between two profiles about one product, oldest first.
    pub async fn find_thread<C>(
        profile_id: i32,
        counterpart_id: i32,
        product_id: i32,
        db: Option<&C>,
    ) -> StorageResult<Vec<MessageInfo>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Message::find()
                .filter(MessageColumn::ProductId.eq(product_id))
                .filter(
                    Condition::any()
                        .add(
                            Condition::all()
                                .add(MessageColumn::SenderId.eq(profile_id))
                                .add(MessageColumn::ReceiverId.eq(counterpart_id)),
                        )
                        .add(
                            Condition::all()
                                .add(MessageColumn::SenderId.eq(counterpart_id))
                                .add(MessageColumn::ReceiverId.eq(profile_id)),
                        ),
                )
                .order_by(MessageColumn::CreatedAt, Order::Asc)
                .order_by(MessageColumn::Id, Order::Asc)
                .into_partial_model::<MessageInfo>()
                .all(conn)
                .await?
        }))
    }

    pub async fn mark_read<C>(ids: Vec<i32>, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(0);
        }
        Ok(with_conn!(db, |conn| {
            Message::update_many()
                .col_expr(MessageColumn::IsRead, Expr::value(true))
                .filter(MessageColumn::Id.is_in(ids))
                .exec(conn)
                .await?
                .rows_affected
        }))
    }

    pub async fn count_unread<C>(receiver_id: i32, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Message::find()
                .filter(MessageColumn::ReceiverId.eq(receiver_id))
                .filter(MessageColumn::IsRead.eq(false))
                .count(conn)
                .await?
        }))
    }

    pub async fn page<C>(
        params: MessagePageParams,
        db: Option<&C>,
    ) -> StorageResult<PageResult<MessageInfo>>
    where
        C: ConnectionTrait,
    {
        let query = Message::find()
            .apply_if(params.product_id, |q, product_id| {
                q.filter(MessageColumn::ProductId.eq(product_id))
            })
            .apply_if(params.sender_id, |q, sender_id| {
                q.filter(MessageColumn::SenderId.eq(sender_id))
            })
            .apply_if(params.receiver_id, |q, receiver_id| {
                q.filter(MessageColumn::ReceiverId.eq(receiver_id))
            })
            .apply_if(params.content.as_ref(), |q, content| {
                q.filter(MessageColumn::Content.like(format!("%{content}%")))
            })
            .apply_if(params.time_range.start_time, |q, start_time| {
                q.filter(MessageColumn::CreatedAt.gte(start_time))
            })
            .apply_if(params.time_range.end_time, |q, end_time| {
                q.filter(MessageColumn::CreatedAt.lte(end_time))
            })
            .order_by(MessageColumn::CreatedAt, Order::Desc)
            .order_by(MessageColumn::Id, Order::Desc);
        let (page, page_size) = (params.page.page(), params.page.page_size());

        with_conn!(db, |conn| {
            let total = query.clone().count(conn).await?;
            let records = query
                .into_partial_model::<MessageInfo>()
                .paginate(conn, page_size as u64)
                .fetch_page((page - 1) as u64)
                .await?;
            Ok(PageResult::new(records, total, page, page_size))
        })
    }

    pub async fn count<C>(db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Message::find().count(conn).await?))
    }
}
