use crate::ProductRepository;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, Order,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;
use usedmart_error::StorageResult;
use usedmart_models::{
    domain::prelude::{FavoriteInfo, FavoriteProduct, NewFavorite, PageParams, PageResult},
    entities::prelude::{Favorite, FavoriteColumn},
};

pub struct FavoriteRepository;

impl FavoriteRepository {
    /// Returns `false` when the product was already a favorite.
    pub async fn add<C>(profile_id: i32, product_id: i32, db: Option<&C>) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        let inserted = with_conn!(db, |conn| {
            Favorite::insert(
                NewFavorite {
                    profile_id,
                    product_id,
                }
                .into_active_model(),
            )
            .on_conflict(
                OnConflict::columns([FavoriteColumn::ProfileId, FavoriteColumn::ProductId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?
        });
        Ok(inserted > 0)
    }

    pub async fn remove<C>(profile_id: i32, product_id: i32, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Favorite::delete_many()
                .filter(FavoriteColumn::ProfileId.eq(profile_id))
                .filter(FavoriteColumn::ProductId.eq(product_id))
                .exec(conn)
                .await?
                .rows_affected
        }))
    }

    pub async fn exists<C>(profile_id: i32, product_id: i32, db: Option<&C>) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Favorite::find()
                .filter(FavoriteColumn::ProfileId.eq(profile_id))
                .filter(FavoriteColumn::ProductId.eq(product_id))
                .count(conn)
                .await?
                > 0
        }))
    }

    /// The profile's favorites with their listings, most recently added first.
    pub async fn page_products<C>(
        profile_id: i32,
        params: PageParams,
        db: Option<&C>,
    ) -> StorageResult<PageResult<FavoriteProduct>>
    where
        C: ConnectionTrait,
    {
        let query = Favorite::find()
            .filter(FavoriteColumn::ProfileId.eq(profile_id))
            .order_by(FavoriteColumn::CreatedAt, Order::Desc)
            .order_by(FavoriteColumn::Id, Order::Desc);
        let (page, page_size) = (params.page(), params.page_size());

        let (favorites, total): (Vec<FavoriteInfo>, u64) = with_conn!(db, |conn| {
            let total = query.clone().count(conn).await?;
            let favorites = query
                .into_partial_model::<FavoriteInfo>()
                .paginate(conn, page_size as u64)
                .fetch_page((page - 1) as u64)
                .await?;
            (favorites, total)
        });

        let ids = favorites.iter().map(|f| f.product_id).collect();
        let mut products: HashMap<i32, _> = ProductRepository::find_infos(ids, db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let records = favorites
            .into_iter()
            .filter_map(|f| {
                products.remove(&f.product_id).map(|product| FavoriteProduct {
                    favorited_at: f.created_at,
                    product,
                })
            })
            .collect();
        Ok(PageResult::new(records, total, page, page_size))
    }

    pub async fn count<C>(db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Favorite::find().count(conn).await?))
    }
}
