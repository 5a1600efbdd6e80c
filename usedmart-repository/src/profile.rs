use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QueryTrait,
};
use usedmart_error::StorageResult;
use usedmart_models::{
    domain::prelude::{PageResult, ProfileBrief, ProfileInfo, ProfilePageParams},
    entities::prelude::{Profile, ProfileActiveModel, ProfileColumn, ProfileModel},
};

pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn create<C>(profile: ProfileActiveModel, db: Option<&C>) -> StorageResult<ProfileModel>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| profile.insert(conn).await?))
    }

    pub async fn update<C>(profile: ProfileActiveModel, db: Option<&C>) -> StorageResult<ProfileModel>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| profile.update(conn).await?))
    }

    pub async fn delete<C>(id: i32, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Profile::delete_by_id(id).exec(conn).await?.rows_affected
        }))
    }

    pub async fn find_by_id<C>(id: i32, db: Option<&C>) -> StorageResult<Option<ProfileModel>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Profile::find_by_id(id).one(conn).await?))
    }

    pub async fn find_by_username<C>(
        username: &str,
        db: Option<&C>,
    ) -> StorageResult<Option<ProfileModel>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Profile::find()
                .filter(ProfileColumn::Username.eq(username))
                .one(conn)
                .await?
        }))
    }

    pub async fn find_info<C>(id: i32, db: Option<&C>) -> StorageResult<Option<ProfileInfo>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Profile::find_by_id(id)
                .into_partial_model::<ProfileInfo>()
                .one(conn)
                .await?
        }))
    }

    pub async fn find_brief<C>(id: i32, db: Option<&C>) -> StorageResult<Option<ProfileBrief>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Profile::find_by_id(id)
                .into_partial_model::<ProfileBrief>()
                .one(conn)
                .await?
        }))
    }

    pub async fn find_briefs<C>(ids: Vec<i32>, db: Option<&C>) -> StorageResult<Vec<ProfileBrief>>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(with_conn!(db, |conn| {
            Profile::find()
                .filter(ProfileColumn::Id.is_in(ids))
                .into_partial_model::<ProfileBrief>()
                .all(conn)
                .await?
        }))
    }

    pub async fn page<C>(
        params: ProfilePageParams,
        db: Option<&C>,
    ) -> StorageResult<PageResult<ProfileInfo>>
    where
        C: ConnectionTrait,
    {
        let query = Profile::find()
            .apply_if(params.username.as_ref(), |q, username| {
                q.filter(ProfileColumn::Username.like(format!("%{username}%")))
            })
            .apply_if(params.email.as_ref(), |q, email| {
                q.filter(ProfileColumn::Email.like(format!("%{email}%")))
            })
            .apply_if(params.status, |q, status| {
                q.filter(ProfileColumn::Status.eq(status))
            })
            .apply_if(params.role_id, |q, role_id| {
                q.filter(ProfileColumn::RoleId.eq(role_id))
            })
            .apply_if(params.time_range.start_time, |q, start_time| {
                q.filter(ProfileColumn::CreatedAt.gte(start_time))
            })
            .apply_if(params.time_range.end_time, |q, end_time| {
                q.filter(ProfileColumn::CreatedAt.lte(end_time))
            })
            .order_by(ProfileColumn::CreatedAt, Order::Desc)
            .order_by(ProfileColumn::Id, Order::Desc);
        let (page, page_size) = (params.page.page(), params.page.page_size());

        with_conn!(db, |conn| {
            let total = query.clone().count(conn).await?;
            let records = query
                .into_partial_model::<ProfileInfo>()
                .paginate(conn, page_size as u64)
                .fetch_page((page - 1) as u64)
                .await?;
            Ok(PageResult::new(records, total, page, page_size))
        })
    }

    pub async fn exists_by_id<C>(id: i32, db: Option<&C>) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Profile::find_by_id(id).count(conn).await? > 0))
    }

    pub async fn exists_by_username<C>(username: &str, db: Option<&C>) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Profile::find()
                .filter(ProfileColumn::Username.eq(username))
                .count(conn)
                .await?
                > 0
        }))
    }

    pub async fn count<C>(db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Profile::find().count(conn).await?))
    }
}
