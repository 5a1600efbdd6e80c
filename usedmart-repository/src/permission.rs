use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QueryTrait,
};
use usedmart_error::StorageResult;
use usedmart_models::{
    domain::prelude::{PageResult, PermissionInfo, PermissionPageParams},
    entities::prelude::{Permission, PermissionActiveModel, PermissionColumn, PermissionModel},
};

pub struct PermissionRepository;

impl PermissionRepository {
    pub async fn create<C>(
        permission: PermissionActiveModel,
        db: Option<&C>,
    ) -> StorageResult<PermissionModel>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| permission.insert(conn).await?))
    }

    pub async fn update<C>(permission: PermissionActiveModel, db: Option<&C>) -> StorageResult<()>
    where
        C: ConnectionTrait,
    {
        with_conn!(db, |conn| {
            let _ = permission.update(conn).await?;
        });
        Ok(())
    }

    pub async fn delete<C>(id: i32, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Permission::delete_by_id(id).exec(conn).await?.rows_affected
        }))
    }

    /// Grouped by resource, the layout of the matrix columns.
    pub async fn find_all<C>(db: Option<&C>) -> StorageResult<Vec<PermissionInfo>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Permission::find()
                .order_by(PermissionColumn::Resource, Order::Asc)
                .order_by(PermissionColumn::Id, Order::Asc)
                .into_partial_model::<PermissionInfo>()
                .all(conn)
                .await?
        }))
    }

    pub async fn page<C>(
        params: PermissionPageParams,
        db: Option<&C>,
    ) -> StorageResult<PageResult<PermissionInfo>>
    where
        C: ConnectionTrait,
    {
        let query = Permission::find()
            .apply_if(params.code.as_ref(), |q, code| {
                q.filter(PermissionColumn::Code.like(format!("%{code}%")))
            })
            .apply_if(params.resource, |q, resource| {
                q.filter(PermissionColumn::Resource.eq(resource))
            })
            .order_by(PermissionColumn::Id, Order::Asc);
        let (page, page_size) = (params.page.page(), params.page.page_size());

        with_conn!(db, |conn| {
            let total = query.clone().count(conn).await?;
            let records = query
                .into_partial_model::<PermissionInfo>()
                .paginate(conn, page_size as u64)
                .fetch_page((page - 1) as u64)
                .await?;
            Ok(PageResult::new(records, total, page, page_size))
        })
    }

    pub async fn find_info<C>(id: i32, db: Option<&C>) -> StorageResult<Option<PermissionInfo>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Permission::find_by_id(id)
                .into_partial_model::<PermissionInfo>()
                .one(conn)
                .await?
        }))
    }

    pub async fn exists_by_id<C>(id: i32, db: Option<&C>) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Permission::find_by_id(id).count(conn).await? > 0))
    }

    pub async fn exists_by_code<C>(code: &str, db: Option<&C>) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Permission::find()
                .filter(PermissionColumn::Code.eq(code))
                .count(conn)
                .await?
                > 0
        }))
    }

    pub async fn exists_by_code_exclude_id<C>(
        id: i32,
        code: &str,
        db: Option<&C>,
    ) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Permission::find()
                .filter(PermissionColumn::Id.ne(id))
                .filter(PermissionColumn::Code.eq(code))
                .count(conn)
                .await?
                > 0
        }))
    }

    pub async fn count<C>(db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Permission::find().count(conn).await?))
    }
}
