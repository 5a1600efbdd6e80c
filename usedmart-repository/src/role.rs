use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, TransactionTrait,
};
use tracing::info;
use usedmart_error::StorageResult;
use usedmart_models::{
    domain::prelude::{
        NewRolePermission, PageResult, RoleInfo, RolePageParams, RolePermissionPair, SimpleRole,
    },
    entities::prelude::{
        Permission, PermissionColumn, Role, RoleActiveModel, RoleColumn, RoleModel,
        RolePermission, RolePermissionColumn,
    },
};

pub struct RoleRepository;

impl RoleRepository {
    pub async fn create<C>(role: RoleActiveModel, db: Option<&C>) -> StorageResult<RoleModel>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| role.insert(conn).await?))
    }

    pub async fn update<C>(role: RoleActiveModel, db: Option<&C>) -> StorageResult<()>
    where
        C: ConnectionTrait,
    {
        with_conn!(db, |conn| {
            let _ = role.update(conn).await?;
        });
        Ok(())
    }

    /// Grants go with the role; profiles holding it fall back to no role.
    pub async fn delete<C>(id: i32, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Role::delete_by_id(id).exec(conn).await?.rows_affected
        }))
    }

    pub async fn find_all<C>(db: Option<&C>) -> StorageResult<Vec<RoleInfo>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Role::find()
                .order_by(RoleColumn::Id, Order::Asc)
                .into_partial_model::<RoleInfo>()
                .all(conn)
                .await?
        }))
    }

    pub async fn page<C>(params: RolePageParams, db: Option<&C>) -> StorageResult<PageResult<RoleInfo>>
    where
        C: ConnectionTrait,
    {
        let query = Role::find()
            .apply_if(params.name.as_ref(), |q, name| {
                q.filter(RoleColumn::Name.like(format!("%{name}%")))
            })
            .apply_if(params.status, |q, status| {
                q.filter(RoleColumn::Status.eq(status))
            })
            .apply_if(params.code.as_ref(), |q, code| {
                q.filter(RoleColumn::Code.like(format!("%{code}%")))
            })
            .apply_if(params.time_range.start_time, |q, start_time| {
                q.filter(RoleColumn::CreatedAt.gte(start_time))
            })
            .apply_if(params.time_range.end_time, |q, end_time| {
                q.filter(RoleColumn::CreatedAt.lte(end_time))
            })
            .order_by(RoleColumn::CreatedAt, Order::Desc)
            .order_by(RoleColumn::Id, Order::Desc);
        let (page, page_size) = (params.page.page(), params.page.page_size());

        with_conn!(db, |conn| {
            let total = query.clone().count(conn).await?;
            let records = query
                .into_partial_model::<RoleInfo>()
                .paginate(conn, page_size as u64)
                .fetch_page((page - 1) as u64)
                .await?;
            Ok(PageResult::new(records, total, page, page_size))
        })
    }

    pub async fn find_role_info<C>(id: i32, db: Option<&C>) -> StorageResult<Option<RoleInfo>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Role::find_by_id(id)
                .into_partial_model::<RoleInfo>()
                .one(conn)
                .await?
        }))
    }

    pub async fn find_by_id<C>(id: i32, db: Option<&C>) -> StorageResult<Option<RoleModel>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Role::find_by_id(id).one(conn).await?))
    }

    /// The role and its permission codes, the input of a grant snapshot.
    pub async fn find_grant<C>(
        role_id: i32,
        db: Option<&C>,
    ) -> StorageResult<Option<(SimpleRole, Vec<String>)>>
    where
        C: ConnectionTrait,
    {
        with_conn!(db, |conn| {
            let Some(role) = Role::find_by_id(role_id).one(conn).await? else {
                return Ok(None);
            };
            let codes: Vec<String> = Permission::find()
                .select_only()
                .column(PermissionColumn::Code)
                .inner_join(RolePermission)
                .filter(RolePermissionColumn::RoleId.eq(role_id))
                .order_by(PermissionColumn::Code, Order::Asc)
                .into_tuple()
                .all(conn)
                .await?;
            Ok(Some((SimpleRole::from(role), codes)))
        })
    }

    /// Every checked cell of the role/permission matrix.
    pub async fn find_grant_pairs<C>(db: Option<&C>) -> StorageResult<Vec<RolePermissionPair>>
    where
        C: ConnectionTrait,
    {
        let pairs: Vec<(i32, i32)> = with_conn!(db, |conn| {
            RolePermission::find()
                .select_only()
                .column(RolePermissionColumn::RoleId)
                .column(RolePermissionColumn::PermissionId)
                .order_by(RolePermissionColumn::RoleId, Order::Asc)
                .order_by(RolePermissionColumn::PermissionId, Order::Asc)
                .into_tuple()
                .all(conn)
                .await?
        });
        Ok(pairs
            .into_iter()
            .map(|(role_id, permission_id)| RolePermissionPair {
                role_id,
                permission_id,
            })
            .collect())
    }

    /// Flips one matrix cell and returns whether the role now holds the permission.
    pub async fn toggle_permission<C>(pair: RolePermissionPair, db: Option<&C>) -> StorageResult<bool>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        with_conn!(db, |conn| {
            let txn = conn.begin().await?;
            let existing = RolePermission::find()
                .filter(RolePermissionColumn::RoleId.eq(pair.role_id))
                .filter(RolePermissionColumn::PermissionId.eq(pair.permission_id))
                .one(&txn)
                .await?;
            let granted = match existing {
                Some(row) => {
                    RolePermission::delete_by_id(row.id).exec(&txn).await?;
                    false
                }
                None => {
                    NewRolePermission {
                        role_id: pair.role_id,
                        permission_id: pair.permission_id,
                    }
                    .into_active_model()
                    .insert(&txn)
                    .await?;
                    true
                }
            };
            txn.commit().await?;
            info!(
                role_id = pair.role_id,
                permission_id = pair.permission_id,
                granted,
                "Role permission toggled"
            );
            Ok(granted)
        })
    }

    pub async fn exists_by_id<C>(id: i32, db: Option<&C>) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Role::find_by_id(id).count(conn).await? > 0))
    }

    pub async fn exists_by_code<C>(code: &str, db: Option<&C>) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Role::find()
                .filter(RoleColumn::Code.eq(code))
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
            Role::find()
                .filter(RoleColumn::Id.ne(id))
                .filter(RoleColumn::Code.eq(code))
                .count(conn)
                .await?
                > 0
        }))
    }

    pub async fn count<C>(db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Role::find().count(conn).await?))
    }
}
