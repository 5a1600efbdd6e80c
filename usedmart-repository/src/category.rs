use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait,
};
use usedmart_error::StorageResult;
use usedmart_models::{
    domain::prelude::{CategoryInfo, CategoryPageParams, CategoryTree, PageResult},
    entities::prelude::{Category, CategoryActiveModel, CategoryColumn, CategoryModel},
    enums::common::Status,
};
use usedmart_utils::tree::{build_tree, descendant_ids};

pub struct CategoryRepository;

impl CategoryRepository {
    pub async fn create<C>(category: CategoryActiveModel, db: Option<&C>) -> StorageResult<CategoryModel>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| category.insert(conn).await?))
    }

    pub async fn update<C>(category: CategoryActiveModel, db: Option<&C>) -> StorageResult<()>
    where
        C: ConnectionTrait,
    {
        with_conn!(db, |conn| {
            let _ = category.update(conn).await?;
        });
        Ok(())
    }

    /// Children go with their parent through the `parent_id` cascade.
    pub async fn delete<C>(id: i32, db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Category::delete_by_id(id).exec(conn).await?.rows_affected
        }))
    }

    pub async fn find_by_id<C>(id: i32, db: Option<&C>) -> StorageResult<Option<CategoryModel>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Category::find_by_id(id).one(conn).await?))
    }

    pub async fn find_info<C>(id: i32, db: Option<&C>) -> StorageResult<Option<CategoryInfo>>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Category::find_by_id(id)
                .into_partial_model::<CategoryInfo>()
                .one(conn)
                .await?
        }))
    }

    /// Every category in display order; `enabled_only` hides disabled ones.
    pub async fn find_all<C>(enabled_only: bool, db: Option<&C>) -> StorageResult<Vec<CategoryInfo>>
    where
        C: ConnectionTrait,
    {
        let query = Category::find()
            .apply_if(enabled_only.then_some(Status::Enabled), |q, status| {
                q.filter(CategoryColumn::Status.eq(status))
            })
            .order_by(CategoryColumn::Sort, Order::Asc)
            .order_by(CategoryColumn::Id, Order::Asc);
        Ok(with_conn!(db, |conn| {
            query.into_partial_model::<CategoryInfo>().all(conn).await?
        }))
    }

    pub async fn find_tree<C>(enabled_only: bool, db: Option<&C>) -> StorageResult<Vec<CategoryTree>>
    where
        C: ConnectionTrait,
    {
        let categories = Self::find_all(enabled_only, db).await?;
        Ok(build_tree::<CategoryInfo, CategoryTree>(categories))
    }

    pub async fn page<C>(
        params: CategoryPageParams,
        db: Option<&C>,
    ) -> StorageResult<PageResult<CategoryInfo>>
    where
        C: ConnectionTrait,
    {
        let query = Category::find()
            .apply_if(params.name.as_ref(), |q, name| {
                q.filter(CategoryColumn::Name.like(format!("%{name}%")))
            })
            .apply_if(params.parent_id, |q, parent_id| {
                q.filter(CategoryColumn::ParentId.eq(parent_id))
            })
            .apply_if(params.status, |q, status| {
                q.filter(CategoryColumn::Status.eq(status))
            })
            .order_by(CategoryColumn::Sort, Order::Asc)
            .order_by(CategoryColumn::Id, Order::Asc);
        let (page, page_size) = (params.page.page(), params.page.page_size());

        with_conn!(db, |conn| {
            let total = query.clone().count(conn).await?;
            let records = query
                .into_partial_model::<CategoryInfo>()
                .paginate(conn, page_size as u64)
                .fetch_page((page - 1) as u64)
                .await?;
            Ok(PageResult::new(records, total, page, page_size))
        })
    }

    /// `root` followed by everything nested under it.
    pub async fn find_descendant_ids<C>(root: i32, db: Option<&C>) -> StorageResult<Vec<i32>>
    where
        C: ConnectionTrait,
    {
        let links: Vec<(i32, Option<i32>)> = with_conn!(db, |conn| {
            Category::find()
                .select_only()
                .column(CategoryColumn::Id)
                .column(CategoryColumn::ParentId)
                .into_tuple()
                .all(conn)
                .await?
        });
        Ok(descendant_ids(root, &links))
    }

    pub async fn has_children<C>(id: i32, db: Option<&C>) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Category::find()
                .filter(CategoryColumn::ParentId.eq(id))
                .count(conn)
                .await?
                > 0
        }))
    }

    pub async fn exists_by_id<C>(id: i32, db: Option<&C>) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Category::find_by_id(id).count(conn).await? > 0))
    }

    pub async fn exists_by_slug<C>(slug: &str, db: Option<&C>) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Category::find()
                .filter(CategoryColumn::Slug.eq(slug))
                .count(conn)
                .await?
                > 0
        }))
    }

    pub async fn exists_by_slug_exclude_id<C>(
        id: i32,
        slug: &str,
        db: Option<&C>,
    ) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| {
            Category::find()
                .filter(CategoryColumn::Id.ne(id))
                .filter(CategoryColumn::Slug.eq(slug))
                .count(conn)
                .await?
                > 0
        }))
    }

    pub async fn count<C>(db: Option<&C>) -> StorageResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(with_conn!(db, |conn| Category::find().count(conn).await?))
    }
}
