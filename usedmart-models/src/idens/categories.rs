use crate::{domain::prelude::NewCategoryWithId, enums::common::Status, initializer::InitContext};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use usedmart_macros::SeedableInitializer;

#[derive(DeriveIden, SeedableInitializer)]
#[seedable(meta(
    model = NewCategoryWithId,
    order = super::INIT_CATEGORY_ORDER,
    create_table = create_categories_table,
    create_indexes = create_categories_indexes,
    seed_data = get_categories_seed_data
))]
pub enum Categories {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Icon,
    ParentId,
    Sort,
    Status,
    CreatedAt,
    UpdatedAt,
}

fn create_categories_table(_: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Categories::Table)
        .if_not_exists()
        .col(pk_auto(Categories::Id))
        .col(ColumnDef::new(Categories::Name).string_len(64).not_null())
        .col(
            ColumnDef::new(Categories::Slug)
                .string_len(64)
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(Categories::Description).string_len(255))
        .col(ColumnDef::new(Categories::Icon).string_len(255))
        .col(ColumnDef::new(Categories::ParentId).integer())
        .col(ColumnDef::new(Categories::Sort).integer().not_null().default(0))
        .col(
            ColumnDef::new(Categories::Status)
                .small_integer()
                .default(Status::Enabled)
                .not_null(),
        )
        .col(
            ColumnDef::new(Categories::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Categories::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_categories_parent")
                .from(Categories::Table, Categories::ParentId)
                .to(Categories::Table, Categories::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn create_categories_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![Index::create()
        .name("idx_categories_parent")
        .table(Categories::Table)
        .col(Categories::ParentId)
        .to_owned()])
}

async fn get_categories_seed_data(
    _: &mut InitContext,
) -> Result<Option<Vec<NewCategoryWithId>>, DbErr> {
    let node = |id: i32, parent_id: Option<i32>, sort: i32, name: &str, slug: &str| {
        NewCategoryWithId {
            id,
            name: name.into(),
            slug: slug.into(),
            icon: None,
            parent_id,
            sort,
        }
    };

    Ok(Some(vec![
        node(1, None, 1, "Electronics", "electronics"),
        node(2, Some(1), 1, "Phones", "phones"),
        node(3, Some(1), 2, "Computers", "computers"),
        node(4, None, 2, "Home & Garden", "home-garden"),
        node(5, Some(4), 1, "Furniture", "furniture"),
        node(6, None, 3, "Clothing", "clothing"),
        node(7, None, 4, "Books", "books"),
        node(8, None, 5, "Sports", "sports"),
        node(9, None, 99, "Other", "other"),
    ]))
}
