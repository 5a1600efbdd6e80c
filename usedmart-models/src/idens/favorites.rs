use super::{products::Products, profiles::Profiles};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use usedmart_macros::UnseedableInitializer;

#[derive(DeriveIden, UnseedableInitializer)]
#[unseedable(meta(
    order = super::INIT_FAVORITE_ORDER,
    create_table = create_favorites_table,
    create_indexes = create_favorites_indexes
))]
pub enum Favorites {
    Table,
    Id,
    ProfileId,
    ProductId,
    CreatedAt,
}

fn create_favorites_table(_: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Favorites::Table)
        .if_not_exists()
        .col(pk_auto(Favorites::Id))
        .col(ColumnDef::new(Favorites::ProfileId).integer().not_null())
        .col(ColumnDef::new(Favorites::ProductId).integer().not_null())
        .col(
            ColumnDef::new(Favorites::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_favorites_profile")
                .from(Favorites::Table, Favorites::ProfileId)
                .to(Profiles::Table, Profiles::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_favorites_product")
                .from(Favorites::Table, Favorites::ProductId)
                .to(Products::Table, Products::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn create_favorites_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![Index::create()
        .name("uk_favorites_pair")
        .table(Favorites::Table)
        .col(Favorites::ProfileId)
        .col(Favorites::ProductId)
        .unique()
        .to_owned()])
}
