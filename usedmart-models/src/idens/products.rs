use super::{categories::Categories, profiles::Profiles};
use crate::enums::product::ProductStatus;
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use usedmart_macros::UnseedableInitializer;

#[derive(DeriveIden, UnseedableInitializer)]
#[unseedable(meta(
    order = super::INIT_PRODUCT_ORDER,
    create_table = create_products_table,
    create_indexes = create_products_indexes
))]
pub enum Products {
    Table,
    Id,
    SellerId,
    CategoryId,
    Title,
    Description,
    Price,
    Condition,
    Location,
    Images,
    Status,
    ViewCount,
    RejectionReason,
    CreatedAt,
    UpdatedAt,
}

fn create_products_table(_: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Products::Table)
        .if_not_exists()
        .col(pk_auto(Products::Id))
        .col(ColumnDef::new(Products::SellerId).integer().not_null())
        .col(ColumnDef::new(Products::CategoryId).integer())
        .col(ColumnDef::new(Products::Title).string_len(120).not_null())
        .col(ColumnDef::new(Products::Description).text())
        .col(
            ColumnDef::new(Products::Price)
                .big_integer()
                .not_null()
                .comment("minor currency units"),
        )
        .col(ColumnDef::new(Products::Condition).string_len(16).not_null())
        .col(ColumnDef::new(Products::Location).string_len(128))
        .col(ColumnDef::new(Products::Images).json())
        .col(
            ColumnDef::new(Products::Status)
                .string_len(16)
                .not_null()
                .default(ProductStatus::Pending.as_str()),
        )
        .col(
            ColumnDef::new(Products::ViewCount)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(Products::RejectionReason).string_len(500))
        .col(
            ColumnDef::new(Products::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Products::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_products_seller")
                .from(Products::Table, Products::SellerId)
                .to(Profiles::Table, Profiles::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_products_category")
                .from(Products::Table, Products::CategoryId)
                .to(Categories::Table, Categories::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

fn create_products_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![
        Index::create()
            .name("idx_products_status_created")
            .table(Products::Table)
            .col(Products::Status)
            .col(Products::CreatedAt)
            .to_owned(),
        Index::create()
            .name("idx_products_seller")
            .table(Products::Table)
            .col(Products::SellerId)
            .to_owned(),
        Index::create()
            .name("idx_products_category")
            .table(Products::Table)
            .col(Products::CategoryId)
            .to_owned(),
    ])
}
