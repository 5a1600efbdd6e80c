use super::{products::Products, profiles::Profiles};
use crate::enums::order::OrderStatus;
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use usedmart_macros::UnseedableInitializer;

#[derive(DeriveIden, UnseedableInitializer)]
#[unseedable(meta(
    order = super::INIT_ORDER_ORDER,
    create_table = create_orders_table,
    create_indexes = create_orders_indexes
))]
pub enum Orders {
    Table,
    Id,
    ProductId,
    BuyerId,
    SellerId,
    Amount,
    Status,
    ShippingAddress,
    Note,
    CreatedAt,
    UpdatedAt,
}

fn create_orders_table(_: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Orders::Table)
        .if_not_exists()
        .col(pk_auto(Orders::Id))
        .col(ColumnDef::new(Orders::ProductId).integer().not_null())
        .col(ColumnDef::new(Orders::BuyerId).integer().not_null())
        .col(ColumnDef::new(Orders::SellerId).integer().not_null())
        .col(ColumnDef::new(Orders::Amount).big_integer().not_null())
        .col(
            ColumnDef::new(Orders::Status)
                .string_len(16)
                .not_null()
                .default(OrderStatus::Pending.as_str()),
        )
        .col(ColumnDef::new(Orders::ShippingAddress).string_len(500))
        .col(ColumnDef::new(Orders::Note).string_len(1000))
        .col(
            ColumnDef::new(Orders::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Orders::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_orders_product")
                .from(Orders::Table, Orders::ProductId)
                .to(Products::Table, Products::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_orders_buyer")
                .from(Orders::Table, Orders::BuyerId)
                .to(Profiles::Table, Profiles::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_orders_seller")
                .from(Orders::Table, Orders::SellerId)
                .to(Profiles::Table, Profiles::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn create_orders_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![
        Index::create()
            .name("idx_orders_buyer")
            .table(Orders::Table)
            .col(Orders::BuyerId)
            .to_owned(),
        Index::create()
            .name("idx_orders_seller")
            .table(Orders::Table)
            .col(Orders::SellerId)
            .to_owned(),
        Index::create()
            .name("idx_orders_product")
            .table(Orders::Table)
            .col(Orders::ProductId)
            .to_owned(),
    ])
}
