use super::{products::Products, profiles::Profiles};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use usedmart_macros::UnseedableInitializer;

#[derive(DeriveIden, UnseedableInitializer)]
#[unseedable(meta(
    order = super::INIT_MESSAGE_ORDER,
    create_table = create_messages_table,
    create_indexes = create_messages_indexes
))]
pub enum Messages {
    Table,
    Id,
    SenderId,
    ReceiverId,
    ProductId,
    Content,
    IsRead,
    CreatedAt,
}

fn create_messages_table(_: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Messages::Table)
        .if_not_exists()
        .col(pk_auto(Messages::Id))
        .col(ColumnDef::new(Messages::SenderId).integer().not_null())
        .col(ColumnDef::new(Messages::ReceiverId).integer().not_null())
        .col(ColumnDef::new(Messages::ProductId).integer().not_null())
        .col(ColumnDef::new(Messages::Content).text().not_null())
        .col(
            ColumnDef::new(Messages::IsRead)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(Messages::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_messages_product")
                .from(Messages::Table, Messages::ProductId)
                .to(Products::Table, Products::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_messages_sender")
                .from(Messages::Table, Messages::SenderId)
                .to(Profiles::Table, Profiles::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_messages_receiver")
                .from(Messages::Table, Messages::ReceiverId)
                .to(Profiles::Table, Profiles::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn create_messages_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![
        Index::create()
            .name("idx_messages_sender")
            .table(Messages::Table)
            .col(Messages::SenderId)
            .to_owned(),
        Index::create()
            .name("idx_messages_receiver_read")
            .table(Messages::Table)
            .col(Messages::ReceiverId)
            .col(Messages::IsRead)
            .to_owned(),
        Index::create()
            .name("idx_messages_product")
            .table(Messages::Table)
            .col(Messages::ProductId)
            .to_owned(),
    ])
}
