use crate::{
    domain::prelude::NewPermissionWithId,
    enums::common::{permission_code, EntityType},
    initializer::InitContext,
};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use usedmart_macros::SeedableInitializer;

#[derive(DeriveIden, SeedableInitializer)]
#[seedable(meta(
    model = NewPermissionWithId,
    order = super::INIT_PERMISSION_ORDER,
    create_table = create_permissions_table,
    create_indexes = create_permissions_indexes,
    seed_data = get_permissions_seed_data,
))]
pub enum Permissions {
    Table,
    Id,
    Name,
    Code,
    Resource,
    Description,
    CreatedAt,
    UpdatedAt,
}

fn create_permissions_table(_: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Permissions::Table)
        .if_not_exists()
        .col(pk_auto(Permissions::Id))
        .col(ColumnDef::new(Permissions::Name).string_len(128).not_null())
        .col(
            ColumnDef::new(Permissions::Code)
                .string_len(64)
                .not_null()
                .unique_key()
                .comment("resource:operation"),
        )
        .col(ColumnDef::new(Permissions::Resource).string_len(20).not_null())
        .col(ColumnDef::new(Permissions::Description).string_len(255))
        .col(
            ColumnDef::new(Permissions::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Permissions::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn create_permissions_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![Index::create()
        .name("idx_permissions_resource")
        .table(Permissions::Table)
        .col(Permissions::Resource)
        .to_owned()])
}

/// One permission per resource operation, in a stable order so ids are
/// reproducible across fresh databases.
async fn get_permissions_seed_data(
    _: &mut InitContext,
) -> Result<Option<Vec<NewPermissionWithId>>, DbErr> {
    let mut id = 0;
    let mut permissions = Vec::new();
    for resource in EntityType::all() {
        for operation in resource.operations() {
            id += 1;
            permissions.push(NewPermissionWithId {
                id,
                name: format!("{} {}", resource.name(), operation.as_str()),
                code: permission_code(resource, operation),
                resource,
                description: None,
            });
        }
    }
    Ok(Some(permissions))
}
