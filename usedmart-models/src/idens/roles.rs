use crate::{
    constants::{
        ADMIN_ROLE_CODE, ADMIN_ROLE_NAME, MODERATOR_ROLE_CODE, MODERATOR_ROLE_NAME, USER_ROLE_CODE,
        USER_ROLE_NAME,
    },
    domain::prelude::NewRoleWithId,
    enums::{common::Status, role::RoleType},
    initializer::InitContext,
};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use usedmart_macros::SeedableInitializer;

#[derive(DeriveIden, SeedableInitializer)]
#[seedable(meta(
    model = NewRoleWithId,
    order = super::INIT_ROLE_ORDER,
    create_table = create_roles_table,
    seed_data = get_roles_seed_data,
))]
pub enum Roles {
    Table,
    Id,
    Name,
    Code,
    Description,
    Type,
    Status,
    CreatedAt,
    UpdatedAt,
}

fn create_roles_table(_: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Roles::Table)
        .if_not_exists()
        .col(pk_auto(Roles::Id))
        .col(ColumnDef::new(Roles::Name).string_len(128).not_null())
        .col(
            ColumnDef::new(Roles::Code)
                .string_len(50)
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(Roles::Description).string_len(255))
        .col(
            ColumnDef::new(Roles::Type)
                .small_integer()
                .default(RoleType::Custom)
                .not_null()
                .comment("0: builtin 1: custom"),
        )
        .col(
            ColumnDef::new(Roles::Status)
                .small_integer()
                .default(Status::Enabled)
                .not_null()
                .comment("0: enabled 1: disabled"),
        )
        .col(
            ColumnDef::new(Roles::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Roles::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

async fn get_roles_seed_data(_: &mut InitContext) -> Result<Option<Vec<NewRoleWithId>>, DbErr> {
    let builtin = |id: i32, code: &str, name: &str, description: &str| NewRoleWithId {
        id,
        name: name.into(),
        code: code.into(),
        description: Some(description.into()),
        r#type: RoleType::BuiltIn,
    };

    Ok(Some(vec![
        builtin(1, ADMIN_ROLE_CODE, ADMIN_ROLE_NAME, "Full access to every resource"),
        builtin(
            2,
            MODERATOR_ROLE_CODE,
            MODERATOR_ROLE_NAME,
            "Reviews listings and conversations",
        ),
        builtin(3, USER_ROLE_CODE, USER_ROLE_NAME, "Buys and sells"),
    ]))
}
