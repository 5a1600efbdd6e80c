use super::roles::Roles;
use crate::{
    constants::{ADMIN_PROFILE_ID, ADMIN_ROLE_CODE},
    domain::prelude::{NewProfileWithId, NewRoleWithId},
    enums::common::Status,
    initializer::{InitContext, UMInitializer},
};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use usedmart_macros::SeedableInitializer;
use usedmart_utils::hash;

#[derive(DeriveIden, SeedableInitializer)]
#[seedable(meta(
    model = NewProfileWithId,
    order = super::INIT_PROFILE_ORDER,
    create_table = create_profiles_table,
    create_indexes = create_profiles_indexes,
    seed_data = get_profiles_seed_data
))]
pub enum Profiles {
    Table,
    Id,
    Username,
    Password,
    FullName,
    Email,
    Phone,
    AvatarUrl,
    Bio,
    Location,
    RoleId,
    Status,
    CreatedAt,
    UpdatedAt,
}

fn create_profiles_table(_backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Profiles::Table)
        .if_not_exists()
        .col(pk_auto(Profiles::Id))
        .col(
            ColumnDef::new(Profiles::Username)
                .string_len(64)
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(Profiles::Password)
                .string_len(255)
                .not_null()
                .comment("bcrypt hash"),
        )
        .col(ColumnDef::new(Profiles::FullName).string_len(128))
        .col(ColumnDef::new(Profiles::Email).string_len(255))
        .col(ColumnDef::new(Profiles::Phone).string_len(32))
        .col(ColumnDef::new(Profiles::AvatarUrl).string_len(512))
        .col(ColumnDef::new(Profiles::Bio).text())
        .col(ColumnDef::new(Profiles::Location).string_len(128))
        .col(ColumnDef::new(Profiles::RoleId).integer())
        .col(
            ColumnDef::new(Profiles::Status)
                .small_integer()
                .default(Status::Enabled)
                .not_null()
                .comment("0: enabled 1: disabled"),
        )
        .col(
            ColumnDef::new(Profiles::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Profiles::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_profiles_role")
                .from(Profiles::Table, Profiles::RoleId)
                .to(Roles::Table, Roles::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

fn create_profiles_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![Index::create()
        .name("idx_profiles_role")
        .table(Profiles::Table)
        .col(Profiles::RoleId)
        .to_owned()])
}

async fn get_profiles_seed_data(
    ctx: &mut InitContext,
) -> Result<Option<Vec<NewProfileWithId>>, DbErr> {
    let roles = ctx
        .get::<NewRoleWithId>(Roles::Table.name())
        .map_err(|e| DbErr::Custom(format!("Failed to get roles: {e}")))?;
    let admin_role = roles
        .iter()
        .find(|r| r.code == ADMIN_ROLE_CODE)
        .ok_or_else(|| DbErr::Custom("Admin role was not seeded".into()))?;

    let password = hash::bcrypt_hash("admin")
        .map_err(|e| DbErr::Custom(format!("Failed to hash admin password: {e}")))?;

    Ok(Some(vec![NewProfileWithId {
        id: ADMIN_PROFILE_ID,
        username: "admin".into(),
        password,
        full_name: Some("Administrator".into()),
        email: Some("admin@example.com".into()),
        role_id: Some(admin_role.id),
    }]))
}
