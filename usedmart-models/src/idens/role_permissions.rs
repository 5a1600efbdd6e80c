use super::{permissions::Permissions, roles::Roles};
use crate::{
    constants::{ADMIN_ROLE_CODE, MODERATOR_ROLE_CODE},
    domain::prelude::{NewPermissionWithId, NewRolePermission, NewRoleWithId},
    initializer::{InitContext, UMInitializer},
};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use usedmart_macros::SeedableInitializer;

/// Codes granted to moderators on a fresh install.
const MODERATOR_GRANTS: &[&str] = &[
    "profile:read",
    "category:read",
    "product:read",
    "product:approve",
    "product:delete",
    "order:read",
    "message:read",
    "message:delete",
    "settings:read",
];

#[derive(DeriveIden, SeedableInitializer)]
#[seedable(meta(
    model = NewRolePermission,
    order = super::INIT_ROLE_PERMISSION_ORDER,
    create_table = create_role_permissions_table,
    create_indexes = create_role_permissions_indexes,
    seed_data = get_role_permissions_seed_data
))]
pub enum RolePermissions {
    Table,
    Id,
    RoleId,
    PermissionId,
    CreatedAt,
}

fn create_role_permissions_table(_: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(RolePermissions::Table)
        .if_not_exists()
        .col(pk_auto(RolePermissions::Id))
        .col(ColumnDef::new(RolePermissions::RoleId).integer().not_null())
        .col(
            ColumnDef::new(RolePermissions::PermissionId)
                .integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(RolePermissions::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_role_permissions_role")
                .from(RolePermissions::Table, RolePermissions::RoleId)
                .to(Roles::Table, Roles::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_role_permissions_permission")
                .from(RolePermissions::Table, RolePermissions::PermissionId)
                .to(Permissions::Table, Permissions::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn create_role_permissions_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![Index::create()
        .name("uk_role_permissions_pair")
        .table(RolePermissions::Table)
        .col(RolePermissions::RoleId)
        .col(RolePermissions::PermissionId)
        .unique()
        .to_owned()])
}

async fn get_role_permissions_seed_data(
    ctx: &mut InitContext,
) -> Result<Option<Vec<NewRolePermission>>, DbErr> {
    let roles = ctx
        .get::<NewRoleWithId>(Roles::Table.name())
        .map_err(|e| DbErr::Custom(format!("Failed to get roles: {e}")))?;
    let permissions = ctx
        .get::<NewPermissionWithId>(Permissions::Table.name())
        .map_err(|e| DbErr::Custom(format!("Failed to get permissions: {e}")))?;

    let role_id = |code: &str| {
        roles
            .iter()
            .find(|r| r.code == code)
            .map(|r| r.id)
            .ok_or_else(|| DbErr::Custom(format!("Builtin role {code} was not seeded")))
    };
    let admin = role_id(ADMIN_ROLE_CODE)?;
    let moderator = role_id(MODERATOR_ROLE_CODE)?;

    let mut grants: Vec<NewRolePermission> = permissions
        .iter()
        .map(|p| NewRolePermission {
            role_id: admin,
            permission_id: p.id,
        })
        .collect();

    grants.extend(
        permissions
            .iter()
            .filter(|p| MODERATOR_GRANTS.contains(&p.code.as_str()))
            .map(|p| NewRolePermission {
                role_id: moderator,
                permission_id: p.id,
            }),
    );

    Ok(Some(grants))
}
