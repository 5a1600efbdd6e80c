mod common;

use usedmart_models::{
    constants::{ADMIN_ROLE_CODE, MODERATOR_ROLE_CODE, USER_ROLE_CODE},
    domain::prelude::RolePermissionPair,
};
use usedmart_repository::{PermissionRepository, RoleRepository};

#[tokio::test]
async fn test_builtin_grants() {
    let db = common::setup_db().await;
    let roles = RoleRepository::find_all(Some(&db)).await.unwrap();
    let permissions = PermissionRepository::find_all(Some(&db)).await.unwrap();
    let role_id = |code: &str| roles.iter().find(|r| r.code == code).unwrap().id;

    let (admin, codes) = RoleRepository::find_grant(role_id(ADMIN_ROLE_CODE), Some(&db))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin.code, ADMIN_ROLE_CODE);
    assert_eq!(codes.len(), permissions.len());

    let (_, codes) = RoleRepository::find_grant(role_id(MODERATOR_ROLE_CODE), Some(&db))
        .await
        .unwrap()
        .unwrap();
    assert!(codes.contains(&"product:approve".to_string()));
    assert!(!codes.contains(&"role:write".to_string()));

    let (_, codes) = RoleRepository::find_grant(role_id(USER_ROLE_CODE), Some(&db))
        .await
        .unwrap()
        .unwrap();
    assert!(codes.is_empty());

    assert!(RoleRepository::find_grant(999, Some(&db))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_toggle_permission_flips_one_cell() {
    let db = common::setup_db().await;
    let roles = RoleRepository::find_all(Some(&db)).await.unwrap();
    let user = roles.iter().find(|r| r.code == USER_ROLE_CODE).unwrap().id;
    let read_orders = PermissionRepository::find_all(Some(&db))
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.code == "order:read")
        .unwrap()
        .id;
    let pair = RolePermissionPair {
        role_id: user,
        permission_id: read_orders,
    };
    let before = RoleRepository::find_grant_pairs(Some(&db)).await.unwrap();
    assert!(!before.contains(&pair));

    assert!(RoleRepository::toggle_permission(pair, Some(&db)).await.unwrap());
    let after = RoleRepository::find_grant_pairs(Some(&db)).await.unwrap();
    assert_eq!(after.len(), before.len() + 1);
    let (_, codes) = RoleRepository::find_grant(user, Some(&db))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(codes, vec!["order:read".to_string()]);

    assert!(!RoleRepository::toggle_permission(pair, Some(&db)).await.unwrap());
    let reverted = RoleRepository::find_grant_pairs(Some(&db)).await.unwrap();
    assert_eq!(reverted, before);
}

#[tokio::test]
async fn test_code_uniqueness_checks() {
    let db = common::setup_db().await;
    assert!(RoleRepository::exists_by_code(ADMIN_ROLE_CODE, Some(&db))
        .await
        .unwrap());
    assert!(!RoleRepository::exists_by_code("AUDITOR", Some(&db))
        .await
        .unwrap());
    let admin = RoleRepository::find_all(Some(&db))
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.code == ADMIN_ROLE_CODE)
        .unwrap();
    assert!(
        !RoleRepository::exists_by_code_exclude_id(admin.id, ADMIN_ROLE_CODE, Some(&db))
            .await
            .unwrap()
    );
    assert!(PermissionRepository::exists_by_code("product:approve", Some(&db))
        .await
        .unwrap());
}
