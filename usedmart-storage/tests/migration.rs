mod common;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use usedmart_models::{
    constants::{ADMIN_ROLE_CODE, MODERATOR_ROLE_CODE, USER_ROLE_CODE},
    entities::prelude::*,
    enums::{
        common::{EntityType, RESOURCE_OPERATIONS},
        product::{ProductCondition, ProductStatus},
    },
};
use usedmart_utils::hash::bcrypt_check;

#[tokio::test]
async fn test_builtin_roles_and_admin_are_seeded() {
    let db = common::setup_db().await;

    let codes: Vec<String> = Role::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.code)
        .collect();
    for code in [ADMIN_ROLE_CODE, MODERATOR_ROLE_CODE, USER_ROLE_CODE] {
        assert!(codes.iter().any(|c| c == code), "missing role {code}");
    }

    let admin = Profile::find()
        .filter(ProfileColumn::Username.eq("admin"))
        .one(&db)
        .await
        .unwrap()
        .expect("admin profile");
    assert!(bcrypt_check("admin", &admin.password));
    assert!(admin.role_id.is_some());
}

#[tokio::test]
async fn test_permission_catalog_matches_resource_operations() {
    let db = common::setup_db().await;

    let expected: usize = RESOURCE_OPERATIONS.values().map(Vec::len).sum();
    assert_eq!(Permission::find().count(&db).await.unwrap() as usize, expected);

    let approve = Permission::find()
        .filter(PermissionColumn::Code.eq("product:approve"))
        .one(&db)
        .await
        .unwrap()
        .expect("product:approve");
    assert_eq!(approve.resource, EntityType::Product);
}

#[tokio::test]
async fn test_default_settings_and_categories() {
    let db = common::setup_db().await;

    let approval = SystemSetting::find_by_id("require_product_approval".to_string())
        .one(&db)
        .await
        .unwrap()
        .expect("setting");
    assert_eq!(approval.value, "true");
    assert!(!approval.is_public);

    let phones = Category::find()
        .filter(CategoryColumn::Slug.eq("phones"))
        .one(&db)
        .await
        .unwrap()
        .expect("phones category");
    assert_eq!(phones.parent_id, Some(1));
}

#[tokio::test]
async fn test_favorite_pair_is_unique() {
    let db = common::setup_db().await;

    let product = ProductActiveModel {
        seller_id: Set(1),
        title: Set("Desk lamp".into()),
        price: Set(1500),
        condition: Set(ProductCondition::Good),
        status: Set(ProductStatus::Active),
        view_count: Set(0),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let favorite = || FavoriteActiveModel {
        profile_id: Set(1),
        product_id: Set(product.id),
        ..Default::default()
    };
    favorite().insert(&db).await.unwrap();
    assert!(favorite().insert(&db).await.is_err());
}

#[tokio::test]
async fn test_deleting_product_cascades_to_messages() {
    let db = common::setup_db().await;

    let product = ProductActiveModel {
        seller_id: Set(1),
        title: Set("Bike".into()),
        price: Set(30000),
        condition: Set(ProductCondition::Fair),
        status: Set(ProductStatus::Active),
        view_count: Set(0),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    MessageActiveModel {
        sender_id: Set(1),
        receiver_id: Set(1),
        product_id: Set(product.id),
        content: Set("hello".into()),
        is_read: Set(false),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    Product::delete_by_id(product.id).exec(&db).await.unwrap();
    assert_eq!(Message::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_table_is_a_setup_error() {
    let db = common::setup_db().await;
    let err = db
        .execute_unprepared("SELECT * FROM listings_that_do_not_exist")
        .await
        .unwrap_err();
    let err = usedmart_error::storage::StorageError::from(err);
    assert!(err.is_setup_error());
}
