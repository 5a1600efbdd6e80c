#![allow(dead_code)]

use sea_orm::{DatabaseConnection, IntoActiveModel};
use usedmart_models::{
    domain::prelude::{NewProduct, NewProfile},
    entities::prelude::{ProductImages, ProductModel, ProfileModel},
    enums::product::{ProductCondition, ProductStatus},
    settings::{Db, Inner, Settings, Sqlite},
};
use usedmart_repository::{ProductRepository, ProfileRepository};
use usedmart_storage::UMDbManager;

/// Seeded by the migration.
pub const ELECTRONICS: i32 = 1;
pub const PHONES: i32 = 2;
pub const COMPUTERS: i32 = 3;
pub const FURNITURE: i32 = 5;

pub fn memory_settings() -> Settings {
    Settings::from_inner(Inner {
        db: Db {
            sqlite: Sqlite {
                path: ":memory:".into(),
                ..Default::default()
            },
        },
        ..Default::default()
    })
}

pub async fn setup_db() -> DatabaseConnection {
    UMDbManager::connect(&memory_settings())
        .await
        .expect("in-memory database should migrate")
}

pub async fn profile(db: &DatabaseConnection, username: &str) -> ProfileModel {
    let profile = NewProfile {
        username: username.into(),
        password: "not-a-real-hash".into(),
        full_name: Some(format!("{username} tester")),
        email: None,
        phone: None,
        avatar_url: None,
        bio: None,
        location: Some("Hangzhou".into()),
        role_id: None,
    };
    ProfileRepository::create(profile.into_active_model(), Some(db))
        .await
        .expect("profile should insert")
}

pub fn listing(seller_id: i32, title: &str, price: i64, category_id: Option<i32>) -> NewProduct {
    NewProduct {
        seller_id,
        category_id,
        title: title.into(),
        description: Some(format!("{title}, lightly used")),
        price,
        condition: ProductCondition::Good,
        location: None,
        images: Some(ProductImages(vec!["https://img.example/1.jpg".into()])),
        status: ProductStatus::Active,
        view_count: 0,
    }
}

pub async fn product(db: &DatabaseConnection, product: NewProduct) -> ProductModel {
    ProductRepository::create(product, Some(db))
        .await
        .expect("product should insert")
}
