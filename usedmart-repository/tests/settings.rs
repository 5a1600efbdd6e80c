mod common;

use usedmart_core::MarketSettings;
use usedmart_models::domain::prelude::SettingItem;
use usedmart_repository::{SettingsRepository, DEFAULT_SETTING_CATEGORY};

fn item(key: &str, value: &str) -> SettingItem {
    SettingItem {
        key: key.into(),
        value: value.into(),
        description: None,
        category: None,
        is_public: None,
    }
}

#[tokio::test]
async fn test_seeded_public_settings() {
    let db = common::setup_db().await;
    let public = SettingsRepository::find_public(Some(&db)).await.unwrap();
    assert_eq!(public.len(), 5);
    assert!(public.iter().all(|s| s.is_public));
    assert!(public.iter().any(|s| s.key == "site_name"));

    let all = SettingsRepository::find_all(Some(&db)).await.unwrap();
    assert!(all.len() > public.len());
}

#[tokio::test]
async fn test_upsert_updates_and_inserts() {
    let db = common::setup_db().await;
    let original = SettingsRepository::find_by_key("site_name", Some(&db))
        .await
        .unwrap()
        .unwrap();

    let written = SettingsRepository::upsert(
        vec![item("site_name", "Second Hand Lane"), item("banner_text", "Spring sale")],
        Some(&db),
    )
    .await
    .unwrap();
    assert_eq!(written, 2);

    let renamed = SettingsRepository::find_by_key("site_name", Some(&db))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.value, "Second Hand Lane");
    assert_eq!(renamed.is_public, original.is_public);
    assert_eq!(renamed.category, original.category);

    let banner = SettingsRepository::find_by_key("banner_text", Some(&db))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(banner.category, DEFAULT_SETTING_CATEGORY);
    assert!(!banner.is_public);

    assert_eq!(
        SettingsRepository::delete("banner_text", Some(&db))
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        SettingsRepository::delete("banner_text", Some(&db))
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_market_settings_from_stored_pairs() {
    let db = common::setup_db().await;
    SettingsRepository::upsert(
        vec![item(usedmart_core::market::MAX_PRODUCTS_PER_USER, "1")],
        Some(&db),
    )
    .await
    .unwrap();

    let market =
        MarketSettings::from_pairs(SettingsRepository::find_pairs(Some(&db)).await.unwrap());
    assert!(market.has_listing_room(0));
    assert!(!market.has_listing_room(1));
}
