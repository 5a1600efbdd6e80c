mod common;

use common::listing;
use usedmart_models::domain::prelude::PageParams;
use usedmart_repository::{FavoriteRepository, ProductRepository};

#[tokio::test]
async fn test_favorites_lifecycle() {
    let db = common::setup_db().await;
    let seller = common::profile(&db, "seller").await;
    let buyer = common::profile(&db, "buyer").await;
    let guitar = common::product(&db, listing(seller.id, "Guitar", 60_000, None)).await;
    let amp = common::product(&db, listing(seller.id, "Amp", 25_000, None)).await;

    assert!(FavoriteRepository::add(buyer.id, guitar.id, Some(&db)).await.unwrap());
    assert!(!FavoriteRepository::add(buyer.id, guitar.id, Some(&db)).await.unwrap());
    assert!(FavoriteRepository::add(buyer.id, amp.id, Some(&db)).await.unwrap());
    assert!(FavoriteRepository::exists(buyer.id, amp.id, Some(&db)).await.unwrap());
    assert!(!FavoriteRepository::exists(seller.id, amp.id, Some(&db)).await.unwrap());

    let page = FavoriteRepository::page_products(buyer.id, PageParams::default(), Some(&db))
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    let titles: Vec<_> = page.records.iter().map(|f| f.product.title.as_str()).collect();
    assert_eq!(titles, ["Amp", "Guitar"]);

    assert_eq!(
        FavoriteRepository::remove(buyer.id, guitar.id, Some(&db))
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        FavoriteRepository::remove(buyer.id, guitar.id, Some(&db))
            .await
            .unwrap(),
        0
    );

    // Deleting the listing cascades to its favorites.
    ProductRepository::delete(amp.id, Some(&db)).await.unwrap();
    assert_eq!(FavoriteRepository::count(Some(&db)).await.unwrap(), 0);
}

#[tokio::test]
async fn test_concurrent_adds_store_one_favorite() {
    let db = common::setup_db().await;
    let seller = common::profile(&db, "seller").await;
    let buyer = common::profile(&db, "buyer").await;
    let lamp = common::product(&db, listing(seller.id, "Lamp", 3_000, None)).await;

    let (first, second) = tokio::join!(
        FavoriteRepository::add(buyer.id, lamp.id, Some(&db)),
        FavoriteRepository::add(buyer.id, lamp.id, Some(&db)),
    );
    let added = [first.unwrap(), second.unwrap()];

    assert_eq!(added.iter().filter(|a| **a).count(), 1);
    assert_eq!(FavoriteRepository::count(Some(&db)).await.unwrap(), 1);
}
