mod common;

use common::{listing, COMPUTERS, ELECTRONICS, FURNITURE, PHONES};
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use usedmart_core::{
    view_gate::{CachedViewMarkers, SkipReason},
    ViewGate, ViewOutcome, ViewRequest,
};
use usedmart_models::{
    cache::UMBaseCache,
    domain::prelude::{PageParams, ProductFilter},
    enums::product::{ProductSort, ProductStatus},
};
use usedmart_repository::{CategoryRepository, ProductRepository, ProductViewCounter};
use usedmart_storage::MokaCache;

fn catalog(filter: ProductFilter) -> ProductFilter {
    ProductFilter {
        statuses: Some(vec![ProductStatus::Active]),
        ..filter
    }
}

async fn seed_catalog(db: &DatabaseConnection) -> i32 {
    let seller = common::profile(db, "seller").await;
    common::product(db, listing(seller.id, "iPhone 12", 180_000, Some(PHONES))).await;
    common::product(db, listing(seller.id, "ThinkPad X1", 320_000, Some(COMPUTERS))).await;
    common::product(db, listing(seller.id, "Oak desk", 45_000, Some(FURNITURE))).await;
    let mut hidden = listing(seller.id, "Pixel 6", 90_000, Some(PHONES));
    hidden.status = ProductStatus::Pending;
    common::product(db, hidden).await;
    seller.id
}

#[tokio::test]
async fn test_catalog_shows_active_only() {
    let db = common::setup_db().await;
    seed_catalog(&db).await;

    let page = ProductRepository::page(catalog(ProductFilter::default()), Some(&db))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert!(page.records.iter().all(|p| p.status == ProductStatus::Active));
}

#[tokio::test]
async fn test_category_filter_includes_descendants() {
    let db = common::setup_db().await;
    seed_catalog(&db).await;

    let ids = CategoryRepository::find_descendant_ids(ELECTRONICS, Some(&db))
        .await
        .unwrap();
    assert!(ids.contains(&PHONES) && ids.contains(&COMPUTERS));
    assert!(!ids.contains(&FURNITURE));

    let page = ProductRepository::page(
        catalog(ProductFilter {
            category_ids: Some(ids),
            sort: ProductSort::PriceAsc,
            ..Default::default()
        }),
        Some(&db),
    )
    .await
    .unwrap();
    let titles: Vec<_> = page.records.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["iPhone 12", "ThinkPad X1"]);
}

#[tokio::test]
async fn test_search_and_price_range() {
    let db = common::setup_db().await;
    seed_catalog(&db).await;

    let page = ProductRepository::page(
        catalog(ProductFilter {
            search: Some("desk".into()),
            ..Default::default()
        }),
        Some(&db),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.records[0].title, "Oak desk");

    let page = ProductRepository::page(
        catalog(ProductFilter {
            min_price: Some(100_000),
            max_price: Some(200_000),
            sort: ProductSort::PriceDesc,
            ..Default::default()
        }),
        Some(&db),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.records[0].price, 180_000);
}

#[tokio::test]
async fn test_pagination() {
    let db = common::setup_db().await;
    seed_catalog(&db).await;

    let page = ProductRepository::page(
        ProductFilter {
            page: PageParams {
                page: Some(2),
                page_size: Some(3),
            },
            ..Default::default()
        },
        Some(&db),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.pages, 2);
    assert_eq!(page.records.len(), 1);
}

#[tokio::test]
async fn test_status_change_and_open_listing_count() {
    let db = common::setup_db().await;
    let seller = seed_catalog(&db).await;
    assert_eq!(
        ProductRepository::count_open_by_seller(seller, Some(&db))
            .await
            .unwrap(),
        4
    );

    let desk = common::product(&db, listing(seller, "Bookshelf", 20_000, None)).await;
    let rejected = ProductRepository::update_status(
        desk.id,
        ProductStatus::Rejected,
        Some(Some("blurry photos".into())),
        Some(&db),
    )
    .await
    .unwrap();
    assert_eq!(rejected.status, ProductStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("blurry photos"));
    assert_eq!(rejected.title, "Bookshelf");

    assert_eq!(
        ProductRepository::count_open_by_seller(seller, Some(&db))
            .await
            .unwrap(),
        4
    );
    assert_eq!(
        ProductRepository::count_by_status(ProductStatus::Rejected, Some(&db))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_view_gate_counts_once_per_browser() {
    let db = common::setup_db().await;
    let seller = common::profile(&db, "seller").await;
    let product = common::product(&db, listing(seller.id, "Road bike", 150_000, None)).await;

    let markers: Arc<dyn UMBaseCache<Value = i64> + Send + Sync> = Arc::new(MokaCache::<i64>::new(
        "ViewMarker".into(),
        "test:ViewMarker".into(),
        Some(100),
        Some(Duration::from_secs(3600)),
    ));
    let counts: Arc<dyn UMBaseCache<Value = i64> + Send + Sync> = Arc::new(MokaCache::<i64>::new(
        "ProductView".into(),
        "test:ProductView".into(),
        Some(100),
        None,
    ));
    let gate = ViewGate::new(
        Arc::new(CachedViewMarkers::new(markers, Duration::from_secs(3600))),
        Arc::new(ProductViewCounter::new(counts.clone(), Some(db.clone()))),
    );

    let view = |current_count: i64| ViewRequest {
        product_id: product.id,
        owner_id: seller.id,
        viewer_id: None,
        status: ProductStatus::Active,
        current_count,
        visitor: "browser-a".into(),
    };

    assert_eq!(gate.record_view(view(0)).await.unwrap(), ViewOutcome::Counted(1));
    assert_eq!(
        gate.record_view(view(1)).await.unwrap(),
        ViewOutcome::Skipped(SkipReason::AlreadyViewed)
    );

    let stored = ProductRepository::find_by_id(product.id, Some(&db))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.view_count, 1);
    assert_eq!(counts.get(product.id.to_string()).await.unwrap(), Some(1));

    assert!(gate.clear_marker("browser-a", product.id).await.unwrap());
    assert_eq!(gate.record_view(view(1)).await.unwrap(), ViewOutcome::Counted(2));

    // a detail page loaded before the last increment still counts on top of it
    let stale = ViewRequest {
        visitor: "browser-b".into(),
        ..view(0)
    };
    assert_eq!(gate.record_view(stale).await.unwrap(), ViewOutcome::Counted(3));
    let stored = ProductRepository::find_by_id(product.id, Some(&db))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.view_count, 3);
}
