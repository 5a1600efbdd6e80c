mod common;

use common::listing;
use usedmart_models::enums::product::ProductStatus;
use usedmart_repository::StatsRepository;

#[tokio::test]
async fn test_collect_counts_by_status() {
    let db = common::setup_db().await;
    let seller = common::profile(&db, "seller").await;
    common::product(&db, listing(seller.id, "Kettle", 1_500, None)).await;
    let mut pending = listing(seller.id, "Toaster", 2_500, None);
    pending.status = ProductStatus::Pending;
    common::product(&db, pending).await;

    let stats = StatsRepository::collect(Some(&db)).await.unwrap();
    // The seeded admin plus the seller.
    assert_eq!(stats.total_profiles, 2);
    assert_eq!(stats.total_products, 2);
    assert_eq!(stats.active_products, 1);
    assert_eq!(stats.pending_products, 1);
    assert_eq!(stats.sold_products, 0);
    assert_eq!(stats.products_by_status.get("sold"), Some(&0));
    assert_eq!(stats.total_roles, 3);
    assert!(stats.total_categories >= 9);
}
