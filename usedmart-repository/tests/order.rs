mod common;

use common::listing;
use sea_orm::DatabaseConnection;
use usedmart_core::ordering::product_status_on;
use usedmart_error::storage::StorageError;
use usedmart_models::{
    domain::prelude::{NewOrder, OrderFilter},
    entities::prelude::{OrderModel, ProductModel},
    enums::{order::OrderStatus, product::ProductStatus},
};
use usedmart_repository::{OrderRepository, ProductRepository};

async fn pending_order(db: &DatabaseConnection, product: &ProductModel, buyer_id: i32) -> OrderModel {
    OrderRepository::create(
        NewOrder {
            product_id: product.id,
            buyer_id,
            seller_id: product.seller_id,
            amount: product.price,
            status: OrderStatus::Pending,
            shipping_address: Some("1 Main St".into()),
            note: None,
        },
        Some(db),
    )
    .await
    .unwrap()
}

async fn product_status(db: &DatabaseConnection, id: i32) -> ProductStatus {
    ProductRepository::find_by_id(id, Some(db))
        .await
        .unwrap()
        .unwrap()
        .status
}

#[tokio::test]
async fn test_confirmation_marks_product_sold() {
    let db = common::setup_db().await;
    let seller = common::profile(&db, "seller").await;
    let buyer = common::profile(&db, "buyer").await;
    let camera = common::product(&db, listing(seller.id, "Camera", 99_000, None)).await;

    let order = pending_order(&db, &camera, buyer.id).await;
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(product_status(&db, camera.id).await, ProductStatus::Active);

    let confirmed = OrderRepository::update_status(
        order,
        OrderStatus::Confirmed,
        product_status_on(OrderStatus::Confirmed),
        Some(&db),
    )
    .await
    .unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
    assert_eq!(product_status(&db, camera.id).await, ProductStatus::Sold);

    let shipped = OrderRepository::update_status(
        confirmed,
        OrderStatus::Shipped,
        product_status_on(OrderStatus::Shipped),
        Some(&db),
    )
    .await
    .unwrap();
    let completed = OrderRepository::update_status(
        shipped,
        OrderStatus::Completed,
        product_status_on(OrderStatus::Completed),
        Some(&db),
    )
    .await
    .unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    assert_eq!(product_status(&db, camera.id).await, ProductStatus::Sold);

    assert_eq!(
        OrderRepository::count_by_status(OrderStatus::Completed, Some(&db))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_listing_cannot_be_confirmed_twice() {
    let db = common::setup_db().await;
    let seller = common::profile(&db, "seller").await;
    let first_buyer = common::profile(&db, "first").await;
    let second_buyer = common::profile(&db, "second").await;
    let bike = common::product(&db, listing(seller.id, "Bike", 150_000, None)).await;

    let first = pending_order(&db, &bike, first_buyer.id).await;
    let second = pending_order(&db, &bike, second_buyer.id).await;

    OrderRepository::update_status(
        first,
        OrderStatus::Confirmed,
        product_status_on(OrderStatus::Confirmed),
        Some(&db),
    )
    .await
    .unwrap();

    let second_id = second.id;
    let err = OrderRepository::update_status(
        second,
        OrderStatus::Confirmed,
        product_status_on(OrderStatus::Confirmed),
        Some(&db),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StorageError::InvalidState(_)));

    // The refused confirmation left the order untouched.
    let second = OrderRepository::find_by_id(second_id, Some(&db))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.status, OrderStatus::Pending);
    assert_eq!(
        OrderRepository::count_by_status(OrderStatus::Confirmed, Some(&db))
            .await
            .unwrap(),
        1
    );
    assert_eq!(product_status(&db, bike.id).await, ProductStatus::Sold);

    // Cancelling the leftover order needs no product change.
    let cancelled = OrderRepository::update_status(
        second,
        OrderStatus::Cancelled,
        product_status_on(OrderStatus::Cancelled),
        Some(&db),
    )
    .await
    .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn test_page_by_party() {
    let db = common::setup_db().await;
    let seller = common::profile(&db, "seller").await;
    let buyer = common::profile(&db, "buyer").await;
    let other = common::profile(&db, "other").await;

    for (title, buyer_id) in [("Chair", buyer.id), ("Table", buyer.id), ("Rug", other.id)] {
        let product = common::product(&db, listing(seller.id, title, 5_000, None)).await;
        OrderRepository::create(
            NewOrder {
                product_id: product.id,
                buyer_id,
                seller_id: seller.id,
                amount: product.price,
                status: OrderStatus::Pending,
                shipping_address: None,
                note: None,
            },
            Some(&db),
        )
        .await
        .unwrap();
    }

    let as_buyer = OrderRepository::page(
        OrderFilter {
            buyer_id: Some(buyer.id),
            ..Default::default()
        },
        Some(&db),
    )
    .await
    .unwrap();
    assert_eq!(as_buyer.total, 2);
    assert!(as_buyer.records[0].id > as_buyer.records[1].id);

    let as_seller = OrderRepository::page(
        OrderFilter {
            seller_id: Some(seller.id),
            status: Some(OrderStatus::Pending),
            ..Default::default()
        },
        Some(&db),
    )
    .await
    .unwrap();
    assert_eq!(as_seller.total, 3);

    let cancelled = OrderRepository::page(
        OrderFilter {
            status: Some(OrderStatus::Cancelled),
            ..Default::default()
        },
        Some(&db),
    )
    .await
    .unwrap();
    assert_eq!(cancelled.total, 0);
}
