mod common;

use common::listing;
use usedmart_core::{group_conversations, unread_message_ids};
use usedmart_models::domain::prelude::{MessagePageParams, NewMessage};
use usedmart_repository::MessageRepository;

#[tokio::test]
async fn test_inbox_groups_by_product_and_counterpart() {
    let db = common::setup_db().await;
    let seller = common::profile(&db, "seller").await;
    let alice = common::profile(&db, "alice").await;
    let bob = common::profile(&db, "bob").await;
    let phone = common::product(&db, listing(seller.id, "Phone", 10_000, None)).await;
    let lamp = common::product(&db, listing(seller.id, "Lamp", 2_000, None)).await;

    let send = |from: i32, to: i32, product: i32, text: &str| {
        NewMessage::unread(from, to, product, text.to_string())
    };
    for message in [
        send(alice.id, seller.id, phone.id, "Is the phone available?"),
        send(seller.id, alice.id, phone.id, "Yes"),
        send(bob.id, seller.id, phone.id, "Any scratches?"),
        send(alice.id, seller.id, lamp.id, "And the lamp?"),
        send(alice.id, seller.id, phone.id, "Great, I'll take it"),
    ] {
        MessageRepository::create(message, Some(&db)).await.unwrap();
    }

    let rows = MessageRepository::find_for_profile(seller.id, Some(&db))
        .await
        .unwrap();
    assert_eq!(rows.len(), 5);

    let conversations = group_conversations(seller.id, rows);
    assert_eq!(conversations.len(), 3);

    let with_alice_phone = conversations
        .iter()
        .find(|c| c.key.product_id == phone.id && c.key.counterpart_id == alice.id)
        .unwrap();
    assert_eq!(with_alice_phone.messages.len(), 3);
    assert_eq!(with_alice_phone.unread_count, 2);
    assert_eq!(with_alice_phone.last_message.content, "Great, I'll take it");

    let with_bob = conversations
        .iter()
        .find(|c| c.key.counterpart_id == bob.id)
        .unwrap();
    assert_eq!(with_bob.unread_count, 1);

    assert_eq!(
        MessageRepository::count_unread(seller.id, Some(&db))
            .await
            .unwrap(),
        4
    );
    assert_eq!(
        MessageRepository::count_unread(alice.id, Some(&db))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_thread_is_chronological_and_marks_read() {
    let db = common::setup_db().await;
    let seller = common::profile(&db, "seller").await;
    let buyer = common::profile(&db, "buyer").await;
    let other = common::profile(&db, "other").await;
    let bike = common::product(&db, listing(seller.id, "Bike", 30_000, None)).await;

    for (from, to, text) in [
        (buyer.id, seller.id, "first"),
        (seller.id, buyer.id, "second"),
        (other.id, seller.id, "not in this thread"),
        (buyer.id, seller.id, "third"),
    ] {
        MessageRepository::create(NewMessage::unread(from, to, bike.id, text.into()), Some(&db))
            .await
            .unwrap();
    }

    let thread = MessageRepository::find_thread(seller.id, buyer.id, bike.id, Some(&db))
        .await
        .unwrap();
    let contents: Vec<_> = thread.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["first", "second", "third"]);

    let unread = unread_message_ids(seller.id, &thread);
    assert_eq!(unread.len(), 2);
    assert_eq!(
        MessageRepository::mark_read(unread, Some(&db))
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        MessageRepository::mark_read(vec![], Some(&db))
            .await
            .unwrap(),
        0
    );

    // Only the message from `other` is left.
    assert_eq!(
        MessageRepository::count_unread(seller.id, Some(&db))
            .await
            .unwrap(),
        1
    );
    // The seller's reply stays unread for the buyer.
    assert_eq!(
        MessageRepository::count_unread(buyer.id, Some(&db))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_admin_page_filters_by_content() {
    let db = common::setup_db().await;
    let seller = common::profile(&db, "seller").await;
    let buyer = common::profile(&db, "buyer").await;
    let sofa = common::product(&db, listing(seller.id, "Sofa", 50_000, None)).await;

    for text in ["hello", "cheaper please?", "hello again"] {
        MessageRepository::create(
            NewMessage::unread(buyer.id, seller.id, sofa.id, text.into()),
            Some(&db),
        )
        .await
        .unwrap();
    }

    let page = MessageRepository::page(
        MessagePageParams {
            content: Some("hello".into()),
            ..Default::default()
        },
        Some(&db),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.records[0].content, "hello again");

    let first = page.records[1].id;
    assert_eq!(MessageRepository::delete(first, Some(&db)).await.unwrap(), 1);
    assert_eq!(MessageRepository::count(Some(&db)).await.unwrap(), 2);
}
