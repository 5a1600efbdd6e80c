mod common;

use common::{COMPUTERS, ELECTRONICS, FURNITURE, PHONES};
use usedmart_repository::CategoryRepository;

#[tokio::test]
async fn test_seeded_tree() {
    let db = common::setup_db().await;
    let tree = CategoryRepository::find_tree(true, Some(&db)).await.unwrap();

    let electronics = tree.iter().find(|c| c.id == ELECTRONICS).unwrap();
    let children: Vec<_> = electronics.children.iter().map(|c| c.id).collect();
    assert!(children.contains(&PHONES) && children.contains(&COMPUTERS));
    assert!(tree.iter().all(|c| c.parent_id.is_none()));
    assert!(!tree.iter().any(|c| c.id == FURNITURE));
}

#[tokio::test]
async fn test_descendants_and_children() {
    let db = common::setup_db().await;
    let mut ids = CategoryRepository::find_descendant_ids(ELECTRONICS, Some(&db))
        .await
        .unwrap();
    ids.sort_unstable();
    assert_eq!(ids, vec![ELECTRONICS, PHONES, COMPUTERS]);

    assert_eq!(
        CategoryRepository::find_descendant_ids(PHONES, Some(&db))
            .await
            .unwrap(),
        vec![PHONES]
    );
    assert!(CategoryRepository::has_children(ELECTRONICS, Some(&db))
        .await
        .unwrap());
    assert!(!CategoryRepository::has_children(PHONES, Some(&db))
        .await
        .unwrap());
    assert!(CategoryRepository::exists_by_slug("electronics", Some(&db))
        .await
        .unwrap());
}
