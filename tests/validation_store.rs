use std::sync::Arc;

use chrono::Utc;
use pricehawk_api::{
    models::{ManualComparisonData, ProductId, ValidationStatus},
    storage::{KeyValueStore, MemoryStore},
    stores::{DEFAULT_NAMESPACE, ManualEntryStore, ValidationStore},
};

fn store() -> (Arc<MemoryStore>, ValidationStore) {
    let storage = Arc::new(MemoryStore::new());
    let validation = ValidationStore::new(storage.clone(), DEFAULT_NAMESPACE);
    (storage, validation)
}

#[tokio::test]
async fn statuses_are_kept_per_product_and_match() {
    let (_, validation) = store();
    let drill = ProductId::parse("prod-002");
    let paint = ProductId::parse("prod-001");

    validation
        .set_status(&drill, "homepro_2234561", ValidationStatus::Correct)
        .await;
    validation
        .set_status(&drill, "dohome_2234561", ValidationStatus::Incorrect)
        .await;
    validation
        .set_status(&drill, "homepro_2234561", ValidationStatus::Incorrect)
        .await;

    assert_eq!(
        validation.get_status(&drill, "homepro_2234561").await,
        Some(ValidationStatus::Incorrect)
    );
    assert_eq!(validation.get_all_statuses(&drill).await.len(), 2);
    assert_eq!(validation.get_status(&paint, "homepro_2234561").await, None);
    assert!(validation.get_all_statuses(&paint).await.is_empty());
}

#[tokio::test]
async fn clearing_one_product_leaves_others() {
    let (_, validation) = store();
    let first = ProductId::parse("prod-001");
    let second = ProductId::parse("manual_1736900000000_1145439");

    validation.set_status(&first, "homepro_1", ValidationStatus::Correct).await;
    validation.set_status(&second, "homepro_2", ValidationStatus::Incorrect).await;
    validation.clear_statuses(&first).await;

    let all = validation.get_all_statuses_across_products().await;
    assert_eq!(all.len(), 1);
    assert!(all[&second].contains_key("homepro_2"));
    assert!(all.keys().all(|id| id.is_manual()));
}

#[tokio::test]
async fn corrupt_record_reads_as_empty_and_is_skipped_in_scan() {
    let (storage, validation) = store();
    let broken = ProductId::parse("prod-003");
    let healthy = ProductId::parse("prod-004");

    storage
        .set(&format!("{DEFAULT_NAMESPACE}validation_prod-003"), "{not json")
        .await
        .expect("seed corrupt record");
    validation.set_status(&healthy, "dohome_4456783", ValidationStatus::Correct).await;

    assert!(validation.get_all_statuses(&broken).await.is_empty());

    let all = validation.get_all_statuses_across_products().await;
    assert_eq!(all.len(), 1);
    assert!(all.contains_key(&healthy));

    validation.set_status(&broken, "homepro_3345672", ValidationStatus::Incorrect).await;
    assert_eq!(
        validation.get_status(&broken, "homepro_3345672").await,
        Some(ValidationStatus::Incorrect)
    );
}

#[tokio::test]
async fn namespaces_do_not_see_each_other() {
    let storage = Arc::new(MemoryStore::new());
    let a = ValidationStore::new(storage.clone(), "tenant_a_");
    let b = ValidationStore::new(storage, "tenant_b_");
    let id = ProductId::parse("prod-001");

    a.set_status(&id, "homepro_1145439", ValidationStatus::Correct).await;

    assert!(b.get_all_statuses(&id).await.is_empty());
    assert!(b.get_all_statuses_across_products().await.is_empty());
}

#[tokio::test]
async fn manual_entry_store_refuses_collection_key() {
    let storage = Arc::new(MemoryStore::new());
    let entries = ManualEntryStore::new(storage, DEFAULT_NAMESPACE);

    assert!(!entries.accepts(&ProductId::parse("products")));
    assert!(!entries.accepts(&ProductId::parse("")));
    assert!(entries.accepts(&ProductId::parse("prod-001")));
}

fn manual_entry(price: f64) -> ManualComparisonData {
    ManualComparisonData {
        retailer: "HOMEPRO".to_string(),
        product_name: "TOA SuperShield 9L".to_string(),
        sku: "HP-1145439".to_string(),
        price,
        url: "https://www.homepro.co.th/p/1145439".to_string(),
        image_url: None,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn manual_entries_are_kept_per_product() {
    let storage = Arc::new(MemoryStore::new());
    let entries = ManualEntryStore::new(storage, DEFAULT_NAMESPACE);
    let paint = ProductId::parse("prod-001");
    let drill = ProductId::parse("prod-002");

    assert!(entries.get(&paint).await.is_none());

    assert!(entries.set(&paint, &manual_entry(1890.0)).await);
    assert!(entries.set(&paint, &manual_entry(1850.0)).await);
    assert_eq!(entries.get(&paint).await.map(|e| e.price), Some(1850.0));
    assert!(entries.get(&drill).await.is_none());

    entries.clear(&paint).await;
    assert!(entries.get(&paint).await.is_none());
}

#[tokio::test]
async fn manual_entries_live_next_to_manual_products_without_clashing() {
    let storage = Arc::new(MemoryStore::new());
    let entries = ManualEntryStore::new(storage.clone(), DEFAULT_NAMESPACE);
    let id = ProductId::parse("prod-001");

    assert!(entries.set(&id, &manual_entry(1890.0)).await);
    assert!(!entries.set(&ProductId::parse("products"), &manual_entry(1.0)).await);

    let keys = storage
        .keys_with_prefix(&format!("{DEFAULT_NAMESPACE}manual_"))
        .await
        .expect("keys");
    assert_eq!(keys, vec![format!("{DEFAULT_NAMESPACE}manual_prod-001")]);

    storage
        .set(&format!("{DEFAULT_NAMESPACE}manual_prod-001"), "{broken")
        .await
        .expect("seed corrupt entry");
    assert!(entries.get(&id).await.is_none());
}
