use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use yip_catalog::{MAX_PRODUCTS, ProductId};
use yip_client::persistence::{DEFAULT_STORAGE_KEY, decode};
use yip_client::{
    App, ClientConfig, KeyValueStorage, LogAlerter, MemoryStorage, ProductFields,
    RehydrateOutcome, SqliteStorage, TracingRenderer,
};
use yip_core::ValidationError;
use yip_notifications::Severity;

fn config() -> ClientConfig {
    ClientConfig {
        data_dir: std::env::temp_dir().join("yip-scenarios"),
        ..ClientConfig::default()
    }
}

async fn boot(storage: Arc<dyn KeyValueStorage>) -> App {
    yip_observability::tracing::init_for_tests();
    App::boot(&config(), storage, Arc::new(TracingRenderer), Arc::new(LogAlerter)).await
}

fn phone() -> ProductFields {
    ProductFields::new("Phone", 500.0, "u1")
}

#[tokio::test]
async fn adding_to_an_empty_catalog() {
    let mut app = boot(Arc::new(MemoryStorage::new())).await;
    assert_eq!(app.rehydration(), RehydrateOutcome::Empty);

    app.add_product(phone()).unwrap();

    let products = app.state().products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name(), "Phone");
    assert_eq!(products[0].price().value(), 500.0);
    assert_eq!(products[0].image(), "u1");

    app.shutdown().await;
}

#[tokio::test]
async fn sixth_add_is_rejected_with_an_error_notification() {
    let mut app = boot(Arc::new(MemoryStorage::new())).await;
    for i in 0..MAX_PRODUCTS {
        app.add_product(ProductFields::new(format!("p{i}"), 1.0, "u")).unwrap();
    }

    let err = app.add_product(phone()).unwrap_err();

    assert_eq!(err, ValidationError::catalog_full(MAX_PRODUCTS));
    assert_eq!(app.state().product_count(), MAX_PRODUCTS);
    let active = app.state().active_notification().unwrap();
    assert_eq!(active.notification.severity, Severity::Error);
    assert_eq!(
        active.notification.message,
        "You have reached the maximum number of products"
    );

    app.shutdown().await;
}

#[tokio::test]
async fn removing_an_unknown_id_leaves_catalog_but_confirms() {
    let mut app = boot(Arc::new(MemoryStorage::new())).await;
    app.add_product(phone()).unwrap();
    let before = Arc::clone(&app.state().catalog);

    assert!(!app.remove_product(&ProductId::from("nonexistent-id")));
    assert!(Arc::ptr_eq(&before, &app.state().catalog));
    let active = app.state().active_notification().unwrap();
    assert_eq!(active.notification.severity, Severity::Info);
    assert_eq!(active.notification.message, "Product removed successfully");

    app.shutdown().await;
}

#[tokio::test]
async fn catalog_survives_a_restart() {
    let storage = MemoryStorage::new();

    let mut first = boot(Arc::new(storage.clone())).await;
    first.add_product(phone()).unwrap();
    let saved = first.state().products().to_vec();
    first.shutdown().await;

    let second = boot(Arc::new(storage.clone())).await;
    assert_eq!(second.rehydration(), RehydrateOutcome::Restored(1));
    assert_eq!(second.state().products(), saved.as_slice());
    assert!(second.state().active_notification().is_none());

    second.shutdown().await;
}

#[tokio::test]
async fn catalog_survives_a_restart_on_sqlite() {
    let storage = SqliteStorage::in_memory().await.unwrap();

    let mut first = boot(Arc::new(storage.clone())).await;
    first.add_product(phone()).unwrap();
    first.add_product(ProductFields::new("Laptop", 1200.0, "u2")).unwrap();
    let saved = first.state().products().to_vec();
    first.shutdown().await;

    let second = boot(Arc::new(storage)).await;
    assert_eq!(second.rehydration(), RehydrateOutcome::Restored(2));
    assert_eq!(second.state().products(), saved.as_slice());

    second.shutdown().await;
}

#[tokio::test]
async fn adds_are_listed_most_recent_first_and_persisted() {
    let storage = MemoryStorage::new();
    let mut app = boot(Arc::new(storage.clone())).await;

    app.add_product(ProductFields::new("A", 1.0, "a")).unwrap();
    app.add_product(ProductFields::new("B", 2.0, "b")).unwrap();
    app.add_product(ProductFields::new("C", 3.0, "c")).unwrap();
    app.flush().await;

    let names: Vec<&str> = app.state().products().iter().map(|p| p.name()).collect();
    assert_eq!(names, ["C", "B", "A"]);

    let blob = storage.get_item(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
    assert_eq!(decode(&blob).unwrap().products(), app.state().products());

    app.shutdown().await;
}

#[tokio::test]
async fn malformed_blob_boots_empty() {
    let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, "{not json");
    let app = boot(Arc::new(storage)).await;

    assert_eq!(app.rehydration(), RehydrateOutcome::Discarded);
    assert_eq!(app.state().product_count(), 0);

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn newer_notification_preempts_the_older_timer() {
    let mut app = boot(Arc::new(MemoryStorage::new())).await;

    app.add_product(phone()).unwrap();
    tokio::time::sleep(Duration::from_millis(2000)).await;
    app.add_product(ProductFields::default()).unwrap_err();

    let start = tokio::time::Instant::now();
    assert!(app.run_next_expiry().await);
    assert!(start.elapsed() >= Duration::from_millis(3000));
    assert!(app.state().active_notification().is_none());
    assert_eq!(app.state().product_count(), 1);

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn dismissed_notification_does_not_expire_later() {
    let mut app = boot(Arc::new(MemoryStorage::new())).await;

    app.add_product(phone()).unwrap();
    assert!(app.dismiss_notification());
    assert!(!app.dismiss_notification());

    app.add_product(ProductFields::new("Laptop", 1200.0, "u2")).unwrap();
    assert!(app.run_next_expiry().await);
    assert!(app.state().active_notification().is_none());

    app.shutdown().await;
}

#[derive(Debug, Clone)]
enum Op {
    Add(String, f64),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => ("[a-z]{0,6}", -10.0f64..1000.0)
            .prop_map(|(name, price)| Op::Add(name, price)),
        1 => (0usize..8).prop_map(Op::Remove),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn catalog_length_tracks_successful_commands(ops in prop::collection::vec(op(), 0..30)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let mut app = boot(Arc::new(MemoryStorage::new())).await;
            let (mut added, mut removed) = (0usize, 0usize);

            for op in ops {
                match op {
                    Op::Add(name, price) => {
                        let expect_ok = !name.trim().is_empty()
                            && price >= 0.0
                            && app.state().product_count() < MAX_PRODUCTS;
                        let result = app.add_product(ProductFields::new(name, price, "u"));
                        assert_eq!(result.is_ok(), expect_ok);
                        if result.is_ok() {
                            added += 1;
                        }
                    }
                    Op::Remove(index) => {
                        let id = app
                            .state()
                            .products()
                            .get(index)
                            .map(|p| p.id_typed().clone())
                            .unwrap_or_else(|| ProductId::from("nonexistent-id"));
                        if app.remove_product(&id) {
                            removed += 1;
                        }
                    }
                }
                assert!(app.state().product_count() <= MAX_PRODUCTS);
                assert_eq!(app.state().product_count(), added - removed);
            }

            app.shutdown().await;
        });
    }
}
