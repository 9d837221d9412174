//! Concurrent submission tests.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use request_distributor::{Method, RequestDraft, Router};

mod common;

#[test]
fn test_threads_keep_exact_fairness() {
    let backends = 4;
    let threads = 8;
    let per_thread = 250;

    let (router, metrics) = common::router_with_backends(backends);
    let router = Arc::new(router);

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let router = router.clone();
            thread::spawn(move || {
                (0..per_thread)
                    .map(|i| {
                        let draft = RequestDraft::new(Method::Post, "/orders")
                            .with_id(format!("{}-{}", t, i));
                        router.submit(draft).backend().unwrap().to_string()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let selections: Vec<String> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    let total = threads * per_thread;
    assert_eq!(selections.len(), total);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.total(), total as u64);
    for backend in router.list_backends() {
        // total is a multiple of the backend count, so every backend gets exactly its share
        assert_eq!(snapshot.count(&backend.id), (total / backends) as u64);
        assert_eq!(backend.handled, (total / backends) as u64);
    }
}

#[test]
fn test_concurrent_logs_keep_every_request() {
    let (router, _) = common::router_with_backends(1);
    let router = Arc::new(router);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let router = router.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    router.submit(
                        RequestDraft::new(Method::Get, "/users").with_id(format!("{}-{}", t, i)),
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let backend = router.backend("Server-1").unwrap();
    let ids: HashSet<_> = backend
        .recent_requests()
        .into_iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(ids.len(), 400);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_tokio_submitters_and_polling_reader() {
    let (router, _) = common::router_with_backends(3);
    let router: Arc<Router> = Arc::new(router);

    let mut tasks = Vec::new();
    for t in 0..6 {
        let router = router.clone();
        tasks.push(tokio::spawn(async move {
            for i in 0..30 {
                let outcome = router.submit(
                    RequestDraft::new(Method::Put, "/products").with_id(format!("{}-{}", t, i)),
                );
                assert!(outcome.is_success());
                tokio::task::yield_now().await;
            }
        }));
    }

    // snapshots taken while submitters run never go backwards
    let reader = {
        let router = router.clone();
        tokio::spawn(async move {
            let mut last = 0;
            for _ in 0..50 {
                let total = router.snapshot_metrics().total();
                assert!(total >= last);
                last = total;
                tokio::task::yield_now().await;
            }
        })
    };

    for task in tasks {
        task.await.unwrap();
    }
    reader.await.unwrap();

    let snapshot = router.snapshot_metrics();
    assert_eq!(snapshot.total(), 180);
    for backend in router.list_backends() {
        assert_eq!(snapshot.count(&backend.id), 60);
    }
}
