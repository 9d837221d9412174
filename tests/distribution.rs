//! Distribution behaviour through the public router API.

use std::sync::{Arc, Mutex};

use request_distributor::{
    FailureReason, Marker, Method, MetricsObserver, Pipeline, RequestDraft, Router, StageKind,
};

mod common;

use common::{FailingObserver, Notification, RecordingObserver};

fn draft(i: usize) -> RequestDraft {
    RequestDraft::new(Method::Get, "/users").with_id(i.to_string())
}

#[test]
fn test_four_backends_ten_requests() {
    let (router, _metrics) = common::router_with_backends(4);

    let outcomes: Vec<_> = (0..10).map(|i| router.submit(draft(i))).collect();

    let selected: Vec<_> = outcomes.iter().map(|o| o.backend().unwrap()).collect();
    assert_eq!(
        selected,
        vec![
            "Server-1", "Server-2", "Server-3", "Server-4", "Server-1", "Server-2", "Server-3",
            "Server-4", "Server-1", "Server-2",
        ]
    );

    let snapshot = router.snapshot_metrics();
    assert_eq!(snapshot.count("Server-1"), 3);
    assert_eq!(snapshot.count("Server-2"), 3);
    assert_eq!(snapshot.count("Server-3"), 2);
    assert_eq!(snapshot.count("Server-4"), 2);
    assert_eq!(snapshot.total(), 10);

    for outcome in &outcomes {
        let request = outcome.request().unwrap();
        assert!(request.is_marked(Marker::Authenticated));
        assert!(request.is_marked(Marker::Logged));
        assert!(request.is_marked(Marker::Validated));
    }
}

#[test]
fn test_round_robin_counts_for_many_sizes() {
    for k in 1..=6 {
        for n in [0usize, 1, k - 1, k, k + 1, 3 * k + 2, 50] {
            let (router, _) = common::router_with_backends(k);
            let selected: Vec<String> = (0..n)
                .map(|i| router.submit(draft(i)).backend().unwrap().to_string())
                .collect();

            for (i, id) in selected.iter().enumerate() {
                assert_eq!(id, &format!("Server-{}", i % k + 1), "k={} n={} i={}", k, n, i);
            }

            let snapshot = router.snapshot_metrics();
            assert_eq!(snapshot.total(), n as u64);
            for backend in router.list_backends() {
                let count = snapshot.count(&backend.id) as usize;
                assert!(count == n / k || count == n.div_ceil(k), "k={} n={}", k, n);
                assert_eq!(backend.handled as usize, count);
            }
        }
    }
}

#[test]
fn test_no_backends_fails_without_side_effects() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let metrics = Arc::new(MetricsObserver::new());
    let router = Router::new(Pipeline::standard())
        .with_observer(Arc::new(RecordingObserver::new("recorder", log.clone())))
        .with_metrics(metrics.clone());

    for i in 0..3 {
        let outcome = router.submit(draft(i));
        assert!(!outcome.is_success());
        assert_eq!(outcome.reason(), Some(FailureReason::NoBackendsAvailable));
        assert!(outcome.request().is_none());
    }

    assert!(log.lock().unwrap().is_empty());
    assert!(metrics.snapshot().is_empty());
    assert!(router.list_backends().is_empty());
    assert!(router.history().is_empty());
}

#[test]
fn test_registering_after_unavailable_recovers() {
    let router = Router::new(Pipeline::standard());
    assert!(!router.submit(draft(0)).is_success());

    router.register_backend("late").unwrap();
    assert_eq!(router.submit(draft(1)).backend(), Some("late"));
}

#[test]
fn test_observer_notification_order_is_registration_order() {
    for _ in 0..3 {
        let log = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new(Pipeline::standard())
            .with_observer(Arc::new(RecordingObserver::new("first", log.clone())))
            .with_observer(Arc::new(RecordingObserver::new("second", log.clone())))
            .with_observer(Arc::new(RecordingObserver::new("third", log.clone())));
        router.register_backend("a").unwrap();
        router.register_backend("b").unwrap();

        router.submit(draft(1));
        router.submit(draft(2));

        let log = log.lock().unwrap();
        let expected: Vec<Notification> = [("1", "a"), ("2", "b")]
            .iter()
            .flat_map(|(request, backend)| {
                ["first", "second", "third"].map(|observer| Notification {
                    observer,
                    request_id: request.to_string(),
                    backend: backend.to_string(),
                })
            })
            .collect();
        assert_eq!(*log, expected);
    }
}

#[test]
fn test_faulty_observer_does_not_change_outcome() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let metrics = Arc::new(MetricsObserver::new());
    let router = Router::new(Pipeline::standard())
        .with_observer(Arc::new(FailingObserver))
        .with_observer(Arc::new(RecordingObserver::new("after", log.clone())))
        .with_metrics(metrics.clone());
    router.register_backend("a").unwrap();

    for i in 0..5 {
        let outcome = router.submit(draft(i));
        assert!(outcome.is_success());
        assert!(outcome.request().unwrap().is_marked(Marker::Validated));
    }

    assert_eq!(log.lock().unwrap().len(), 5);
    assert_eq!(metrics.snapshot().count("a"), 5);
}

#[test]
fn test_custom_stage_order_is_kept() {
    let router = Router::new(Pipeline::from_kinds(&[
        StageKind::Validation,
        StageKind::Logging,
        StageKind::Authentication,
    ]));
    router.register_backend("a").unwrap();

    let outcome = router.submit(draft(0));
    let markers: Vec<_> = outcome.request().unwrap().markers().collect();
    assert_eq!(
        markers,
        vec![Marker::Validated, Marker::Logged, Marker::Authenticated]
    );
}

#[test]
fn test_backend_log_holds_processed_requests() {
    let (router, _) = common::router_with_backends(2);
    for i in 0..4 {
        router.submit(draft(i));
    }

    let backend = router.backend("Server-2").unwrap();
    let ids: Vec<_> = backend
        .recent_requests()
        .iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert!(backend
        .recent_requests()
        .iter()
        .all(|r| r.markers().count() == 3));
}

#[test]
fn test_history_is_newest_first() {
    let (router, _) = common::router_with_backends(3);
    for i in 0..5 {
        router.submit(draft(i));
    }

    let ids: Vec<_> = router
        .history()
        .iter()
        .map(|o| o.request().unwrap().id.to_string())
        .collect();
    assert_eq!(ids, vec!["4", "3", "2", "1", "0"]);
}

#[test]
fn test_independent_routers_do_not_share_state() {
    let (a, _) = common::router_with_backends(2);
    let (b, _) = common::router_with_backends(2);

    a.submit(draft(0));
    a.submit(draft(1));

    assert_eq!(b.submit(draft(2)).backend(), Some("Server-1"));
    assert_eq!(a.snapshot_metrics().total(), 2);
    assert_eq!(b.snapshot_metrics().total(), 1);
}

#[test]
fn test_outcome_json_shape() {
    let (router, _) = common::router_with_backends(1);
    let outcome = router.submit(RequestDraft::new(Method::Delete, "/orders").with_id("99"));

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "completed");
    assert_eq!(json["backend"], "Server-1");
    assert_eq!(json["request"]["id"], "99");
    assert_eq!(json["request"]["method"], "DELETE");
    assert_eq!(json["request"]["path"], "/orders");

    let empty = Router::new(Pipeline::standard());
    let json = serde_json::to_value(empty.submit(draft(0))).unwrap();
    assert_eq!(json["status"], "failed");
    assert_eq!(json["reason"], "no backends available");
}
