//! Synchronizer behavior against the in-memory catalog

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tour_catalog::{InMemoryTourCatalog, TourCatalog};
use tour_core::TourEvent;
use tour_sync::{DocumentTourSynchronizer, MemoryDocument, SyncConfig, TourDocument, ToursChanged};
use tour_test_utils::{
    capture_logs, doc_tour_id, document_with_tours, malformed_definition_json, ranked_definition_json,
    sample_definition_json, set_tours, setup_synchronizer, Recorder,
};

#[test]
fn test_attach_is_idempotent() {
    let (_, sync) = setup_synchronizer();
    let changes = Recorder::attach(sync.tours_changed());
    let doc = document_with_tours("d", vec![sample_definition_json("a")]);

    assert!(sync.attach(&doc).is_some());
    assert!(sync.attach(&doc).is_none());
    assert_eq!(changes.count(), 1);

    set_tours(&doc, vec![sample_definition_json("b")]);
    assert_eq!(changes.count(), 2);
    assert_eq!(doc.metadata_changed().unwrap().subscriber_count(), 1);
}

#[test]
fn test_recompute_from_scratch() {
    let (catalog, sync) = setup_synchronizer();
    let doc = document_with_tours(
        "d",
        vec![sample_definition_json("A"), sample_definition_json("B")],
    );
    sync.attach(&doc);
    let old_b = catalog.get(&doc_tour_id("d", "B")).unwrap();

    set_tours(
        &doc,
        vec![sample_definition_json("B"), sample_definition_json("C")],
    );

    assert_eq!(
        sync.tour_ids(doc.as_ref()),
        vec![doc_tour_id("d", "B"), doc_tour_id("d", "C")]
    );
    assert!(catalog.get(&doc_tour_id("d", "A")).is_none());
    let new_b = catalog.get(&doc_tour_id("d", "B")).unwrap();
    assert!(!Arc::ptr_eq(&old_b, &new_b));
}

#[test]
fn test_namespace_isolation() {
    let (catalog, sync) = setup_synchronizer();
    let one = document_with_tours("one", vec![sample_definition_json("intro")]);
    let two = document_with_tours("two", vec![sample_definition_json("intro")]);
    sync.attach(&one);
    sync.attach(&two);

    assert_eq!(catalog.len(), 2);
    assert_eq!(sync.tour_ids(one.as_ref()), vec![doc_tour_id("one", "intro")]);
    assert_eq!(sync.tour_ids(two.as_ref()), vec![doc_tour_id("two", "intro")]);

    set_tours(&one, Vec::new());
    assert!(sync.tour_ids(one.as_ref()).is_empty());
    assert_eq!(sync.tour_ids(two.as_ref()), vec![doc_tour_id("two", "intro")]);
}

#[test]
fn test_prefix_sharing_document_ids_stay_apart() {
    let (_, sync) = setup_synchronizer();
    let short = document_with_tours("a", vec![sample_definition_json("x")]);
    let long = document_with_tours("a:b", vec![sample_definition_json("x")]);
    sync.attach(&short);
    sync.attach(&long);

    assert_eq!(sync.tour_ids(short.as_ref()).len(), 1);
    assert_eq!(sync.tour_ids(long.as_ref()).len(), 1);
}

#[test]
fn test_partial_failure_isolation() {
    let (catalog, sync) = setup_synchronizer();
    let doc = document_with_tours(
        "d",
        vec![
            sample_definition_json("valid1"),
            malformed_definition_json("broken"),
            sample_definition_json("valid2"),
        ],
    );

    let report = sync.attach(&doc).unwrap();

    assert_eq!(
        report.registered,
        vec![doc_tour_id("d", "valid1"), doc_tour_id("d", "valid2")]
    );
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id.as_deref(), Some("broken"));
    assert_eq!(report.failed[0].label.as_deref(), Some("Broken broken"));
    assert_eq!(catalog.len(), 2);
}

#[test]
fn test_malformed_definition_logs_one_diagnostic() {
    let (_, sync) = setup_synchronizer();
    let doc = document_with_tours(
        "d",
        vec![
            sample_definition_json("valid1"),
            malformed_definition_json("broken"),
            sample_definition_json("valid2"),
        ],
    );

    let (_, events) = capture_logs(|| sync.attach(&doc));

    let errors: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::ERROR)
        .collect();
    assert_eq!(errors.len(), 1);
    let error = errors[0];
    assert_eq!(error.field("document"), Some("d"));
    assert_eq!(error.field("tour"), Some("broken"));
    assert_eq!(error.field("label"), Some("Broken broken"));
    assert_eq!(error.field("steps"), Some("\"not-a-list\""));
    assert_eq!(error.field("options"), Some("null"));
    assert!(error.field("error").is_some());
    assert_eq!(
        error.field("message"),
        Some("Error encountered adding document tour Broken broken (broken)")
    );
}

#[test]
fn test_invalid_steps_are_rejected() {
    let (catalog, sync) = setup_synchronizer();
    let empty_steps = json!({ "id": "empty", "label": "Empty", "steps": [] });
    let blank_target = json!({
        "id": "blank",
        "label": "Blank",
        "steps": [{ "target": "", "content": "" }]
    });
    let doc = document_with_tours("d", vec![empty_steps, blank_target]);

    let report = sync.attach(&doc).unwrap();

    assert!(report.registered.is_empty());
    assert_eq!(report.failed.len(), 2);
    assert!(catalog.is_empty());
}

#[test]
fn test_disposal_cleans_up() {
    let (catalog, sync) = setup_synchronizer();
    let changes = Recorder::attach(sync.tours_changed());
    let doc = document_with_tours(
        "d",
        vec![sample_definition_json("a"), sample_definition_json("b")],
    );
    sync.attach(&doc);
    assert_eq!(catalog.len(), 2);

    doc.dispose();

    assert!(catalog.is_empty());
    assert!(!sync.is_attached(doc.as_ref()));
    assert!(catalog.active().is_none());
    assert_eq!(changes.count(), 1);
}

#[test]
fn test_disposed_document_id_can_attach_again() {
    let (catalog, sync) = setup_synchronizer();
    let first = document_with_tours("d", vec![sample_definition_json("a")]);
    sync.attach(&first);
    first.dispose();

    let reopened = document_with_tours("d", vec![sample_definition_json("b")]);
    assert!(sync.attach(&reopened).is_some());
    assert_eq!(catalog.keys(), vec![doc_tour_id("d", "b")]);
}

#[test]
fn test_document_without_model_is_ignored() {
    let (catalog, sync) = setup_synchronizer();
    let changes = Recorder::attach(sync.tours_changed());
    let doc = Arc::new(MemoryDocument::without_model("d"));

    assert!(sync.attach(&doc).is_none());
    assert_eq!(changes.count(), 0);
    assert!(catalog.is_empty());
}

#[test]
fn test_missing_metadata_emits_empty_change() {
    let (_, sync) = setup_synchronizer();
    let changes = Recorder::attach(sync.tours_changed());
    let doc = Arc::new(MemoryDocument::new("d"));

    sync.attach(&doc);

    assert_eq!(
        changes.events(),
        vec![ToursChanged {
            document_id: "d".to_string(),
            tour_ids: Vec::new(),
        }]
    );
}

#[test]
fn test_removing_metadata_key_clears_tours() {
    let (catalog, sync) = setup_synchronizer();
    let doc = document_with_tours("d", vec![sample_definition_json("a")]);
    sync.attach(&doc);

    doc.remove_metadata("tour");

    assert!(catalog.is_empty());
}

#[test]
fn test_rank_orders_registration_and_launch() {
    let (catalog, sync) = setup_synchronizer();
    let doc = document_with_tours(
        "d",
        vec![
            sample_definition_json("unranked"),
            ranked_definition_json("second", 2),
            ranked_definition_json("first", 1),
        ],
    );

    sync.attach(&doc);

    assert_eq!(
        catalog.keys(),
        vec![
            doc_tour_id("d", "first"),
            doc_tour_id("d", "second"),
            doc_tour_id("d", "unranked"),
        ]
    );
    assert_eq!(catalog.active(), Some(doc_tour_id("d", "first")));
    assert_eq!(
        catalog.pending(),
        vec![doc_tour_id("d", "second"), doc_tour_id("d", "unranked")]
    );
}

#[test]
fn test_finished_tour_is_not_relaunched_on_recompute() {
    let (catalog, sync) = setup_synchronizer();
    let doc = document_with_tours("d", vec![sample_definition_json("a")]);
    sync.attach(&doc);
    let id = doc_tour_id("d", "a");

    catalog.dispatch_event(&id, &TourEvent::running(0));
    catalog.dispatch_event(&id, &TourEvent::finished(1));
    assert!(catalog.is_completed(&id));

    set_tours(&doc, vec![sample_definition_json("a")]);

    assert!(catalog.contains(&id));
    assert!(catalog.active().is_none());
}

#[test]
fn test_launch_all_replays_completed_tours() {
    let (catalog, sync) = setup_synchronizer();
    let doc = document_with_tours(
        "d",
        vec![sample_definition_json("a"), sample_definition_json("b")],
    );
    sync.attach(&doc);
    let a = doc_tour_id("d", "a");
    let b = doc_tour_id("d", "b");

    catalog.dispatch_event(&a, &TourEvent::running(0));
    catalog.dispatch_event(&a, &TourEvent::finished(1));
    catalog.dispatch_event(&b, &TourEvent::running(0));
    catalog.dispatch_event(&b, &TourEvent::skipped(0));
    assert!(catalog.active().is_none());

    drop(sync.launch_all(doc.as_ref()));

    assert_eq!(catalog.active(), Some(a));
    assert_eq!(catalog.pending(), vec![b]);
}

#[test]
fn test_launch_one_replays_single_tour() {
    let (catalog, sync) = setup_synchronizer();
    let doc = document_with_tours("d", vec![sample_definition_json("a")]);
    let other = document_with_tours("o", vec![sample_definition_json("a")]);
    sync.attach(&doc);
    sync.attach(&other);
    let a = doc_tour_id("d", "a");
    let foreign = doc_tour_id("o", "a");

    for id in [&a, &foreign] {
        catalog.dispatch_event(id, &TourEvent::running(0));
        catalog.dispatch_event(id, &TourEvent::finished(0));
    }
    assert!(catalog.active().is_none());

    drop(sync.launch_one(doc.as_ref(), &foreign));
    assert!(catalog.active().is_none());

    drop(sync.launch_one(doc.as_ref(), &a));
    assert_eq!(catalog.active(), Some(a));
}

#[test]
fn test_disposal_forgets_completed_tours() {
    let (catalog, sync) = setup_synchronizer();
    let doc = document_with_tours("d", vec![sample_definition_json("a")]);
    sync.attach(&doc);
    let a = doc_tour_id("d", "a");
    catalog.dispatch_event(&a, &TourEvent::running(0));
    catalog.dispatch_event(&a, &TourEvent::finished(0));

    doc.dispose();
    assert!(!catalog.is_completed(&a));

    let reopened = document_with_tours("d", vec![sample_definition_json("a")]);
    sync.attach(&reopened);
    assert_eq!(catalog.active(), Some(a));
}

#[test]
fn test_concurrent_attach_subscribes_once() {
    let (_, sync) = setup_synchronizer();
    let doc = document_with_tours("d", vec![sample_definition_json("a")]);

    let attached: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| sync.attach(&doc).is_some()))
            .collect();
        handles
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum()
    });

    assert_eq!(attached, 1);
    assert_eq!(doc.metadata_changed().unwrap().subscriber_count(), 1);
    assert_eq!(doc.disposed().subscriber_count(), 1);
}

#[test]
fn test_detach_keeps_document_usable() {
    let (catalog, sync) = setup_synchronizer();
    let changes = Recorder::attach(sync.tours_changed());
    let doc = document_with_tours("d", vec![sample_definition_json("a")]);
    sync.attach(&doc);

    assert!(sync.detach(doc.as_ref()));
    assert!(catalog.is_empty());
    assert_eq!(changes.count(), 2);

    assert!(sync.attach(&doc).is_some());
    assert_eq!(catalog.len(), 1);
}

#[test]
fn test_custom_config_namespace_and_key() {
    let catalog = Arc::new(InMemoryTourCatalog::new());
    let config = SyncConfig::new()
        .with_namespace("guides")
        .with_metadata_key("walkthrough")
        .with_default_icon("compass");
    let sync = DocumentTourSynchronizer::new(catalog.clone(), config);
    let doc = Arc::new(MemoryDocument::with_metadata(
        "d",
        json!({ "walkthrough": { "tours": [sample_definition_json("a")] } }),
    ));

    sync.attach(&doc);

    let tour = catalog.get("guides:d:a").unwrap();
    assert_eq!(tour.icon(), Some("compass"));
}

#[test]
fn test_affordance_reflects_document_tours() {
    let (_, sync) = setup_synchronizer();
    let doc = document_with_tours(
        "d",
        vec![sample_definition_json("a"), sample_definition_json("b")],
    );
    let empty = Arc::new(MemoryDocument::new("e"));
    sync.attach(&doc);
    sync.attach(&empty);

    let affordance = sync.affordance(doc.as_ref());
    assert_eq!(affordance.title, "Start a Document Tour (2)");
    assert_eq!(affordance.entries[0].label, "Tour a");
    assert_eq!(affordance.entries[1].id, doc_tour_id("d", "b"));

    assert_eq!(affordance.run_all.as_deref(), Some("Run all tours"));

    let none = sync.affordance(empty.as_ref());
    assert_eq!(none.title, "Start a Document Tour");
    assert!(!none.has_tours);
}

#[tokio::test]
async fn test_launch_resolves_when_surface_ready() {
    let (catalog, sync) = setup_synchronizer();
    let doc = document_with_tours("d", vec![sample_definition_json("a")]);
    sync.attach(&doc);

    let pending = catalog.launch(&[doc_tour_id("d", "a")], true);
    catalog.mark_ready();

    assert!(pending.await.is_ok());
}
