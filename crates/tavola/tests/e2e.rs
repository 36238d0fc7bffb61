// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Tavola pipeline.
//!
//! Each test creates an isolated TestHarness with temp SQLite, a mock
//! notifier, and all required subsystems. Tests are independent and
//! order-insensitive.

use std::sync::Arc;

use chrono::Duration;

use tavola_core::{Cuisine, ServiceArea, StorageAdapter};
use tavola_intake::RawSlots;
use tavola_test_utils::{MockNotifier, TestHarness};
use tavola_worker::FulfillmentWorker;

fn slots(location: &str, cuisine: &str) -> RawSlots {
    RawSlots {
        location: location.to_string(),
        cuisine: cuisine.to_string(),
        party_size: "2".to_string(),
        dining_date: "tomorrow".to_string(),
        dining_time: "7:30 pm".to_string(),
        contact_address: "diner@example.com".to_string(),
    }
}

fn worker(harness: &TestHarness, notifier: Arc<MockNotifier>) -> FulfillmentWorker {
    FulfillmentWorker::new(
        harness.storage.clone(),
        harness.resolver.clone(),
        notifier,
        harness.worker_config.clone(),
    )
}

// ---- Test 1: Intake-to-notification pipeline ----

#[tokio::test]
async fn test_intake_to_notification_pipeline() {
    let harness = TestHarness::new().await.unwrap();
    let notifier = Arc::new(MockNotifier::new());

    let request_id = harness
        .intake
        .on_slots_complete("session-e2e-1", &slots("Manhattan", "Japanese"))
        .await
        .unwrap();

    let outcome = worker(&harness, notifier.clone()).run_once().await.unwrap();
    assert_eq!(outcome.claimed, 1);
    assert_eq!(outcome.completed, 1);

    let sent = notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].request.request_id, request_id);
    assert_eq!(sent[0].request.cuisine, Cuisine::Japanese);
    assert_eq!(sent[0].request.area, ServiceArea::Manhattan);
    assert!(!sent[0].entities.is_empty());
    for entity in &sent[0].entities {
        assert_eq!(entity.cuisine, Cuisine::Japanese);
        assert_eq!(entity.area, ServiceArea::Manhattan);
    }

    assert!(harness.storage.was_notified(&request_id).await.unwrap());
}

// ---- Test 2: Preference persistence across sessions ----

#[tokio::test]
async fn test_greeting_surfaces_stored_preferences() {
    let harness = TestHarness::new().await.unwrap();

    // No history yet
    let before = harness.intake.on_greeting("session-e2e-2").await.unwrap();
    assert!(before.is_none());

    harness
        .intake
        .on_slots_complete("session-e2e-2", &slots("Brooklyn", "Thai"))
        .await
        .unwrap();

    let after = harness
        .intake
        .on_greeting("session-e2e-2")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.area, ServiceArea::Brooklyn);
    assert_eq!(after.cuisine, Cuisine::Thai);
    assert_eq!(after.party_size, 2);
    assert_eq!(after.contact_address, "diner@example.com");
}

// ---- Test 3: Recall re-enqueues and fulfills ----

#[tokio::test]
async fn test_recall_produces_second_notification() {
    let harness = TestHarness::new().await.unwrap();
    let notifier = Arc::new(MockNotifier::new());
    let worker = worker(&harness, notifier.clone());

    let first_id = harness
        .intake
        .on_slots_complete("session-e2e-3", &slots("Manhattan", "Italian"))
        .await
        .unwrap();
    worker.run_once().await.unwrap();

    let recalled = harness
        .intake
        .recall("session-e2e-3", harness.intake.now() + Duration::days(3))
        .await
        .unwrap();
    assert!(recalled);
    worker.run_once().await.unwrap();

    let sent = notifier.sent().await;
    assert_eq!(sent.len(), 2);
    // Fresh request id, same stored preferences
    assert_ne!(sent[1].request.request_id, first_id);
    assert_eq!(sent[1].request.cuisine, Cuisine::Italian);
    assert_eq!(sent[1].request.area, ServiceArea::Manhattan);
    assert_eq!(sent[1].request.contact_address, "diner@example.com");
}

#[tokio::test]
async fn test_recall_without_history_is_a_noop() {
    let harness = TestHarness::new().await.unwrap();

    let recalled = harness
        .intake
        .recall("session-unknown", harness.intake.now() + Duration::days(1))
        .await
        .unwrap();
    assert!(!recalled);
}

// ---- Test 4: Zero-match terminal notice ----

#[tokio::test]
async fn test_unserved_combination_gets_no_matches_notice() {
    let harness = TestHarness::new().await.unwrap();
    let notifier = Arc::new(MockNotifier::new());

    let request_id = harness
        .intake
        .on_slots_complete("session-e2e-4", &slots("Hoboken", "French"))
        .await
        .unwrap();

    let outcome = worker(&harness, notifier.clone()).run_once().await.unwrap();
    assert_eq!(outcome.completed, 1);
    assert_eq!(outcome.dead_lettered, 0);

    assert_eq!(notifier.sent_count().await, 0);
    let no_matches = notifier.no_matches_sent().await;
    assert_eq!(no_matches.len(), 1);
    assert_eq!(no_matches[0].request_id, request_id);
    assert!(harness.storage.was_notified(&request_id).await.unwrap());
}

// ---- Test 5: Invalid slots leave no trace ----

#[tokio::test]
async fn test_invalid_slots_store_and_enqueue_nothing() {
    let harness = TestHarness::new().await.unwrap();

    let mut bad = slots("Manhattan", "Japanese");
    bad.contact_address = "not-an-address".to_string();
    let result = harness.intake.on_slots_complete("session-e2e-5", &bad).await;
    assert!(result.is_err());

    assert!(harness.intake.on_greeting("session-e2e-5").await.unwrap().is_none());
    let stats = harness
        .storage
        .queue_stats(&harness.worker_config.queue_name)
        .await
        .unwrap();
    assert_eq!(stats.pending, 0);
}

// ---- Test 6: Queue accounting ----

#[tokio::test]
async fn test_queue_stats_after_mixed_batch() {
    let harness = TestHarness::new().await.unwrap();
    let notifier = Arc::new(MockNotifier::new());

    harness
        .intake
        .on_slots_complete("session-e2e-6a", &slots("Manhattan", "Japanese"))
        .await
        .unwrap();
    harness
        .intake
        .on_slots_complete("session-e2e-6b", &slots("Queens", "Korean"))
        .await
        .unwrap();

    let queue_name = harness.worker_config.queue_name.clone();
    let before = harness.storage.queue_stats(&queue_name).await.unwrap();
    assert_eq!(before.pending, 2);
    assert_eq!(before.completed, 0);

    let outcome = worker(&harness, notifier.clone()).run_once().await.unwrap();
    assert_eq!(outcome.claimed, 2);
    assert_eq!(outcome.completed, 2);

    let after = harness.storage.queue_stats(&queue_name).await.unwrap();
    assert_eq!(after.pending, 0);
    assert_eq!(after.processing, 0);
    assert_eq!(after.completed, 2);
    assert_eq!(after.notified, 2);
}

// ---- Test 7: Independent test isolation ----

#[tokio::test]
async fn test_harness_isolation() {
    // Two harnesses should be completely independent
    let h1 = TestHarness::new().await.unwrap();
    let h2 = TestHarness::new().await.unwrap();
    let n1 = Arc::new(MockNotifier::new());
    let n2 = Arc::new(MockNotifier::new());

    h1.intake
        .on_slots_complete("session-iso", &slots("Manhattan", "Japanese"))
        .await
        .unwrap();

    worker(&h1, n1.clone()).run_once().await.unwrap();
    worker(&h2, n2.clone()).run_once().await.unwrap();

    assert_eq!(n1.sent_count().await, 1);
    assert_eq!(n2.sent_count().await, 0);
}
