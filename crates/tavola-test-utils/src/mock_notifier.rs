// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notifier for deterministic testing.
//!
//! `MockNotifier` implements `Notifier` with captured sends and a
//! configurable failure mode, so worker tests can exercise both the happy
//! path and the permanent/transient classification without an SMTP server.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tavola_core::{
    AdapterType, EntityRecord, FulfillmentRequest, HealthStatus, Notifier, PluginAdapter,
    TavolaError,
};

/// How the mock should fail subsequent `notify` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// A retryable channel failure.
    Transient,
    /// A permanent address failure.
    MalformedAddress,
}

/// A captured recommendation send.
#[derive(Debug, Clone)]
pub struct SentNotification {
    pub request: FulfillmentRequest,
    pub entities: Vec<EntityRecord>,
}

pub struct MockNotifier {
    sent: Arc<Mutex<Vec<SentNotification>>>,
    no_matches: Arc<Mutex<Vec<FulfillmentRequest>>>,
    failure: Arc<Mutex<Option<MockFailure>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            no_matches: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Make every subsequent send fail the given way; `None` restores
    /// success.
    pub async fn set_failure(&self, failure: Option<MockFailure>) {
        *self.failure.lock().await = failure;
    }

    /// All captured recommendation sends.
    pub async fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// All captured "no matches" notices.
    pub async fn no_matches_sent(&self) -> Vec<FulfillmentRequest> {
        self.no_matches.lock().await.clone()
    }

    async fn check_failure(&self) -> Result<(), TavolaError> {
        match *self.failure.lock().await {
            Some(MockFailure::Transient) => Err(TavolaError::Notify {
                message: "mock transient failure".to_string(),
                source: None,
            }),
            Some(MockFailure::MalformedAddress) => Err(TavolaError::MalformedAddress),
            None => Ok(()),
        }
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockNotifier {
    fn name(&self) -> &str {
        "mock-notifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    async fn health_check(&self) -> Result<HealthStatus, TavolaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TavolaError> {
        Ok(())
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(
        &self,
        request: &FulfillmentRequest,
        entities: &[EntityRecord],
    ) -> Result<(), TavolaError> {
        self.check_failure().await?;
        self.sent.lock().await.push(SentNotification {
            request: request.clone(),
            entities: entities.to_vec(),
        });
        Ok(())
    }

    async fn notify_no_matches(&self, request: &FulfillmentRequest) -> Result<(), TavolaError> {
        self.check_failure().await?;
        self.no_matches.lock().await.push(request.clone());
        Ok(())
    }
}
