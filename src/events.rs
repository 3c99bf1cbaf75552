// Copyright (c) 2026 Driftwatch Contributors
// SPDX-License-Identifier: MIT

//! Kubernetes Event publishing for drift notifications.
//!
//! Provides a trait-based abstraction over `kube::runtime::events::Recorder`
//! so the reconciler can emit standard Kubernetes Events visible via
//! `kubectl describe` and `kubectl get events`.
//!
//! Notifications are fire-and-forget: failures are logged as warnings and
//! never propagate errors. A failed event must never break reconciliation.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::ObjectReference;
use kube::runtime::events::{Event, EventType, Recorder, Reporter};
use kube::Client;
use tracing::warn;

use crate::constants::CONTROLLER_NAME;

/// Well-known event reason strings.
///
/// These appear in `kubectl get events` under the REASON column.
pub mod reasons {
    /// Live spec hash diverged from the declared baseline
    pub const CONFIG_DRIFT_DETECTED: &str = "ConfigDriftDetected";
}

/// Well-known event action strings.
pub mod actions {
    /// Comparing a live fingerprint against the baseline
    pub const DRIFT_CHECK: &str = "DriftCheck";
}

/// Sink for warning-severity drift notifications.
///
/// Implementations are expected to be fire-and-forget: `notify_drift()` logs
/// a warning on failure but never returns an error.
#[async_trait]
pub trait DriftNotifier: Send + Sync {
    /// Report that the named resource drifted from its baseline.
    ///
    /// # Arguments
    ///
    /// * `resource_ref` - The Kubernetes object the notification is about
    /// * `expected` - Baseline fingerprint hash
    /// * `live` - Computed live fingerprint hash
    async fn notify_drift(&self, resource_ref: &ObjectReference, expected: &str, live: &str);
}

/// Production implementation wrapping `kube::runtime::events::Recorder`.
pub struct KubeEventNotifier {
    recorder: Recorder,
}

impl KubeEventNotifier {
    /// Create a notifier reporting as the driftwatch controller.
    #[must_use]
    pub fn new(client: Client) -> Self {
        let reporter = Reporter {
            controller: CONTROLLER_NAME.to_string(),
            instance: None,
        };
        Self {
            recorder: Recorder::new(client, reporter),
        }
    }
}

#[async_trait]
impl DriftNotifier for KubeEventNotifier {
    async fn notify_drift(&self, resource_ref: &ObjectReference, expected: &str, live: &str) {
        let event = Event {
            type_: EventType::Warning,
            reason: reasons::CONFIG_DRIFT_DETECTED.to_string(),
            note: Some(format!(
                "configuration drift detected: expected-hash={expected} live-hash={live}"
            )),
            action: actions::DRIFT_CHECK.to_string(),
            secondary: None,
        };
        if let Err(e) = self.recorder.publish(&event, resource_ref).await {
            warn!(
                name = ?resource_ref.name,
                namespace = ?resource_ref.namespace,
                error = %e,
                "Failed to publish drift event"
            );
        }
    }
}

/// No-op implementation for tests.
pub struct NoopDriftNotifier;

#[async_trait]
impl DriftNotifier for NoopDriftNotifier {
    async fn notify_drift(&self, _resource_ref: &ObjectReference, _expected: &str, _live: &str) {
        // intentionally empty
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod events_tests;
