// Copyright (c) 2026 Driftwatch Contributors
// SPDX-License-Identifier: MIT

//! Per-resource drift decision procedure.
//!
//! Each invocation is a fresh, independent computation over currently
//! observed state: fetch, short-circuit on the opt-in label, fingerprint,
//! compare, and stage a minimal annotation patch. The reconciler never reads
//! back its own prior writes to make the next decision and never mutates a
//! resource's functional specification.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use kube::{Resource, ResourceExt};
use tracing::{debug, info};

use crate::constants::{
    ANNOTATION_DRIFTED, ANNOTATION_DRIFTED_AT, ANNOTATION_EXPECTED_HASH,
    ANNOTATION_LAST_CHECKED_AT, ANNOTATION_LIVE_HASH, ENABLED_LABEL, ENABLED_VALUE,
};
use crate::errors::DriftError;
use crate::events::DriftNotifier;
use crate::fingerprint::Fingerprint;
use crate::store::ResourceStore;

/// Payload of a drift warning notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriftNotice {
    /// Baseline fingerprint hash declared by IaC tooling
    pub expected: String,
    /// Fingerprint hash computed from the live spec
    pub live: String,
}

/// Decision computed from a single observation of a resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Opt-in marker absent or not exactly the enabled value. No hash is
    /// computed and nothing is written.
    Disabled,

    /// No baseline hash present. Only `last-checked-at` is staged; absence
    /// of a baseline is not a drift verdict and must not set `drifted`.
    NoBaseline {
        /// Annotation keys to merge-patch
        staged: BTreeMap<String, String>,
    },

    /// Baseline present and compared against the live hash.
    Verdict {
        /// Whether the live hash differs from the baseline
        drifted: bool,
        /// Annotation keys to merge-patch
        staged: BTreeMap<String, String>,
        /// Warning to emit, present only when the verdict is news
        notice: Option<DriftNotice>,
    },
}

/// What a completed reconciliation amounted to, for logging and requeueing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Resource no longer exists; treated as success
    Missing,
    /// Resource is not opted in to drift checking
    Disabled,
    /// Checked, but no baseline hash to compare against
    NoBaseline,
    /// Live hash equals the baseline
    Clean,
    /// Live hash differs from the baseline
    Drifted,
}

/// Compute the drift decision for one observed resource state.
///
/// Pure with respect to its inputs: `now` is injected so repeated calls with
/// identical state produce identical staged annotations.
///
/// # Errors
///
/// Returns [`DriftError::Serialization`] if fingerprinting fails.
pub fn decide<K>(resource: &K, now: &str) -> Result<Decision, DriftError>
where
    K: Fingerprint + ResourceExt,
{
    if resource.labels().get(ENABLED_LABEL).map(String::as_str) != Some(ENABLED_VALUE) {
        return Ok(Decision::Disabled);
    }

    let annotations = resource.annotations();

    let expected = annotations
        .get(ANNOTATION_EXPECTED_HASH)
        .map(String::as_str)
        .unwrap_or_default();
    if expected.is_empty() {
        let staged = BTreeMap::from([(ANNOTATION_LAST_CHECKED_AT.to_string(), now.to_string())]);
        return Ok(Decision::NoBaseline { staged });
    }

    let live = resource.fingerprint_hash()?;

    let mut staged = BTreeMap::from([
        (ANNOTATION_LIVE_HASH.to_string(), live.clone()),
        (ANNOTATION_LAST_CHECKED_AT.to_string(), now.to_string()),
    ]);

    if live == expected {
        staged.insert(ANNOTATION_DRIFTED.to_string(), "false".to_string());
        return Ok(Decision::Verdict {
            drifted: false,
            staged,
            notice: None,
        });
    }

    staged.insert(ANNOTATION_DRIFTED.to_string(), "true".to_string());

    // First detection of this drift episode: either no timestamp was ever
    // recorded, or the last recorded verdict was not "true" (the previous
    // episode resolved and drift has now recurred). Re-detections of
    // already-known drift keep the original timestamp.
    let known_drift = annotations.get(ANNOTATION_DRIFTED).map(String::as_str) == Some("true")
        && annotations
            .get(ANNOTATION_DRIFTED_AT)
            .is_some_and(|at| !at.is_empty());
    if !known_drift {
        staged.insert(ANNOTATION_DRIFTED_AT.to_string(), now.to_string());
    }

    // Notify only when the verdict is news: episode start, or the live hash
    // moved while already drifted. Re-reconciling unchanged drift is silent.
    let hash_moved =
        annotations.get(ANNOTATION_LIVE_HASH).map(String::as_str) != Some(live.as_str());
    let notice = (!known_drift || hash_moved).then(|| DriftNotice {
        expected: expected.to_string(),
        live: live.clone(),
    });

    Ok(Decision::Verdict {
        drifted: true,
        staged,
        notice,
    })
}

/// Run one reconciliation for the identified resource.
///
/// Performs exactly one read and at most one write against the resource
/// store. A vanished resource is a no-op success. The notification is sent
/// only after the annotation patch succeeded, so a failed reconciliation
/// leaves previously persisted drift state untouched and emits nothing.
///
/// # Errors
///
/// Propagates [`DriftError`] from fingerprinting or the store; the caller's
/// error policy decides whether to requeue (see [`DriftError::is_retryable`]).
pub async fn reconcile_drift<K, S, N>(
    store: &S,
    notifier: &N,
    namespace: &str,
    name: &str,
) -> Result<Outcome, DriftError>
where
    K: Fingerprint + Resource<DynamicType = ()> + Send + Sync,
    S: ResourceStore<K>,
    N: DriftNotifier,
{
    let Some(resource) = store.get(namespace, name).await? else {
        debug!(
            namespace,
            name,
            kind = K::KIND,
            "Resource no longer exists, nothing to reconcile"
        );
        return Ok(Outcome::Missing);
    };

    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    match decide(&resource, &now)? {
        Decision::Disabled => {
            debug!(
                namespace,
                name,
                kind = K::KIND,
                "Drift checking not enabled, skipping"
            );
            Ok(Outcome::Disabled)
        }
        Decision::NoBaseline { staged } => {
            store.patch_annotations(namespace, name, &staged).await?;
            debug!(
                namespace,
                name,
                kind = K::KIND,
                "No baseline hash present, recorded check time only"
            );
            Ok(Outcome::NoBaseline)
        }
        Decision::Verdict {
            drifted,
            staged,
            notice,
        } => {
            store.patch_annotations(namespace, name, &staged).await?;

            if let Some(notice) = notice {
                info!(
                    namespace,
                    name,
                    kind = K::KIND,
                    expected = %notice.expected,
                    live = %notice.live,
                    "Drift detected"
                );
                notifier
                    .notify_drift(&resource.object_ref(&()), &notice.expected, &notice.live)
                    .await;
            }

            Ok(if drifted {
                Outcome::Drifted
            } else {
                Outcome::Clean
            })
        }
    }
}

#[cfg(test)]
#[path = "drift_tests.rs"]
mod drift_tests;
