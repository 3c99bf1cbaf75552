// Copyright (c) 2026 Driftwatch Contributors
// SPDX-License-Identifier: MIT

//! Global constants for the driftwatch operator.
//!
//! This module contains the label/annotation contract shared with external
//! tooling (the IaC apply step writes the baseline, operators opt resources
//! in) plus controller tuning constants.

// ============================================================================
// API Constants
// ============================================================================

/// API group owning all driftwatch labels and annotations
pub const API_GROUP: &str = "driftwatch.io";

/// Controller name, used as the event reporter and worker thread name
pub const CONTROLLER_NAME: &str = "driftwatch";

// ============================================================================
// Opt-In Label
// ============================================================================

/// Label gating whether a resource participates in drift checking
pub const ENABLED_LABEL: &str = "driftwatch.io/enabled";

/// Exact label value that enables monitoring; anything else disables it
pub const ENABLED_VALUE: &str = "true";

// ============================================================================
// Drift Record Annotations
// ============================================================================

/// Baseline fingerprint hash, written by external IaC tooling. Read-only here.
pub const ANNOTATION_EXPECTED_HASH: &str = "driftwatch.io/expected-hash";

/// Most recent computed fingerprint hash, written every reconciliation
pub const ANNOTATION_LIVE_HASH: &str = "driftwatch.io/live-hash";

/// Drift verdict, `"true"` or `"false"`, written once a baseline exists
pub const ANNOTATION_DRIFTED: &str = "driftwatch.io/drifted";

/// Timestamp of the first detection of the current drift episode
pub const ANNOTATION_DRIFTED_AT: &str = "driftwatch.io/drifted-at";

/// Timestamp of the most recent reconciliation
pub const ANNOTATION_LAST_CHECKED_AT: &str = "driftwatch.io/last-checked-at";

// ============================================================================
// Controller Error Handling Constants
// ============================================================================

/// Requeue duration for controller errors (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

/// Requeue duration after a successful reconciliation (5 minutes)
pub const RECHECK_REQUEUE_DURATION_SECS: u64 = 300;

/// Maximum attempts for an annotation merge-patch that hits a write conflict
pub const PATCH_CONFLICT_ATTEMPTS: u32 = 3;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for the Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;
