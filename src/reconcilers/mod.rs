// Copyright (c) 2026 Driftwatch Contributors
// SPDX-License-Identifier: MIT

//! Drift reconciliation logic.
//!
//! driftwatch follows the standard Kubernetes controller pattern:
//!
//! 1. **Watch** - An external watch/dispatch layer calls the reconciler with
//!    a resource identity whenever that resource changes (or on resync)
//! 2. **Decide** - Compare the live fingerprint hash against the declared
//!    baseline hash, level-triggered: the decision depends only on currently
//!    observed state, never on the delta that triggered the call
//! 3. **Record** - Merge-patch the verdict annotations owned by this
//!    operator, leaving all other resource state untouched
//! 4. **Notify** - Emit a Warning event when drift is news
//!
//! The decision core ([`drift::decide`]) is a pure function over one
//! observation of a resource, which keeps the whole state machine testable
//! without a cluster; [`drift::reconcile_drift`] wires it to a
//! [`crate::store::ResourceStore`] and a [`crate::events::DriftNotifier`].

pub mod drift;

pub use drift::{decide, reconcile_drift, Decision, DriftNotice, Outcome};
