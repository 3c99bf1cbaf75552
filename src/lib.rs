// Copyright (c) 2026 Driftwatch Contributors
// SPDX-License-Identifier: MIT

//! # driftwatch - Configuration Drift Detection Operator for Kubernetes
//!
//! driftwatch is a Kubernetes operator written in Rust that detects
//! configuration drift between an infrastructure-as-code-declared baseline
//! and the live state of managed resources, without owning or reverting that
//! state.
//!
//! ## Overview
//!
//! The IaC apply step records a baseline fingerprint hash as an annotation on
//! each managed resource. driftwatch watches opted-in Deployments and
//! Services, recomputes the fingerprint from the live spec on every change,
//! and records the verdict:
//!
//! - a deterministic, field-selective fingerprint of the live spec is hashed
//!   with SHA-256 ([`fingerprint`])
//! - the live hash is compared against the declared baseline and the verdict
//!   is merge-patched onto the resource's own annotations ([`reconcilers`])
//! - the first detection of a drift episode emits a Warning event
//!   ([`events`])
//!
//! driftwatch never mutates a resource's functional specification, never
//! reverts drift, and never reports *which* field drifted, only that the
//! live spec no longer matches the declared one.
//!
//! ## Modules
//!
//! - [`constants`] - Label/annotation contract and tuning constants
//! - [`errors`] - Error taxonomy (fatal vs. retryable)
//! - [`events`] - Warning-event notification sink
//! - [`fingerprint`] - Canonical fingerprinting per resource kind
//! - [`reconcilers`] - The drift decision procedure
//! - [`store`] - Resource-store capability (get / annotation merge-patch)
//!
//! ## Example
//!
//! ```rust,no_run
//! use driftwatch::reconcilers::reconcile_drift;
//! use driftwatch::events::NoopDriftNotifier;
//! use driftwatch::store::ApiStore;
//! use k8s_openapi::api::apps::v1::Deployment;
//!
//! # async fn example(client: kube::Client) -> Result<(), driftwatch::errors::DriftError> {
//! let store: ApiStore<Deployment> = ApiStore::new(client);
//! let outcome =
//!     reconcile_drift::<Deployment, _, _>(&store, &NoopDriftNotifier, "prod", "api-server")
//!         .await?;
//! println!("reconciled: {outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod errors;
pub mod events;
pub mod fingerprint;
pub mod reconcilers;
pub mod store;
