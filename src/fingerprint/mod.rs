// Copyright (c) 2026 Driftwatch Contributors
// SPDX-License-Identifier: MIT

//! Deterministic, field-selective fingerprinting of live resource specs.
//!
//! A fingerprint is a canonical projection of a resource's spec restricted to
//! the fields that represent *intended* configuration: replica counts,
//! images, literal environment variables, ports, resource requests/limits,
//! selectors and strategy. Runtime status, server-assigned fields and
//! indirectly-sourced values are excluded, because they can change without
//! any intentional specification change.
//!
//! The projection is serialized to canonical JSON and digested with SHA-256.
//! Determinism is guaranteed by construction:
//!
//! - list-valued fields (containers, env, ports) are sorted with a total
//!   order before serialization
//! - string→string maps are materialized as `BTreeMap`, so key order is
//!   stable and never depends on the source map's iteration order
//! - values in freeform maps are whitespace-trimmed; keys are left alone
//!
//! Supported kinds implement [`Fingerprint`]; each kind is a separate
//! strategy selected statically by the controller that watches it.

mod deployment;
mod service;

use std::collections::BTreeMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::DriftError;

/// A resource kind that can be projected into a canonical fingerprint hash.
///
/// `fingerprint_hash` is a pure function of the resource's spec: identical
/// qualifying input always yields an identical lowercase-hex SHA-256 digest,
/// with no dependency on wall-clock time, random state or map iteration
/// order.
pub trait Fingerprint {
    /// Human-readable kind name, used in errors and logs.
    const KIND: &'static str;

    /// Project the live spec and digest it.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::Serialization`] if the projection cannot be
    /// encoded. Never expected in practice; treated as a fatal
    /// implementation bug rather than a recoverable condition.
    fn fingerprint_hash(&self) -> Result<String, DriftError>;
}

/// Serialize a fingerprint structure to canonical JSON and digest it.
///
/// The byte encoding is `serde_json` over an already-canonicalized structure:
/// struct fields serialize in declaration order and all collections were
/// sorted during projection, so equal input produces byte-identical output.
pub(crate) fn digest_fingerprint<T: Serialize>(
    kind: &'static str,
    fingerprint: &T,
) -> Result<String, DriftError> {
    let bytes = serde_json::to_vec(fingerprint)
        .map_err(|source| DriftError::Serialization { kind, source })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Copy a freeform string map, trimming surrounding whitespace from values.
///
/// Keys are preserved as-is. Empty values are kept: an empty string is a
/// legitimate intended value, distinct from the key being absent.
pub(crate) fn trimmed_map(map: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    map.iter()
        .map(|(key, value)| (key.clone(), value.trim().to_string()))
        .collect()
}
