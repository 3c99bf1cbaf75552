// Copyright (c) 2026 Driftwatch Contributors
// SPDX-License-Identifier: MIT

//! Error types for drift detection.
//!
//! The taxonomy mirrors what the external invocation layer needs to know:
//! serialization failures are deterministic and fatal for the invocation,
//! write conflicts and transport failures are retryable. A vanished resource
//! is not an error at all; [`crate::store::ResourceStore::get`] surfaces it
//! as `None`.

use thiserror::Error;

/// Errors that can occur while reconciling a single resource.
#[derive(Error, Debug)]
pub enum DriftError {
    /// The fingerprint projection could not be encoded to canonical JSON.
    ///
    /// This never happens for well-formed API objects and indicates an
    /// implementation bug in the fingerprint structures. Retrying externally
    /// is safe (the failure is deterministic) but will not succeed until the
    /// underlying spec becomes representable.
    #[error("failed to encode {kind} fingerprint: {source}")]
    Serialization {
        /// Resource kind whose fingerprint failed to serialize
        kind: &'static str,
        /// Underlying serde error
        source: serde_json::Error,
    },

    /// Another writer modified the resource between fetch and patch.
    ///
    /// The merge-patch only touches keys this operator owns, so a bounded
    /// number of retries is performed in [`crate::store::ApiStore`] before
    /// this error surfaces.
    #[error("conflicting write on annotations of '{name}' after {attempts} attempts")]
    Conflict {
        /// Name of the contested resource
        name: String,
        /// Number of patch attempts made before giving up
        attempts: u32,
    },

    /// A read or write against the Kubernetes API failed.
    #[error("resource store request failed: {0}")]
    Store(#[from] kube::Error),
}

impl DriftError {
    /// Whether the external invocation layer should retry this reconciliation.
    ///
    /// Serialization failures are deterministic, so retrying them is futile
    /// until the spec changes. Conflicts already exhausted their in-process
    /// retries but resolve once the competing writer settles. Transport
    /// failures follow the usual 429/5xx/connection classification.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            DriftError::Serialization { .. } => false,
            DriftError::Conflict { .. } => true,
            DriftError::Store(err) => is_retryable_kube_error(err),
        }
    }
}

/// Determine if a Kubernetes API error is transient.
///
/// Rate limiting (429) and server errors (5xx) are retryable, as are
/// network/connection failures. Client errors (bad request, forbidden,
/// invalid) are not.
#[must_use]
pub fn is_retryable_kube_error(err: &kube::Error) -> bool {
    match err {
        kube::Error::Api(api_err) => {
            api_err.code == 429 || (api_err.code >= 500 && api_err.code < 600)
        }
        kube::Error::Service(_) => true,
        _ => false,
    }
}

/// Whether a Kubernetes API error is a 404 for the requested object.
#[must_use]
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(api_err) if api_err.code == 404)
}

/// Whether a Kubernetes API error is a 409 write conflict.
#[must_use]
pub fn is_conflict(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(api_err) if api_err.code == 409)
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
