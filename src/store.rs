// Copyright (c) 2026 Driftwatch Contributors
// SPDX-License-Identifier: MIT

//! Resource-store capability consumed by the reconciler.
//!
//! The reconciler performs exactly one read and at most one write per
//! invocation. Both go through [`ResourceStore`], so the decision logic can
//! be exercised against an in-memory fake while production wires in
//! [`ApiStore`] over `kube::Api`.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use kube::api::{Patch, PatchParams};
use kube::core::NamespaceResourceScope;
use kube::{Api, Client, Resource};
use serde_json::json;
use tracing::debug;

use crate::constants::PATCH_CONFLICT_ATTEMPTS;
use crate::errors::{is_conflict, is_not_found, DriftError};

/// Read and partial-update access to namespaced resources of one kind.
#[async_trait]
pub trait ResourceStore<K>: Send + Sync {
    /// Fetch the current state of a resource, or `None` if it no longer
    /// exists. Deletion is not an error: there is nothing left to reconcile.
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, DriftError>;

    /// Merge-patch the given annotation keys onto the resource.
    ///
    /// Only the supplied keys are touched; every other annotation on the
    /// resource, however it got there, is left alone. The patch carries no
    /// `resourceVersion`, so it cannot clobber concurrent writers of other
    /// keys.
    async fn patch_annotations(
        &self,
        namespace: &str,
        name: &str,
        annotations: &BTreeMap<String, String>,
    ) -> Result<(), DriftError>;
}

/// Production store backed by the Kubernetes API.
pub struct ApiStore<K> {
    client: Client,
    _kind: PhantomData<fn() -> K>,
}

impl<K> ApiStore<K> {
    /// Create a store for one resource kind.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }
}

#[async_trait]
impl<K> ResourceStore<K> for ApiStore<K>
where
    K: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + Clone
        + std::fmt::Debug
        + serde::Serialize
        + serde::de::DeserializeOwned
        + Send
        + Sync,
{
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, DriftError> {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        match api.get(name).await {
            Ok(resource) => Ok(Some(resource)),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(DriftError::Store(err)),
        }
    }

    async fn patch_annotations(
        &self,
        namespace: &str,
        name: &str,
        annotations: &BTreeMap<String, String>,
    ) -> Result<(), DriftError> {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        let patch = json!({ "metadata": { "annotations": annotations } });

        let mut attempt = 0;
        loop {
            attempt += 1;
            match api
                .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
                .await
            {
                Ok(_) => return Ok(()),
                Err(err) if is_conflict(&err) && attempt < PATCH_CONFLICT_ATTEMPTS => {
                    // The patch does not depend on previously fetched state,
                    // so a conflicted write can simply be reissued.
                    debug!(
                        namespace,
                        name, attempt, "Annotation patch conflicted, retrying"
                    );
                }
                Err(err) if is_conflict(&err) => {
                    return Err(DriftError::Conflict {
                        name: name.to_string(),
                        attempts: attempt,
                    });
                }
                Err(err) => return Err(DriftError::Store(err)),
            }
        }
    }
}
