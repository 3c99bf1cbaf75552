// Copyright (c) 2026 Driftwatch Contributors
// SPDX-License-Identifier: MIT

//! Fingerprint projection for `apps/v1` Deployments.
//!
//! A minimal, stable view of a Deployment spec. Only fields that represent
//! intended configuration are included; everything runtime-owned (status,
//! timestamps, injected defaults) stays out of the hash.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentStrategy};
use k8s_openapi::api::core::v1::PodTemplateSpec;
use serde::Serialize;

use super::{digest_fingerprint, trimmed_map, Fingerprint};
use crate::errors::DriftError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentFingerprint {
    /// `None` means "replicas unset", which must stay distinguishable from
    /// an explicit `replicas: 0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    replicas: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<DeploymentStrategy>,

    template: PodTemplateFingerprint,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PodTemplateFingerprint {
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    annotations: Option<BTreeMap<String, String>>,

    containers: Vec<ContainerFingerprint>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContainerFingerprint {
    name: String,
    image: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    env: Vec<EnvVarFingerprint>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    ports: Vec<ContainerPortFingerprint>,

    #[serde(skip_serializing_if = "Option::is_none")]
    resources: Option<ResourcesFingerprint>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvVarFingerprint {
    name: String,
    value: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContainerPortFingerprint {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    container_port: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    protocol: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourcesFingerprint {
    #[serde(skip_serializing_if = "Option::is_none")]
    requests: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    limits: Option<BTreeMap<String, String>>,
}

impl Fingerprint for Deployment {
    const KIND: &'static str = "Deployment";

    fn fingerprint_hash(&self) -> Result<String, DriftError> {
        let spec = self.spec.as_ref();

        let fingerprint = DeploymentFingerprint {
            replicas: spec.and_then(|s| s.replicas),
            strategy: spec.and_then(|s| s.strategy.clone()),
            template: spec.map(|s| fingerprint_pod_template(&s.template)).unwrap_or(
                PodTemplateFingerprint {
                    labels: None,
                    annotations: None,
                    containers: Vec::new(),
                },
            ),
        };

        digest_fingerprint(Self::KIND, &fingerprint)
    }
}

fn fingerprint_pod_template(template: &PodTemplateSpec) -> PodTemplateFingerprint {
    let metadata = template.metadata.as_ref();

    let mut containers: Vec<ContainerFingerprint> = template
        .spec
        .as_ref()
        .map(|pod| pod.containers.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|container| {
            // Entries whose value is sourced indirectly (secret/configmap
            // references) are dropped entirely: the referenced value can
            // change without any intentional spec change.
            let mut env: Vec<EnvVarFingerprint> = container
                .env
                .iter()
                .flatten()
                .filter(|var| var.value_from.is_none())
                .map(|var| EnvVarFingerprint {
                    name: var.name.clone(),
                    value: var.value.clone().unwrap_or_default(),
                })
                .collect();
            env.sort_by(|a, b| a.name.cmp(&b.name));

            let mut ports: Vec<ContainerPortFingerprint> = container
                .ports
                .iter()
                .flatten()
                .map(|port| ContainerPortFingerprint {
                    name: port.name.clone(),
                    container_port: port.container_port,
                    protocol: port.protocol.clone(),
                })
                .collect();
            // Full-tuple key so the sort is a total order over distinct ports.
            ports.sort_by(|a, b| {
                (a.container_port, &a.name, &a.protocol)
                    .cmp(&(b.container_port, &b.name, &b.protocol))
            });

            let resources = container.resources.as_ref().map(|r| ResourcesFingerprint {
                requests: r.requests.as_ref().map(quantities_as_strings),
                limits: r.limits.as_ref().map(quantities_as_strings),
            });

            ContainerFingerprint {
                name: container.name.clone(),
                image: container.image.clone().unwrap_or_default(),
                env,
                ports,
                resources,
            }
        })
        .collect();
    containers.sort_by(|a, b| a.name.cmp(&b.name));

    PodTemplateFingerprint {
        labels: metadata.and_then(|m| m.labels.as_ref()).map(trimmed_map),
        annotations: metadata
            .and_then(|m| m.annotations.as_ref())
            .map(trimmed_map),
        containers,
    }
}

fn quantities_as_strings(
    quantities: &BTreeMap<String, k8s_openapi::apimachinery::pkg::api::resource::Quantity>,
) -> BTreeMap<String, String> {
    quantities
        .iter()
        .map(|(name, quantity)| (name.clone(), quantity.0.clone()))
        .collect()
}

#[cfg(test)]
#[path = "deployment_tests.rs"]
mod deployment_tests;
