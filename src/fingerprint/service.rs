// Copyright (c) 2026 Driftwatch Contributors
// SPDX-License-Identifier: MIT

//! Fingerprint projection for `core/v1` Services.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Service;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::Serialize;

use super::{digest_fingerprint, trimmed_map, Fingerprint};
use crate::errors::DriftError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceFingerprint {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    selector: Option<BTreeMap<String, String>>,

    ports: Vec<ServicePortFingerprint>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServicePortFingerprint {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    protocol: Option<String>,

    port: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    target_port: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    node_port: Option<i32>,
}

impl Fingerprint for Service {
    const KIND: &'static str = "Service";

    fn fingerprint_hash(&self) -> Result<String, DriftError> {
        let spec = self.spec.as_ref();

        let mut ports: Vec<ServicePortFingerprint> = spec
            .and_then(|s| s.ports.as_ref())
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|port| ServicePortFingerprint {
                name: port.name.clone(),
                protocol: port.protocol.clone(),
                port: port.port,
                target_port: port.target_port.as_ref().map(normalize_target_port),
                node_port: port.node_port,
            })
            .collect();
        // Full-tuple key so the sort is a total order over distinct ports.
        ports.sort_by(|a, b| (a.port, &a.name, &a.protocol).cmp(&(b.port, &b.name, &b.protocol)));

        let fingerprint = ServiceFingerprint {
            type_: spec.and_then(|s| s.type_.clone()),
            selector: spec.and_then(|s| s.selector.as_ref()).map(trimmed_map),
            ports,
        };

        digest_fingerprint(Self::KIND, &fingerprint)
    }
}

/// Render a target port as its plain string form.
///
/// `8080` and `"8080"` collapse to the same representation; a named target
/// port stays a name. An absent target port serializes as absent, never as a
/// zero placeholder.
fn normalize_target_port(target: &IntOrString) -> String {
    match target {
        IntOrString::Int(port) => port.to_string(),
        IntOrString::String(name) => name.clone(),
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
