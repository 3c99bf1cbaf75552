// Copyright (c) 2026 Driftwatch Contributors
// SPDX-License-Identifier: MIT

//! Unit tests for `fingerprint/deployment.rs`

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, DeploymentStatus};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, EnvVarSource, PodSpec, PodTemplateSpec,
    ResourceRequirements, SecretKeySelector,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::fingerprint::Fingerprint;

fn container(name: &str, image: &str) -> Container {
    Container {
        name: name.to_string(),
        image: Some(image.to_string()),
        ..Default::default()
    }
}

fn literal_env(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        value_from: None,
    }
}

fn secret_env(name: &str, key: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: None,
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                key: key.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
    }
}

fn port(name: Option<&str>, number: i32) -> ContainerPort {
    ContainerPort {
        name: name.map(String::from),
        container_port: number,
        protocol: Some("TCP".to_string()),
        ..Default::default()
    }
}

fn deployment(replicas: Option<i32>, containers: Vec<Container>) -> Deployment {
    deployment_with_template_labels(replicas, containers, BTreeMap::new())
}

fn deployment_with_template_labels(
    replicas: Option<i32>,
    containers: Vec<Container>,
    labels: BTreeMap<String, String>,
) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some("web".to_string()),
            namespace: Some("default".to_string()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas,
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: if labels.is_empty() { None } else { Some(labels) },
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers,
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        status: None,
    }
}

#[test]
fn test_hash_is_lowercase_sha256_hex() {
    let dep = deployment(Some(3), vec![container("app", "nginx:1.27")]);

    let hash = dep.fingerprint_hash().unwrap();

    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(hash, dep.fingerprint_hash().unwrap());
}

#[test]
fn test_container_order_does_not_affect_hash() {
    let a = container("app", "nginx:1.27");
    let b = container("sidecar", "envoy:1.31");

    let forward = deployment(Some(2), vec![a.clone(), b.clone()]);
    let reversed = deployment(Some(2), vec![b, a]);

    assert_eq!(
        forward.fingerprint_hash().unwrap(),
        reversed.fingerprint_hash().unwrap()
    );
}

#[test]
fn test_env_and_port_order_does_not_affect_hash() {
    let mut ordered = container("app", "nginx:1.27");
    ordered.env = Some(vec![literal_env("A", "1"), literal_env("B", "2")]);
    ordered.ports = Some(vec![port(Some("http"), 80), port(Some("https"), 443)]);

    let mut shuffled = container("app", "nginx:1.27");
    shuffled.env = Some(vec![literal_env("B", "2"), literal_env("A", "1")]);
    shuffled.ports = Some(vec![port(Some("https"), 443), port(Some("http"), 80)]);

    assert_eq!(
        deployment(Some(1), vec![ordered]).fingerprint_hash().unwrap(),
        deployment(Some(1), vec![shuffled]).fingerprint_hash().unwrap()
    );
}

#[test]
fn test_image_change_changes_hash() {
    let before = deployment(Some(1), vec![container("app", "nginx:1.27")]);
    let after = deployment(Some(1), vec![container("app", "nginx:1.28")]);

    assert_ne!(
        before.fingerprint_hash().unwrap(),
        after.fingerprint_hash().unwrap()
    );
}

#[test]
fn test_indirect_env_entries_are_ignored() {
    let plain = container("app", "nginx:1.27");

    let mut with_secret = plain.clone();
    with_secret.env = Some(vec![secret_env("API_TOKEN", "token")]);

    let mut with_other_secret = plain.clone();
    with_other_secret.env = Some(vec![secret_env("API_TOKEN", "rotated-token")]);

    let baseline = deployment(Some(1), vec![plain]).fingerprint_hash().unwrap();
    assert_eq!(
        baseline,
        deployment(Some(1), vec![with_secret]).fingerprint_hash().unwrap()
    );
    assert_eq!(
        baseline,
        deployment(Some(1), vec![with_other_secret]).fingerprint_hash().unwrap()
    );
}

#[test]
fn test_literal_env_change_changes_hash() {
    let mut before = container("app", "nginx:1.27");
    before.env = Some(vec![literal_env("LOG_LEVEL", "info")]);

    let mut after = container("app", "nginx:1.27");
    after.env = Some(vec![literal_env("LOG_LEVEL", "debug")]);

    assert_ne!(
        deployment(Some(1), vec![before]).fingerprint_hash().unwrap(),
        deployment(Some(1), vec![after]).fingerprint_hash().unwrap()
    );
}

#[test]
fn test_empty_env_value_is_distinct_from_absence() {
    let mut with_empty = container("app", "nginx:1.27");
    with_empty.env = Some(vec![literal_env("FLAG", "")]);

    let without = container("app", "nginx:1.27");

    assert_ne!(
        deployment(Some(1), vec![with_empty]).fingerprint_hash().unwrap(),
        deployment(Some(1), vec![without]).fingerprint_hash().unwrap()
    );
}

#[test]
fn test_replicas_unset_is_distinct_from_zero() {
    let unset = deployment(None, vec![container("app", "nginx:1.27")]);
    let zero = deployment(Some(0), vec![container("app", "nginx:1.27")]);

    assert_ne!(
        unset.fingerprint_hash().unwrap(),
        zero.fingerprint_hash().unwrap()
    );
}

#[test]
fn test_replicas_change_changes_hash() {
    let two = deployment(Some(2), vec![container("app", "nginx:1.27")]);
    let three = deployment(Some(3), vec![container("app", "nginx:1.27")]);

    assert_ne!(
        two.fingerprint_hash().unwrap(),
        three.fingerprint_hash().unwrap()
    );
}

#[test]
fn test_template_label_whitespace_is_trimmed() {
    let padded = deployment_with_template_labels(
        Some(1),
        vec![container("app", "nginx:1.27")],
        BTreeMap::from([("app".to_string(), "  web  ".to_string())]),
    );
    let trimmed = deployment_with_template_labels(
        Some(1),
        vec![container("app", "nginx:1.27")],
        BTreeMap::from([("app".to_string(), "web".to_string())]),
    );

    assert_eq!(
        padded.fingerprint_hash().unwrap(),
        trimmed.fingerprint_hash().unwrap()
    );
}

#[test]
fn test_resource_limits_change_changes_hash() {
    let mut before = container("app", "nginx:1.27");
    before.resources = Some(ResourceRequirements {
        limits: Some(BTreeMap::from([(
            "memory".to_string(),
            Quantity("256Mi".to_string()),
        )])),
        ..Default::default()
    });

    let mut after = before.clone();
    after.resources = Some(ResourceRequirements {
        limits: Some(BTreeMap::from([(
            "memory".to_string(),
            Quantity("512Mi".to_string()),
        )])),
        ..Default::default()
    });

    assert_ne!(
        deployment(Some(1), vec![before]).fingerprint_hash().unwrap(),
        deployment(Some(1), vec![after]).fingerprint_hash().unwrap()
    );
}

#[test]
fn test_status_does_not_affect_hash() {
    let plain = deployment(Some(2), vec![container("app", "nginx:1.27")]);

    let mut with_status = plain.clone();
    with_status.status = Some(DeploymentStatus {
        available_replicas: Some(2),
        ready_replicas: Some(2),
        ..Default::default()
    });

    assert_eq!(
        plain.fingerprint_hash().unwrap(),
        with_status.fingerprint_hash().unwrap()
    );
}
