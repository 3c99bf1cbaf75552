// Copyright (c) 2026 Driftwatch Contributors
// SPDX-License-Identifier: MIT

use anyhow::Result;
use driftwatch::{
    constants::{
        CONTROLLER_NAME, ERROR_REQUEUE_DURATION_SECS, RECHECK_REQUEUE_DURATION_SECS,
        TOKIO_WORKER_THREADS,
    },
    errors::DriftError,
    events::KubeEventNotifier,
    fingerprint::Fingerprint,
    reconcilers::{reconcile_drift, Outcome},
    store::ApiStore,
};
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::{
    core::NamespaceResourceScope,
    runtime::{controller::Action, watcher::Config, Controller},
    Api, Client, Resource, ResourceExt,
};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Per-kind context handed to every reconciliation.
struct Ctx<K> {
    store: ApiStore<K>,
    notifier: KubeEventNotifier,
}

fn main() -> Result<()> {
    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name(CONTROLLER_NAME)
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    // Initialize logging with custom format
    //
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Example: RUST_LOG=debug cargo run
    //
    // Respects RUST_LOG_FORMAT environment variable for output format
    // Example: RUST_LOG_FORMAT=json cargo run
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    info!("Starting driftwatch controller");

    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized");

    // Run controllers concurrently
    // Controllers should never exit - if one does, we log it and exit the main process
    tokio::select! {
        result = run_drift_controller::<Deployment>(client.clone()) => {
            error!("CRITICAL: Deployment drift controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("Deployment drift controller exited unexpectedly without error")
        }
        result = run_drift_controller::<Service>(client.clone()) => {
            error!("CRITICAL: Service drift controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("Service drift controller exited unexpectedly without error")
        }
    }
}

/// Run the drift controller for one watched kind.
async fn run_drift_controller<K>(client: Client) -> Result<()>
where
    K: Fingerprint
        + Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + Clone
        + Debug
        + serde::Serialize
        + serde::de::DeserializeOwned
        + Send
        + Sync
        + 'static,
{
    info!(kind = K::KIND, "Starting drift controller");

    let api = Api::<K>::all(client.clone());
    let ctx = Arc::new(Ctx {
        store: ApiStore::new(client.clone()),
        notifier: KubeEventNotifier::new(client),
    });

    Controller::new(api, Config::default())
        .run(reconcile_resource::<K>, error_policy::<K>, ctx)
        .for_each(|_| futures::future::ready(()))
        .await;

    Ok(())
}

/// Reconcile wrapper bridging the controller runtime to [`reconcile_drift`].
async fn reconcile_resource<K>(
    resource: Arc<K>,
    ctx: Arc<Ctx<K>>,
) -> Result<Action, DriftError>
where
    K: Fingerprint
        + Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + Clone
        + Debug
        + serde::Serialize
        + serde::de::DeserializeOwned
        + Send
        + Sync,
{
    let namespace = resource.namespace().unwrap_or_default();
    let name = resource.name_any();

    match reconcile_drift::<K, _, _>(&ctx.store, &ctx.notifier, &namespace, &name).await {
        Ok(outcome) => {
            match outcome {
                Outcome::Missing | Outcome::Disabled => {
                    debug!(kind = K::KIND, %namespace, %name, ?outcome, "Reconciled");
                }
                Outcome::NoBaseline | Outcome::Clean | Outcome::Drifted => {
                    info!(kind = K::KIND, %namespace, %name, ?outcome, "Reconciled");
                }
            }
            Ok(Action::requeue(Duration::from_secs(
                RECHECK_REQUEUE_DURATION_SECS,
            )))
        }
        Err(e) => {
            error!(kind = K::KIND, %namespace, %name, error = %e, "Failed to reconcile");
            Err(e)
        }
    }
}

/// Error policy: transient failures requeue quickly, deterministic ones on
/// the normal recheck cadence (they cannot succeed until the spec changes).
fn error_policy<K>(_resource: Arc<K>, err: &DriftError, _ctx: Arc<Ctx<K>>) -> Action
where
    K: Resource<DynamicType = ()> + Clone + Debug + Send + Sync,
{
    if err.is_retryable() {
        Action::requeue(Duration::from_secs(ERROR_REQUEUE_DURATION_SECS))
    } else {
        Action::requeue(Duration::from_secs(RECHECK_REQUEUE_DURATION_SECS))
    }
}
