mod mock;
mod watch;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Node, Pod, Secret, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::ListParams;
use kube::{Api, Client};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use purr_complete::kinds;
use purr_complete::ClusterCache;

use crate::error::KubeError;
use crate::resource::ResourceSummary;
use crate::resources::{
    ConfigMapSummary, CronJobSummary, DaemonSetSummary, DeploymentSummary, IngressSummary, JobSummary,
    NamespaceSummary, NodeSummary, PodSummary, SecretSummary, ServiceSummary, StatefulSetSummary,
};

pub use mock::MockCache;
use watch::{apply_cluster_event, apply_namespace_event, apply_namespaced_event, spawn_watcher};

const RESYNC_INTERVAL: Duration = Duration::from_secs(300);

/// All buckets behind the cache's single reader-writer lock. Within a
/// (kind, namespace) bucket names are unique; reads copy out.
#[derive(Default)]
pub(crate) struct CacheState {
    pub namespaces: Vec<NamespaceSummary>,
    pub nodes: Vec<NodeSummary>,
    pub pods: HashMap<String, Vec<PodSummary>>,
    pub deployments: HashMap<String, Vec<DeploymentSummary>>,
    pub statefulsets: HashMap<String, Vec<StatefulSetSummary>>,
    pub daemonsets: HashMap<String, Vec<DaemonSetSummary>>,
    pub services: HashMap<String, Vec<ServiceSummary>>,
    pub configmaps: HashMap<String, Vec<ConfigMapSummary>>,
    pub secrets: HashMap<String, Vec<SecretSummary>>,
    pub jobs: HashMap<String, Vec<JobSummary>>,
    pub cronjobs: HashMap<String, Vec<CronJobSummary>>,
    pub ingresses: HashMap<String, Vec<IngressSummary>>,
    pub last_refresh: Option<Instant>,
}

impl CacheState {
    /// Removes every namespaced bucket keyed by a deleted namespace.
    pub(crate) fn drop_namespace(&mut self, namespace: &str) {
        self.pods.remove(namespace);
        self.deployments.remove(namespace);
        self.statefulsets.remove(namespace);
        self.daemonsets.remove(namespace);
        self.services.remove(namespace);
        self.configmaps.remove(namespace);
        self.secrets.remove(namespace);
        self.jobs.remove(namespace);
        self.cronjobs.remove(namespace);
        self.ingresses.remove(namespace);
    }

    pub(crate) fn namespace_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.namespaces.iter().map(|n| n.name.clone()).collect();
        names.sort();
        names
    }

    pub(crate) fn resource_names(&self, kind: &str, namespace: &str) -> Vec<String> {
        match kinds::canonical(kind) {
            "pods" => names_in(&self.pods, namespace),
            "deployments" => names_in(&self.deployments, namespace),
            "statefulsets" => names_in(&self.statefulsets, namespace),
            "daemonsets" => names_in(&self.daemonsets, namespace),
            "services" => names_in(&self.services, namespace),
            "configmaps" => names_in(&self.configmaps, namespace),
            "secrets" => names_in(&self.secrets, namespace),
            "jobs" => names_in(&self.jobs, namespace),
            "cronjobs" => names_in(&self.cronjobs, namespace),
            "ingresses" => names_in(&self.ingresses, namespace),
            "nodes" => {
                let mut names: Vec<String> = self.nodes.iter().map(|n| n.name.clone()).collect();
                names.sort();
                names
            }
            "namespaces" => self.namespace_names(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn containers(&self, namespace: &str, resource_kind: &str, resource_name: &str) -> Vec<String> {
        let namespace = if namespace.is_empty() { "default" } else { namespace };
        let mut out: Vec<String> = Vec::new();

        match kinds::canonical(resource_kind) {
            "deployments" => {
                collect_workload_containers(&self.deployments, namespace, resource_name, &mut out);
            }
            "statefulsets" => {
                collect_workload_containers(&self.statefulsets, namespace, resource_name, &mut out);
            }
            "daemonsets" => {
                collect_workload_containers(&self.daemonsets, namespace, resource_name, &mut out);
            }
            _ => {
                if let Some(pods) = self.pods.get(namespace) {
                    for pod in pods {
                        if !resource_name.is_empty() && pod.name != resource_name {
                            continue;
                        }
                        out.extend(pod.containers.iter().cloned());
                        out.extend(pod.init_containers.iter().cloned());
                    }
                }
            }
        }

        dedup_in_order(out)
    }
}

fn names_in<S: ResourceSummary>(map: &HashMap<String, Vec<S>>, namespace: &str) -> Vec<String> {
    let mut names: Vec<String> =
        map.get(namespace).map(|bucket| bucket.iter().map(|r| r.name().to_string()).collect()).unwrap_or_default();
    names.sort();
    names
}

/// Workload kinds whose pod template supplies container names.
trait TemplateContainers: ResourceSummary {
    fn template_containers(&self) -> (&[String], &[String]);
}

impl TemplateContainers for DeploymentSummary {
    fn template_containers(&self) -> (&[String], &[String]) {
        (&self.containers, &self.init_containers)
    }
}

impl TemplateContainers for StatefulSetSummary {
    fn template_containers(&self) -> (&[String], &[String]) {
        (&self.containers, &self.init_containers)
    }
}

impl TemplateContainers for DaemonSetSummary {
    fn template_containers(&self) -> (&[String], &[String]) {
        (&self.containers, &self.init_containers)
    }
}

fn collect_workload_containers<S: TemplateContainers>(
    map: &HashMap<String, Vec<S>>,
    namespace: &str,
    name: &str,
    out: &mut Vec<String>,
) {
    if let Some(bucket) = map.get(namespace) {
        for workload in bucket {
            if !name.is_empty() && workload.name() != name {
                continue;
            }
            let (containers, init_containers) = workload.template_containers();
            out.extend(containers.iter().cloned());
            out.extend(init_containers.iter().cloned());
        }
    }
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

pub(crate) fn read_state(state: &RwLock<CacheState>) -> RwLockReadGuard<'_, CacheState> {
    state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn write_state(state: &RwLock<CacheState>) -> RwLockWriteGuard<'_, CacheState> {
    state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Watch-backed mirror of cluster state. One background task per kind
/// keeps its bucket current; a coarse fallback resync repairs divergence
/// from missed events. Reads never block on the network.
pub struct LiveCache {
    client: Client,
    state: Arc<RwLock<CacheState>>,
    refreshing: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl LiveCache {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(CacheState::default())),
            refreshing: Arc::new(AtomicBool::new(false)),
            cancel: CancellationToken::new(),
        }
    }

    /// Begins background work. The namespace list is fetched up front and
    /// a failure there is fatal; everything else fills in behind
    /// [`LiveCache::ready`].
    pub async fn start(&self) -> Result<(), KubeError> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let initial = api
            .list(&ListParams::default())
            .await
            .map_err(|e| KubeError::ApiError(format!("initial namespace list failed: {e}")))?;
        {
            let mut state = write_state(&self.state);
            state.namespaces = initial.items.iter().map(NamespaceSummary::from).collect();
        }
        info!(namespaces = read_state(&self.state).namespaces.len(), "cluster cache starting");

        self.spawn_watchers();
        self.spawn_resync();
        Ok(())
    }

    /// Cancels all background work; safe to call more than once.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// True once the initial full list of every kind has completed.
    pub fn ready(&self) -> bool {
        read_state(&self.state).last_refresh.is_some()
    }

    fn spawn_watchers(&self) {
        let client = &self.client;
        spawn_watcher::<Namespace, NamespaceSummary, _>(
            "namespaces",
            Api::all(client.clone()),
            self.state.clone(),
            self.cancel.clone(),
            apply_namespace_event,
        );
        spawn_watcher::<Node, NodeSummary, _>(
            "nodes",
            Api::all(client.clone()),
            self.state.clone(),
            self.cancel.clone(),
            |state, event| apply_cluster_event(&mut state.nodes, event),
        );
        spawn_watcher::<Pod, PodSummary, _>(
            "pods",
            Api::all(client.clone()),
            self.state.clone(),
            self.cancel.clone(),
            |state, event| apply_namespaced_event(&mut state.pods, event),
        );
        spawn_watcher::<Deployment, DeploymentSummary, _>(
            "deployments",
            Api::all(client.clone()),
            self.state.clone(),
            self.cancel.clone(),
            |state, event| apply_namespaced_event(&mut state.deployments, event),
        );
        spawn_watcher::<StatefulSet, StatefulSetSummary, _>(
            "statefulsets",
            Api::all(client.clone()),
            self.state.clone(),
            self.cancel.clone(),
            |state, event| apply_namespaced_event(&mut state.statefulsets, event),
        );
        spawn_watcher::<DaemonSet, DaemonSetSummary, _>(
            "daemonsets",
            Api::all(client.clone()),
            self.state.clone(),
            self.cancel.clone(),
            |state, event| apply_namespaced_event(&mut state.daemonsets, event),
        );
        spawn_watcher::<Service, ServiceSummary, _>(
            "services",
            Api::all(client.clone()),
            self.state.clone(),
            self.cancel.clone(),
            |state, event| apply_namespaced_event(&mut state.services, event),
        );
        spawn_watcher::<ConfigMap, ConfigMapSummary, _>(
            "configmaps",
            Api::all(client.clone()),
            self.state.clone(),
            self.cancel.clone(),
            |state, event| apply_namespaced_event(&mut state.configmaps, event),
        );
        spawn_watcher::<Secret, SecretSummary, _>(
            "secrets",
            Api::all(client.clone()),
            self.state.clone(),
            self.cancel.clone(),
            |state, event| apply_namespaced_event(&mut state.secrets, event),
        );
        spawn_watcher::<Job, JobSummary, _>(
            "jobs",
            Api::all(client.clone()),
            self.state.clone(),
            self.cancel.clone(),
            |state, event| apply_namespaced_event(&mut state.jobs, event),
        );
        spawn_watcher::<CronJob, CronJobSummary, _>(
            "cronjobs",
            Api::all(client.clone()),
            self.state.clone(),
            self.cancel.clone(),
            |state, event| apply_namespaced_event(&mut state.cronjobs, event),
        );
        spawn_watcher::<Ingress, IngressSummary, _>(
            "ingresses",
            Api::all(client.clone()),
            self.state.clone(),
            self.cancel.clone(),
            |state, event| apply_namespaced_event(&mut state.ingresses, event),
        );
    }

    fn spawn_resync(&self) {
        let client = self.client.clone();
        let state = self.state.clone();
        let refreshing = self.refreshing.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            // Initial full list; flips `ready` when done.
            resync(&client, &state, &refreshing).await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(RESYNC_INTERVAL) => {
                        resync(&client, &state, &refreshing).await;
                    }
                }
            }
        });
    }
}

impl Drop for LiveCache {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl ClusterCache for LiveCache {
    fn namespaces(&self) -> Vec<String> {
        read_state(&self.state).namespace_names()
    }

    fn resource_names(&self, kind: &str, namespace: &str) -> Vec<String> {
        read_state(&self.state).resource_names(kind, namespace)
    }

    fn containers(&self, namespace: &str, resource_kind: &str, resource_name: &str) -> Vec<String> {
        read_state(&self.state).containers(namespace, resource_kind, resource_name)
    }
}

/// Full list of every kind. Per-kind failures are logged and the rest
/// proceeds; the watchers keep the buckets current between runs.
async fn resync(client: &Client, state: &Arc<RwLock<CacheState>>, refreshing: &AtomicBool) {
    if refreshing.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
        return;
    }

    match list_cluster::<Namespace, NamespaceSummary>(Api::all(client.clone())).await {
        Ok(items) => write_state(state).namespaces = items,
        Err(e) => warn!(kind = "namespaces", error = %e, "resync list failed"),
    }
    match list_cluster::<Node, NodeSummary>(Api::all(client.clone())).await {
        Ok(items) => write_state(state).nodes = items,
        Err(e) => warn!(kind = "nodes", error = %e, "resync list failed"),
    }
    match list_namespaced::<Pod, PodSummary>(Api::all(client.clone())).await {
        Ok(buckets) => write_state(state).pods = buckets,
        Err(e) => warn!(kind = "pods", error = %e, "resync list failed"),
    }
    match list_namespaced::<Deployment, DeploymentSummary>(Api::all(client.clone())).await {
        Ok(buckets) => write_state(state).deployments = buckets,
        Err(e) => warn!(kind = "deployments", error = %e, "resync list failed"),
    }
    match list_namespaced::<StatefulSet, StatefulSetSummary>(Api::all(client.clone())).await {
        Ok(buckets) => write_state(state).statefulsets = buckets,
        Err(e) => warn!(kind = "statefulsets", error = %e, "resync list failed"),
    }
    match list_namespaced::<DaemonSet, DaemonSetSummary>(Api::all(client.clone())).await {
        Ok(buckets) => write_state(state).daemonsets = buckets,
        Err(e) => warn!(kind = "daemonsets", error = %e, "resync list failed"),
    }
    match list_namespaced::<Service, ServiceSummary>(Api::all(client.clone())).await {
        Ok(buckets) => write_state(state).services = buckets,
        Err(e) => warn!(kind = "services", error = %e, "resync list failed"),
    }
    match list_namespaced::<ConfigMap, ConfigMapSummary>(Api::all(client.clone())).await {
        Ok(buckets) => write_state(state).configmaps = buckets,
        Err(e) => warn!(kind = "configmaps", error = %e, "resync list failed"),
    }
    match list_namespaced::<Secret, SecretSummary>(Api::all(client.clone())).await {
        Ok(buckets) => write_state(state).secrets = buckets,
        Err(e) => warn!(kind = "secrets", error = %e, "resync list failed"),
    }
    match list_namespaced::<Job, JobSummary>(Api::all(client.clone())).await {
        Ok(buckets) => write_state(state).jobs = buckets,
        Err(e) => warn!(kind = "jobs", error = %e, "resync list failed"),
    }
    match list_namespaced::<CronJob, CronJobSummary>(Api::all(client.clone())).await {
        Ok(buckets) => write_state(state).cronjobs = buckets,
        Err(e) => warn!(kind = "cronjobs", error = %e, "resync list failed"),
    }
    match list_namespaced::<Ingress, IngressSummary>(Api::all(client.clone())).await {
        Ok(buckets) => write_state(state).ingresses = buckets,
        Err(e) => warn!(kind = "ingresses", error = %e, "resync list failed"),
    }

    write_state(state).last_refresh = Some(Instant::now());
    refreshing.store(false, Ordering::Release);
}

async fn list_cluster<K, S>(api: Api<K>) -> kube::Result<Vec<S>>
where
    K: Clone + DeserializeOwned + std::fmt::Debug,
    S: From<K>,
{
    let list = api.list(&ListParams::default()).await?;
    Ok(list.items.into_iter().map(S::from).collect())
}

async fn list_namespaced<K, S>(api: Api<K>) -> kube::Result<HashMap<String, Vec<S>>>
where
    K: Clone + DeserializeOwned + std::fmt::Debug,
    S: ResourceSummary + From<K>,
{
    let list = api.list(&ListParams::default()).await?;
    let mut buckets: HashMap<String, Vec<S>> = HashMap::new();
    for item in list.items {
        let summary = S::from(item);
        buckets.entry(summary.namespace().unwrap_or("default").to_string()).or_default().push(summary);
    }
    Ok(buckets)
}

#[cfg(test)]
mod tests;
