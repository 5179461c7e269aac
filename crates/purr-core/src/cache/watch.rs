use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures::StreamExt;
use kube::runtime::watcher::{self, Event};
use kube::{Api, Resource};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::resource::ResourceSummary;

use super::{write_state, CacheState};

const EVENT_RETRY: Duration = Duration::from_secs(1);
const OPEN_RETRY: Duration = Duration::from_secs(5);

/// A watch stream event reduced to what the buckets need.
pub(crate) enum CacheEvent<S> {
    Upsert(S),
    Remove(S),
    /// The stream is re-listing; the kind's buckets start over.
    Restart,
}

fn convert_event<K, S>(event: Event<K>) -> Option<CacheEvent<S>>
where
    S: From<K>,
{
    match event {
        Event::Apply(resource) | Event::InitApply(resource) => Some(CacheEvent::Upsert(S::from(resource))),
        Event::Delete(resource) => Some(CacheEvent::Remove(S::from(resource))),
        Event::Init => Some(CacheEvent::Restart),
        Event::InitDone => None,
    }
}

/// Insert-if-absent / replace-in-place, keyed by name.
pub(crate) fn upsert<S: ResourceSummary>(bucket: &mut Vec<S>, item: S) {
    match bucket.iter_mut().find(|r| r.name() == item.name()) {
        Some(existing) => *existing = item,
        None => bucket.push(item),
    }
}

pub(crate) fn apply_cluster_event<S: ResourceSummary>(bucket: &mut Vec<S>, event: CacheEvent<S>) {
    match event {
        CacheEvent::Upsert(item) => upsert(bucket, item),
        CacheEvent::Remove(item) => bucket.retain(|r| r.name() != item.name()),
        CacheEvent::Restart => bucket.clear(),
    }
}

pub(crate) fn apply_namespaced_event<S: ResourceSummary>(
    map: &mut HashMap<String, Vec<S>>,
    event: CacheEvent<S>,
) {
    match event {
        CacheEvent::Upsert(item) => {
            let bucket = map.entry(item.namespace().unwrap_or("default").to_string()).or_default();
            upsert(bucket, item);
        }
        CacheEvent::Remove(item) => {
            if let Some(bucket) = map.get_mut(item.namespace().unwrap_or("default")) {
                bucket.retain(|r| r.name() != item.name());
            }
        }
        CacheEvent::Restart => map.clear(),
    }
}

/// A deleted namespace takes every bucket keyed by it along.
pub(crate) fn apply_namespace_event(
    state: &mut CacheState,
    event: CacheEvent<crate::resources::NamespaceSummary>,
) {
    match event {
        CacheEvent::Upsert(item) => upsert(&mut state.namespaces, item),
        CacheEvent::Remove(item) => {
            state.namespaces.retain(|n| n.name != item.name);
            state.drop_namespace(&item.name);
        }
        CacheEvent::Restart => state.namespaces.clear(),
    }
}

/// One long-lived task per kind: open a watch, apply events under a short
/// write lock, and on closure or error sleep a bounded backoff and
/// reconnect. Survives API unavailability indefinitely.
pub(crate) fn spawn_watcher<K, S, F>(
    kind: &'static str,
    api: Api<K>,
    state: Arc<RwLock<CacheState>>,
    cancel: CancellationToken,
    apply: F,
) where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug + Send + 'static,
    S: From<K> + Send + 'static,
    F: Fn(&mut CacheState, CacheEvent<S>) + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let stream = watcher::watcher(api.clone(), watcher::Config::default());
            tokio::pin!(stream);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!(kind, "watcher cancelled");
                        return;
                    }
                    item = stream.next() => match item {
                        Some(Ok(event)) => {
                            if let Some(cache_event) = convert_event(event) {
                                let mut guard = write_state(&state);
                                apply(&mut *guard, cache_event);
                            }
                        }
                        Some(Err(e)) => {
                            let delay = match &e {
                                watcher::Error::InitialListFailed(_) | watcher::Error::WatchStartFailed(_) => {
                                    OPEN_RETRY
                                }
                                _ => EVENT_RETRY,
                            };
                            warn!(kind, error = %e, "watch stream error, retrying");
                            tokio::select! {
                                _ = cancel.cancelled() => return,
                                _ = tokio::time::sleep(delay) => {}
                            }
                        }
                        None => break,
                    }
                }
            }

            debug!(kind, "watch stream closed, reconnecting");
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(EVENT_RETRY) => {}
            }
        }
    });
}
