use jiff::Timestamp;

use super::watch::{apply_namespace_event, apply_namespaced_event, CacheEvent};
use super::*;
use crate::resources::{NamespaceSummary, PodPhase, PodSummary};

fn pod(name: &str, namespace: &str) -> PodSummary {
    PodSummary {
        name: name.to_string(),
        namespace: namespace.to_string(),
        phase: PodPhase::Running,
        ready: "1/1".to_string(),
        restarts: 0,
        containers: vec!["app".to_string()],
        init_containers: Vec::new(),
        created: Some(Timestamp::now()),
    }
}

fn namespace(name: &str) -> NamespaceSummary {
    NamespaceSummary { name: name.to_string(), status: "Active".to_string(), created: None }
}

#[test]
fn upsert_never_duplicates() {
    let mut state = CacheState::default();
    apply_namespaced_event(&mut state.pods, CacheEvent::Upsert(pod("web", "default")));
    apply_namespaced_event(&mut state.pods, CacheEvent::Upsert(pod("web", "default")));

    assert_eq!(state.pods["default"].len(), 1);
}

#[test]
fn modified_replaces_in_place() {
    let mut state = CacheState::default();
    apply_namespaced_event(&mut state.pods, CacheEvent::Upsert(pod("web", "default")));
    apply_namespaced_event(&mut state.pods, CacheEvent::Upsert(pod("other", "default")));

    let mut changed = pod("web", "default");
    changed.phase = PodPhase::Failed;
    apply_namespaced_event(&mut state.pods, CacheEvent::Upsert(changed));

    let bucket = &state.pods["default"];
    assert_eq!(bucket.len(), 2);
    assert_eq!(bucket[0].name, "web");
    assert_eq!(bucket[0].phase, PodPhase::Failed);
}

#[test]
fn delete_removes_by_name() {
    let mut state = CacheState::default();
    apply_namespaced_event(&mut state.pods, CacheEvent::Upsert(pod("web", "default")));
    apply_namespaced_event(&mut state.pods, CacheEvent::Upsert(pod("other", "default")));
    apply_namespaced_event(&mut state.pods, CacheEvent::Remove(pod("web", "default")));

    assert_eq!(state.resource_names("pods", "default"), vec!["other"]);
}

#[test]
fn delete_in_one_namespace_leaves_others() {
    let mut state = CacheState::default();
    apply_namespaced_event(&mut state.pods, CacheEvent::Upsert(pod("web", "default")));
    apply_namespaced_event(&mut state.pods, CacheEvent::Upsert(pod("web", "staging")));
    apply_namespaced_event(&mut state.pods, CacheEvent::Remove(pod("web", "default")));

    assert!(state.resource_names("pods", "default").is_empty());
    assert_eq!(state.resource_names("pods", "staging"), vec!["web"]);
}

#[test]
fn namespace_delete_cascades_to_namespaced_buckets() {
    let mut state = CacheState::default();
    apply_namespace_event(&mut state, CacheEvent::Upsert(namespace("doomed")));
    apply_namespace_event(&mut state, CacheEvent::Upsert(namespace("default")));
    apply_namespaced_event(&mut state.pods, CacheEvent::Upsert(pod("web", "doomed")));
    apply_namespaced_event(&mut state.pods, CacheEvent::Upsert(pod("web", "default")));

    apply_namespace_event(&mut state, CacheEvent::Remove(namespace("doomed")));

    assert_eq!(state.namespace_names(), vec!["default"]);
    assert!(state.resource_names("pods", "doomed").is_empty());
    assert_eq!(state.resource_names("pods", "default"), vec!["web"]);
}

#[test]
fn restart_clears_kind_buckets() {
    let mut state = CacheState::default();
    apply_namespaced_event(&mut state.pods, CacheEvent::Upsert(pod("web", "default")));
    apply_namespaced_event(&mut state.pods, CacheEvent::Restart);
    assert!(state.pods.is_empty());

    // A re-list follows a restart.
    apply_namespaced_event(&mut state.pods, CacheEvent::Upsert(pod("web", "default")));
    assert_eq!(state.resource_names("pods", "default"), vec!["web"]);
}

#[test]
fn resource_names_resolve_aliases() {
    let cache = MockCache::demo();
    assert_eq!(cache.resource_names("po", "default"), cache.resource_names("pods", "default"));
    assert_eq!(cache.resource_names("deploy", "default"), cache.resource_names("deployments", "default"));
    assert!(!cache.resource_names("pods", "default").is_empty());
}

#[test]
fn unknown_kind_returns_empty() {
    let cache = MockCache::demo();
    assert!(cache.resource_names("widgets", "default").is_empty());
    assert!(cache.resource_names("persistentvolumes", "default").is_empty());
}

#[test]
fn cluster_scoped_names_ignore_namespace() {
    let cache = MockCache::demo();
    assert_eq!(cache.resource_names("nodes", "default"), cache.resource_names("nodes", "kube-system"));
    assert_eq!(cache.resource_names("no", ""), vec!["node-1", "node-2", "node-3"]);
}

#[test]
fn namespaces_are_sorted() {
    let cache = MockCache::demo();
    let namespaces = cache.namespaces();
    let mut sorted = namespaces.clone();
    sorted.sort();
    assert_eq!(namespaces, sorted);
    assert!(namespaces.contains(&"production".to_string()));
}

#[test]
fn pod_containers_include_init_containers() {
    let cache = MockCache::demo();
    let containers = cache.containers("default", "pods", "backend-api-6b5c4d-xyz56");
    assert_eq!(containers, vec!["api", "istio-proxy", "init-db"]);
}

#[test]
fn workload_containers_come_from_template() {
    let cache = MockCache::demo();
    let containers = cache.containers("default", "deployment", "backend-api");
    assert_eq!(containers, vec!["api", "istio-proxy"]);
}

#[test]
fn containers_without_name_are_deduplicated() {
    let cache = MockCache::demo();
    let containers = cache.containers("default", "", "");
    let mut unique = containers.clone();
    unique.dedup();
    assert_eq!(containers, unique);
    assert!(containers.contains(&"nginx".to_string()));
}

#[test]
fn empty_namespace_defaults_for_containers() {
    let cache = MockCache::demo();
    assert_eq!(cache.containers("", "pods", "redis-cache-5c9d3a-mno90"), vec!["redis"]);
}

#[test]
fn mock_cache_is_immediately_ready() {
    let cache = MockCache::demo();
    assert!(cache.ready());
    cache.start();
    cache.stop();
    assert!(cache.ready());
}

#[test]
fn resource_types_cover_watched_kinds() {
    let cache = MockCache::demo();
    let types = cache.resource_types();
    for kind in ["pods", "deployments", "services", "namespaces", "nodes"] {
        assert!(types.contains(&kind.to_string()), "missing {kind}");
    }
}

#[test]
fn per_command_narrowing_passes_through() {
    let cache = MockCache::demo();
    let path = vec!["rollout".to_string(), "restart".to_string()];
    let types = cache.resource_types_for_command(&path);
    assert!(types.contains(&"deployments".to_string()));
    assert!(!types.contains(&"pods".to_string()));
    assert!(cache.resource_types_for_command(&["get".to_string()]).is_empty());
}
