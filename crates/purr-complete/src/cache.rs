use crate::kinds;

/// Cluster data the completion engine draws from. Implementations are
/// best-effort mirrors; callers tolerate bounded staleness. All methods
/// copy out so no lock is held across rendering.
pub trait ClusterCache: Send + Sync {
    /// All known namespace names, sorted.
    fn namespaces(&self) -> Vec<String>;

    /// Names of resources of `kind` in `namespace`, sorted. `kind` accepts
    /// the same aliases as the parser; unknown kinds yield an empty list.
    /// The namespace is ignored for cluster-scoped kinds.
    fn resource_names(&self, kind: &str, namespace: &str) -> Vec<String>;

    /// Container names (main + init) for a pod, or the pod template
    /// containers of a workload when `resource_kind` names one.
    fn containers(&self, namespace: &str, resource_kind: &str, resource_name: &str) -> Vec<String>;

    /// Well-known plural names and short aliases.
    fn resource_types(&self) -> Vec<String> {
        kinds::RESOURCE_TYPES.iter().map(|s| s.to_string()).collect()
    }

    /// Narrower list for commands bound to a subset of kinds; empty means
    /// "all".
    fn resource_types_for_command(&self, path: &[String]) -> Vec<String> {
        kinds::types_for_command(path).iter().map(|s| s.to_string()).collect()
    }
}
