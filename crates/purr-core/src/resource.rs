use jiff::Timestamp;
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

/// Common surface of the cached per-kind summaries.
pub trait ResourceSummary: Send + Sync {
    fn name(&self) -> &str;
    /// `None` for cluster-scoped kinds.
    fn namespace(&self) -> Option<&str>;
    fn status_display(&self) -> String;
    fn created(&self) -> Option<Timestamp>;
}

pub(crate) fn creation_time(ts: Option<&Time>) -> Option<Timestamp> {
    ts.and_then(|t| Timestamp::from_second(t.0.timestamp()).ok())
}

/// Main and init container names of a pod spec.
pub(crate) fn pod_spec_containers(spec: Option<&PodSpec>) -> (Vec<String>, Vec<String>) {
    let Some(spec) = spec else {
        return (Vec::new(), Vec::new());
    };
    let containers = spec.containers.iter().map(|c| c.name.clone()).collect();
    let init_containers = spec
        .init_containers
        .as_ref()
        .map(|cs| cs.iter().map(|c| c.name.clone()).collect())
        .unwrap_or_default();
    (containers, init_containers)
}
