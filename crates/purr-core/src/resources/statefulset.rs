use jiff::Timestamp;
use k8s_openapi::api::apps::v1::StatefulSet;

use crate::resource::{creation_time, pod_spec_containers, ResourceSummary};

#[derive(Debug, Clone)]
pub struct StatefulSetSummary {
    pub name: String,
    pub namespace: String,
    pub ready: String,
    pub containers: Vec<String>,
    pub init_containers: Vec<String>,
    pub created: Option<Timestamp>,
}

impl ResourceSummary for StatefulSetSummary {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        Some(&self.namespace)
    }

    fn status_display(&self) -> String {
        format!("Ready {}", self.ready)
    }

    fn created(&self) -> Option<Timestamp> {
        self.created
    }
}

impl From<&StatefulSet> for StatefulSetSummary {
    fn from(statefulset: &StatefulSet) -> Self {
        let metadata = &statefulset.metadata;
        let name = metadata.name.clone().unwrap_or_default();
        let namespace = metadata.namespace.clone().unwrap_or_else(|| "default".into());

        let desired = statefulset.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);
        let ready_replicas = statefulset.status.as_ref().and_then(|s| s.ready_replicas).unwrap_or(0);
        let ready = format!("{ready_replicas}/{desired}");

        let (containers, init_containers) =
            pod_spec_containers(statefulset.spec.as_ref().and_then(|s| s.template.spec.as_ref()));

        let created = creation_time(metadata.creation_timestamp.as_ref());

        Self { name, namespace, ready, containers, init_containers, created }
    }
}

impl From<StatefulSet> for StatefulSetSummary {
    fn from(statefulset: StatefulSet) -> Self {
        Self::from(&statefulset)
    }
}
