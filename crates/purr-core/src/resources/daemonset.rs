use jiff::Timestamp;
use k8s_openapi::api::apps::v1::DaemonSet;

use crate::resource::{creation_time, pod_spec_containers, ResourceSummary};

#[derive(Debug, Clone)]
pub struct DaemonSetSummary {
    pub name: String,
    pub namespace: String,
    pub ready: String,
    pub containers: Vec<String>,
    pub init_containers: Vec<String>,
    pub created: Option<Timestamp>,
}

impl ResourceSummary for DaemonSetSummary {
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

impl From<&DaemonSet> for DaemonSetSummary {
    fn from(daemonset: &DaemonSet) -> Self {
        let metadata = &daemonset.metadata;
        let name = metadata.name.clone().unwrap_or_default();
        let namespace = metadata.namespace.clone().unwrap_or_else(|| "default".into());

        let (ready_count, desired) = daemonset
            .status
            .as_ref()
            .map(|s| (s.number_ready, s.desired_number_scheduled))
            .unwrap_or((0, 0));
        let ready = format!("{ready_count}/{desired}");

        let (containers, init_containers) =
            pod_spec_containers(daemonset.spec.as_ref().and_then(|s| s.template.spec.as_ref()));

        let created = creation_time(metadata.creation_timestamp.as_ref());

        Self { name, namespace, ready, containers, init_containers, created }
    }
}

impl From<DaemonSet> for DaemonSetSummary {
    fn from(daemonset: DaemonSet) -> Self {
        Self::from(&daemonset)
    }
}
