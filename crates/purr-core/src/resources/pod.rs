use std::fmt;

use jiff::Timestamp;
use k8s_openapi::api::core::v1::Pod;

use crate::resource::{creation_time, pod_spec_containers, ResourceSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum PodPhase {
    Running,
    Pending,
    Succeeded,
    Failed,
    Unknown,
}

impl fmt::Display for PodPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Pending => write!(f, "Pending"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PodSummary {
    pub name: String,
    pub namespace: String,
    pub phase: PodPhase,
    pub ready: String,
    pub restarts: i32,
    pub containers: Vec<String>,
    pub init_containers: Vec<String>,
    pub created: Option<Timestamp>,
}

impl ResourceSummary for PodSummary {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        Some(&self.namespace)
    }

    fn status_display(&self) -> String {
        self.phase.to_string()
    }

    fn created(&self) -> Option<Timestamp> {
        self.created
    }
}

impl From<&Pod> for PodSummary {
    fn from(pod: &Pod) -> Self {
        let metadata = &pod.metadata;
        let name = metadata.name.clone().unwrap_or_default();
        let namespace = metadata.namespace.clone().unwrap_or_else(|| "default".into());

        let phase = pod
            .status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .map(|p| match p {
                "Running" => PodPhase::Running,
                "Pending" => PodPhase::Pending,
                "Succeeded" => PodPhase::Succeeded,
                "Failed" => PodPhase::Failed,
                _ => PodPhase::Unknown,
            })
            .unwrap_or(PodPhase::Unknown);

        let container_statuses = pod.status.as_ref().and_then(|s| s.container_statuses.as_ref());

        let (ready_count, total_count) = container_statuses
            .map(|cs| {
                let total = cs.len();
                let ready = cs.iter().filter(|c| c.ready).count();
                (ready, total)
            })
            .unwrap_or((0, 0));
        let ready = format!("{ready_count}/{total_count}");

        let restarts = container_statuses.map(|cs| cs.iter().map(|c| c.restart_count).sum()).unwrap_or(0);

        let (containers, init_containers) = pod_spec_containers(pod.spec.as_ref());

        let created = creation_time(metadata.creation_timestamp.as_ref());

        Self { name, namespace, phase, ready, restarts, containers, init_containers, created }
    }
}

impl From<Pod> for PodSummary {
    fn from(pod: Pod) -> Self {
        Self::from(&pod)
    }
}
