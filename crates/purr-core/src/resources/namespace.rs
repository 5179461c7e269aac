use jiff::Timestamp;
use k8s_openapi::api::core::v1::Namespace;

use crate::resource::{creation_time, ResourceSummary};

#[derive(Debug, Clone)]
pub struct NamespaceSummary {
    pub name: String,
    pub status: String,
    pub created: Option<Timestamp>,
}

impl ResourceSummary for NamespaceSummary {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        None
    }

    fn status_display(&self) -> String {
        self.status.clone()
    }

    fn created(&self) -> Option<Timestamp> {
        self.created
    }
}

impl From<&Namespace> for NamespaceSummary {
    fn from(namespace: &Namespace) -> Self {
        let meta = &namespace.metadata;
        let name = meta.name.clone().unwrap_or_default();
        let status = namespace.status.as_ref().and_then(|s| s.phase.as_deref()).unwrap_or("Active").to_string();
        let created = creation_time(meta.creation_timestamp.as_ref());
        Self { name, status, created }
    }
}

impl From<Namespace> for NamespaceSummary {
    fn from(namespace: Namespace) -> Self {
        Self::from(&namespace)
    }
}
