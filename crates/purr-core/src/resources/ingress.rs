use jiff::Timestamp;
use k8s_openapi::api::networking::v1::Ingress;

use crate::resource::{creation_time, ResourceSummary};

#[derive(Debug, Clone)]
pub struct IngressSummary {
    pub name: String,
    pub namespace: String,
    pub hosts: Vec<String>,
    pub created: Option<Timestamp>,
}

impl ResourceSummary for IngressSummary {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        Some(&self.namespace)
    }

    fn status_display(&self) -> String {
        self.hosts.join(",")
    }

    fn created(&self) -> Option<Timestamp> {
        self.created
    }
}

impl From<&Ingress> for IngressSummary {
    fn from(ingress: &Ingress) -> Self {
        let meta = &ingress.metadata;
        let name = meta.name.clone().unwrap_or_default();
        let namespace = meta.namespace.clone().unwrap_or_else(|| "default".into());

        let hosts = ingress
            .spec
            .as_ref()
            .and_then(|s| s.rules.as_ref())
            .map(|rules| rules.iter().filter_map(|r| r.host.clone()).collect())
            .unwrap_or_default();

        let created = creation_time(meta.creation_timestamp.as_ref());

        Self { name, namespace, hosts, created }
    }
}

impl From<Ingress> for IngressSummary {
    fn from(ingress: Ingress) -> Self {
        Self::from(&ingress)
    }
}
