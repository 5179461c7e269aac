use jiff::Timestamp;
use k8s_openapi::api::core::v1::Service;

use crate::resource::{creation_time, ResourceSummary};

#[derive(Debug, Clone)]
pub struct ServiceSummary {
    pub name: String,
    pub namespace: String,
    pub service_type: String,
    pub created: Option<Timestamp>,
}

impl ResourceSummary for ServiceSummary {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        Some(&self.namespace)
    }

    fn status_display(&self) -> String {
        self.service_type.clone()
    }

    fn created(&self) -> Option<Timestamp> {
        self.created
    }
}

impl From<&Service> for ServiceSummary {
    fn from(service: &Service) -> Self {
        let meta = &service.metadata;
        let name = meta.name.clone().unwrap_or_default();
        let namespace = meta.namespace.clone().unwrap_or_else(|| "default".into());
        let service_type =
            service.spec.as_ref().and_then(|s| s.type_.clone()).unwrap_or_else(|| "ClusterIP".into());
        let created = creation_time(meta.creation_timestamp.as_ref());
        Self { name, namespace, service_type, created }
    }
}

impl From<Service> for ServiceSummary {
    fn from(service: Service) -> Self {
        Self::from(&service)
    }
}
