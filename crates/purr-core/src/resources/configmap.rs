use jiff::Timestamp;
use k8s_openapi::api::core::v1::ConfigMap;

use crate::resource::{creation_time, ResourceSummary};

#[derive(Debug, Clone)]
pub struct ConfigMapSummary {
    pub name: String,
    pub namespace: String,
    pub keys: usize,
    pub created: Option<Timestamp>,
}

impl ResourceSummary for ConfigMapSummary {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        Some(&self.namespace)
    }

    fn status_display(&self) -> String {
        format!("{} keys", self.keys)
    }

    fn created(&self) -> Option<Timestamp> {
        self.created
    }
}

impl From<&ConfigMap> for ConfigMapSummary {
    fn from(configmap: &ConfigMap) -> Self {
        let meta = &configmap.metadata;
        let name = meta.name.clone().unwrap_or_default();
        let namespace = meta.namespace.clone().unwrap_or_else(|| "default".into());
        let keys = configmap.data.as_ref().map(|d| d.len()).unwrap_or(0)
            + configmap.binary_data.as_ref().map(|d| d.len()).unwrap_or(0);
        let created = creation_time(meta.creation_timestamp.as_ref());
        Self { name, namespace, keys, created }
    }
}

impl From<ConfigMap> for ConfigMapSummary {
    fn from(configmap: ConfigMap) -> Self {
        Self::from(&configmap)
    }
}
