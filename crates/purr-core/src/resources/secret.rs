use jiff::Timestamp;
use k8s_openapi::api::core::v1::Secret;

use crate::resource::{creation_time, ResourceSummary};

#[derive(Debug, Clone)]
pub struct SecretSummary {
    pub name: String,
    pub namespace: String,
    pub secret_type: String,
    pub keys: usize,
    pub created: Option<Timestamp>,
}

impl ResourceSummary for SecretSummary {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        Some(&self.namespace)
    }

    fn status_display(&self) -> String {
        format!("{} ({} keys)", self.secret_type, self.keys)
    }

    fn created(&self) -> Option<Timestamp> {
        self.created
    }
}

impl From<&Secret> for SecretSummary {
    fn from(secret: &Secret) -> Self {
        let meta = &secret.metadata;
        let name = meta.name.clone().unwrap_or_default();
        let namespace = meta.namespace.clone().unwrap_or_else(|| "default".into());
        let secret_type = secret.type_.clone().unwrap_or_else(|| "Opaque".into());
        let keys = secret.data.as_ref().map(|d| d.len()).unwrap_or(0);
        let created = creation_time(meta.creation_timestamp.as_ref());
        Self { name, namespace, secret_type, keys, created }
    }
}

impl From<Secret> for SecretSummary {
    fn from(secret: Secret) -> Self {
        Self::from(&secret)
    }
}
