use jiff::Timestamp;
use k8s_openapi::api::batch::v1::CronJob;

use crate::resource::{creation_time, ResourceSummary};

#[derive(Debug, Clone)]
pub struct CronJobSummary {
    pub name: String,
    pub namespace: String,
    pub schedule: String,
    pub suspend: bool,
    pub created: Option<Timestamp>,
}

impl ResourceSummary for CronJobSummary {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        Some(&self.namespace)
    }

    fn status_display(&self) -> String {
        if self.suspend {
            "Suspended".into()
        } else {
            self.schedule.clone()
        }
    }

    fn created(&self) -> Option<Timestamp> {
        self.created
    }
}

impl From<&CronJob> for CronJobSummary {
    fn from(cronjob: &CronJob) -> Self {
        let meta = &cronjob.metadata;
        let name = meta.name.clone().unwrap_or_default();
        let namespace = meta.namespace.clone().unwrap_or_else(|| "default".into());
        let schedule = cronjob.spec.as_ref().map(|s| s.schedule.clone()).unwrap_or_default();
        let suspend = cronjob.spec.as_ref().and_then(|s| s.suspend).unwrap_or(false);
        let created = creation_time(meta.creation_timestamp.as_ref());
        Self { name, namespace, schedule, suspend, created }
    }
}

impl From<CronJob> for CronJobSummary {
    fn from(cronjob: CronJob) -> Self {
        Self::from(&cronjob)
    }
}
