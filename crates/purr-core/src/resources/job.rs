use jiff::Timestamp;
use k8s_openapi::api::batch::v1::Job;

use crate::resource::{creation_time, ResourceSummary};

#[derive(Debug, Clone)]
pub struct JobSummary {
    pub name: String,
    pub namespace: String,
    pub succeeded: i32,
    pub completions: i32,
    pub created: Option<Timestamp>,
}

impl ResourceSummary for JobSummary {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        Some(&self.namespace)
    }

    fn status_display(&self) -> String {
        format!("{}/{}", self.succeeded, self.completions)
    }

    fn created(&self) -> Option<Timestamp> {
        self.created
    }
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        let meta = &job.metadata;
        let name = meta.name.clone().unwrap_or_default();
        let namespace = meta.namespace.clone().unwrap_or_else(|| "default".into());
        let succeeded = job.status.as_ref().and_then(|s| s.succeeded).unwrap_or(0);
        let completions = job.spec.as_ref().and_then(|s| s.completions).unwrap_or(1);
        let created = creation_time(meta.creation_timestamp.as_ref());
        Self { name, namespace, succeeded, completions, created }
    }
}

impl From<Job> for JobSummary {
    fn from(job: Job) -> Self {
        Self::from(&job)
    }
}
