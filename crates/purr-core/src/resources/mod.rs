mod configmap;
mod cronjob;
mod daemonset;
mod deployment;
mod ingress;
mod job;
mod namespace;
mod node;
mod pod;
mod secret;
mod service;
mod statefulset;

pub use configmap::ConfigMapSummary;
pub use cronjob::CronJobSummary;
pub use daemonset::DaemonSetSummary;
pub use deployment::DeploymentSummary;
pub use ingress::IngressSummary;
pub use job::JobSummary;
pub use namespace::NamespaceSummary;
pub use node::NodeSummary;
pub use pod::{PodPhase, PodSummary};
pub use secret::SecretSummary;
pub use service::ServiceSummary;
pub use statefulset::StatefulSetSummary;
