use std::collections::HashMap;

use jiff::Timestamp;
use purr_complete::ClusterCache;

use crate::resources::{
    ConfigMapSummary, CronJobSummary, DaemonSetSummary, DeploymentSummary, IngressSummary, JobSummary,
    NamespaceSummary, NodeSummary, PodPhase, PodSummary, SecretSummary, ServiceSummary, StatefulSetSummary,
};

use super::CacheState;

/// Fixture-seeded stand-in for the live cache, used by `--demo` mode and
/// tests. Always ready; background work is a no-op.
pub struct MockCache {
    state: CacheState,
}

impl MockCache {
    pub fn demo() -> Self {
        let now = Timestamp::now();
        let mut state = CacheState::default();

        for name in ["default", "kube-system", "kube-public", "production", "staging", "development"] {
            state.namespaces.push(NamespaceSummary {
                name: name.to_string(),
                status: "Active".to_string(),
                created: Some(now),
            });
        }

        for name in ["node-1", "node-2", "node-3"] {
            state.nodes.push(NodeSummary { name: name.to_string(), ready: true, created: Some(now) });
        }

        state.pods = HashMap::from([
            (
                "default".to_string(),
                vec![
                    demo_pod("nginx-app-7d8f9c-abc12", "default", &["nginx"], &[]),
                    demo_pod("nginx-app-7d8f9c-def34", "default", &["nginx"], &[]),
                    demo_pod("backend-api-6b5c4d-xyz56", "default", &["api", "istio-proxy"], &["init-db"]),
                    demo_pod("frontend-web-8a7f2e-qrs78", "default", &["web"], &[]),
                    demo_pod("redis-cache-5c9d3a-mno90", "default", &["redis"], &[]),
                ],
            ),
            (
                "production".to_string(),
                vec![
                    demo_pod("my-app-prod-1a2b3c-xyz", "production", &["app"], &[]),
                    demo_pod("my-app-prod-1a2b3c-abc", "production", &["app"], &[]),
                    demo_pod("database-primary-4d5e6f", "production", &["postgres"], &["init-schema"]),
                ],
            ),
        ]);

        state.deployments = HashMap::from([
            (
                "default".to_string(),
                vec![
                    demo_deployment("nginx-app", "default", &["nginx"]),
                    demo_deployment("backend-api", "default", &["api", "istio-proxy"]),
                    demo_deployment("frontend-web", "default", &["web"]),
                ],
            ),
            ("production".to_string(), vec![demo_deployment("my-app-prod", "production", &["app"])]),
        ]);

        state.statefulsets = HashMap::from([(
            "default".to_string(),
            vec![StatefulSetSummary {
                name: "redis-cluster".to_string(),
                namespace: "default".to_string(),
                ready: "2/2".to_string(),
                containers: vec!["redis".to_string()],
                init_containers: Vec::new(),
                created: Some(now),
            }],
        )]);

        state.daemonsets = HashMap::from([(
            "kube-system".to_string(),
            vec![
                DaemonSetSummary {
                    name: "kube-proxy".to_string(),
                    namespace: "kube-system".to_string(),
                    ready: "3/3".to_string(),
                    containers: vec!["kube-proxy".to_string()],
                    init_containers: Vec::new(),
                    created: Some(now),
                },
                DaemonSetSummary {
                    name: "fluentd".to_string(),
                    namespace: "kube-system".to_string(),
                    ready: "3/3".to_string(),
                    containers: vec!["fluentd".to_string()],
                    init_containers: Vec::new(),
                    created: Some(now),
                },
            ],
        )]);

        state.services = HashMap::from([(
            "default".to_string(),
            vec![
                demo_service("nginx-service", "default", "ClusterIP"),
                demo_service("backend-api-service", "default", "ClusterIP"),
                demo_service("frontend-web-service", "default", "LoadBalancer"),
            ],
        )]);

        state.configmaps = HashMap::from([(
            "default".to_string(),
            vec![
                ConfigMapSummary { name: "app-config".into(), namespace: "default".into(), keys: 2, created: Some(now) },
                ConfigMapSummary { name: "nginx-config".into(), namespace: "default".into(), keys: 1, created: Some(now) },
            ],
        )]);

        state.secrets = HashMap::from([(
            "default".to_string(),
            vec![
                SecretSummary {
                    name: "db-credentials".into(),
                    namespace: "default".into(),
                    secret_type: "Opaque".into(),
                    keys: 2,
                    created: Some(now),
                },
                SecretSummary {
                    name: "api-keys".into(),
                    namespace: "default".into(),
                    secret_type: "Opaque".into(),
                    keys: 1,
                    created: Some(now),
                },
            ],
        )]);

        state.jobs = HashMap::from([(
            "default".to_string(),
            vec![JobSummary {
                name: "data-migration-job".into(),
                namespace: "default".into(),
                succeeded: 1,
                completions: 1,
                created: Some(now),
            }],
        )]);

        state.cronjobs = HashMap::from([(
            "default".to_string(),
            vec![
                CronJobSummary {
                    name: "backup-cronjob".into(),
                    namespace: "default".into(),
                    schedule: "0 2 * * *".into(),
                    suspend: false,
                    created: Some(now),
                },
                CronJobSummary {
                    name: "cleanup-cronjob".into(),
                    namespace: "default".into(),
                    schedule: "0 */6 * * *".into(),
                    suspend: false,
                    created: Some(now),
                },
            ],
        )]);

        state.ingresses = HashMap::from([(
            "default".to_string(),
            vec![IngressSummary {
                name: "main-ingress".into(),
                namespace: "default".into(),
                hosts: vec!["example.com".into(), "api.example.com".into()],
                created: Some(now),
            }],
        )]);

        state.last_refresh = Some(std::time::Instant::now());

        Self { state }
    }

    pub fn start(&self) {}

    pub fn stop(&self) {}

    pub fn ready(&self) -> bool {
        true
    }
}

impl ClusterCache for MockCache {
    fn namespaces(&self) -> Vec<String> {
        self.state.namespace_names()
    }

    fn resource_names(&self, kind: &str, namespace: &str) -> Vec<String> {
        self.state.resource_names(kind, namespace)
    }

    fn containers(&self, namespace: &str, resource_kind: &str, resource_name: &str) -> Vec<String> {
        self.state.containers(namespace, resource_kind, resource_name)
    }
}

fn demo_pod(name: &str, namespace: &str, containers: &[&str], init_containers: &[&str]) -> PodSummary {
    PodSummary {
        name: name.to_string(),
        namespace: namespace.to_string(),
        phase: PodPhase::Running,
        ready: format!("{}/{}", containers.len(), containers.len()),
        restarts: 0,
        containers: containers.iter().map(|c| c.to_string()).collect(),
        init_containers: init_containers.iter().map(|c| c.to_string()).collect(),
        created: Some(Timestamp::now()),
    }
}

fn demo_deployment(name: &str, namespace: &str, containers: &[&str]) -> DeploymentSummary {
    DeploymentSummary {
        name: name.to_string(),
        namespace: namespace.to_string(),
        ready: "2/2".to_string(),
        containers: containers.iter().map(|c| c.to_string()).collect(),
        init_containers: Vec::new(),
        created: Some(Timestamp::now()),
    }
}

fn demo_service(name: &str, namespace: &str, service_type: &str) -> ServiceSummary {
    ServiceSummary {
        name: name.to_string(),
        namespace: namespace.to_string(),
        service_type: service_type.to_string(),
        created: Some(Timestamp::now()),
    }
}
