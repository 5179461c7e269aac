//! Shared resource-kind vocabulary: the alias table used by both the parser
//! and the cluster cache, the well-known type list, and per-command
//! narrowing.

/// Short and singular forms mapped to canonical plural names.
const ALIASES: &[(&str, &str)] = &[
    ("po", "pods"),
    ("pod", "pods"),
    ("svc", "services"),
    ("service", "services"),
    ("deploy", "deployments"),
    ("deployment", "deployments"),
    ("rs", "replicasets"),
    ("replicaset", "replicasets"),
    ("rc", "replicationcontrollers"),
    ("replicationcontroller", "replicationcontrollers"),
    ("ds", "daemonsets"),
    ("daemonset", "daemonsets"),
    ("sts", "statefulsets"),
    ("statefulset", "statefulsets"),
    ("cm", "configmaps"),
    ("configmap", "configmaps"),
    ("secret", "secrets"),
    ("ing", "ingresses"),
    ("ingress", "ingresses"),
    ("ns", "namespaces"),
    ("namespace", "namespaces"),
    ("no", "nodes"),
    ("node", "nodes"),
    ("pv", "persistentvolumes"),
    ("persistentvolume", "persistentvolumes"),
    ("pvc", "persistentvolumeclaims"),
    ("persistentvolumeclaim", "persistentvolumeclaims"),
    ("sa", "serviceaccounts"),
    ("serviceaccount", "serviceaccounts"),
    ("cj", "cronjobs"),
    ("cronjob", "cronjobs"),
    ("job", "jobs"),
];

/// Well-known plural names and short aliases offered as resource-type
/// completions.
pub const RESOURCE_TYPES: &[&str] = &[
    "pods",
    "po",
    "deployments",
    "deploy",
    "services",
    "svc",
    "replicasets",
    "rs",
    "statefulsets",
    "sts",
    "daemonsets",
    "ds",
    "jobs",
    "cronjobs",
    "cj",
    "configmaps",
    "cm",
    "secrets",
    "persistentvolumeclaims",
    "pvc",
    "persistentvolumes",
    "pv",
    "ingresses",
    "ing",
    "nodes",
    "no",
    "namespaces",
    "ns",
    "serviceaccounts",
    "sa",
];

/// Resolves any known alias or singular form to its canonical plural.
/// Unknown input passes through unchanged.
pub fn canonical(kind: &str) -> &str {
    ALIASES.iter().find(|(alias, _)| *alias == kind).map(|(_, full)| *full).unwrap_or(kind)
}

/// Narrower type list for commands that only operate on a subset of kinds.
/// Empty means "no narrowing".
pub fn types_for_command(path: &[String]) -> &'static [&'static str] {
    let key = path.join(" ");
    match key.as_str() {
        "rollout restart" | "rollout status" | "rollout history" | "rollout pause" | "rollout resume"
        | "rollout undo" => &[
            "deployment",
            "deployments",
            "deploy",
            "daemonset",
            "daemonsets",
            "ds",
            "statefulset",
            "statefulsets",
            "sts",
        ],
        "logs" | "exec" => &["pod", "pods", "po"],
        "top" | "top pods" | "top nodes" => &["node", "nodes", "no", "pod", "pods", "po"],
        _ => &[],
    }
}

/// Kinds that are not namespaced; name lookups ignore the namespace for
/// these.
pub fn is_cluster_scoped(kind: &str) -> bool {
    matches!(canonical(kind), "nodes" | "namespaces" | "persistentvolumes")
}
