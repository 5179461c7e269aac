use std::sync::Arc;

use super::*;
use crate::spec::RootSpec;

struct StaticCache;

impl ClusterCache for StaticCache {
    fn namespaces(&self) -> Vec<String> {
        vec!["default".into(), "kube-public".into(), "kube-system".into(), "production".into()]
    }

    fn resource_names(&self, kind: &str, namespace: &str) -> Vec<String> {
        match (kinds::canonical(kind), namespace) {
            ("deployments", "default") => vec!["api".into(), "worker".into()],
            ("deployments", "production") => vec!["payments".into()],
            ("pods", "default") => vec!["web-1".into(), "web-2".into()],
            ("nodes", _) => vec!["node-1".into(), "node-2".into()],
            _ => Vec::new(),
        }
    }

    fn containers(&self, namespace: &str, resource_kind: &str, resource_name: &str) -> Vec<String> {
        match (namespace, kinds::canonical(resource_kind), resource_name) {
            ("default", "pods", "web-1") | ("default", "", "web-1") => {
                vec!["app".into(), "sidecar".into(), "init-db".into()]
            }
            ("default", "deployments", "api") => vec!["app".into()],
            _ => Vec::new(),
        }
    }
}

fn grammar() -> RootSpec {
    serde_json::from_str(
        r#"{
            "version": "1.0",
            "commands": [
                {
                    "path": ["get"],
                    "positionals": [
                        {"kind": "resource-type", "role": "target", "required": true},
                        {"kind": "resource-name-or-selector", "role": "target"}
                    ],
                    "flags": {
                        "--namespace": {"primary": "--namespace", "aliases": ["-n"], "role": "namespace-scope",
                                        "after": {"kind": "namespace", "role": "namespace-scope"},
                                        "description": "Namespace scope"},
                        "--output": {"primary": "--output", "aliases": ["-o"], "role": "output-format",
                                     "after": {"kind": "output", "role": "output-format",
                                               "allowed": ["json", "name", "wide", "yaml"]},
                                     "description": "Output format"},
                        "--selector": {"primary": "--selector", "aliases": ["-l"], "role": "label-selector",
                                       "after": {"kind": "selector", "role": "label-selector"},
                                       "description": "Label selector"},
                        "--watch": {"primary": "--watch", "aliases": ["-w"], "role": "toggle",
                                    "description": "Watch for changes"}
                    }
                },
                {
                    "path": ["logs"],
                    "positionals": [{"kind": "resource-name", "role": "pod", "required": true}],
                    "flags": {
                        "--namespace": {"primary": "--namespace", "aliases": ["-n"], "role": "namespace-scope",
                                        "after": {"kind": "namespace", "role": "namespace-scope"}},
                        "--container": {"primary": "--container", "aliases": ["-c"], "role": "container-selector",
                                        "after": {"kind": "container-name", "role": "container-selector"}}
                    }
                },
                {"path": ["rollout", "restart"],
                 "positionals": [{"kind": "resource-type", "role": "workload", "required": true,
                                  "allowed": ["deployment", "daemonset", "statefulset"]}],
                 "flags": {
                     "--namespace": {"primary": "--namespace", "aliases": ["-n"], "role": "namespace-scope",
                                     "after": {"kind": "namespace", "role": "namespace-scope"}}
                 }},
                {"path": ["rollout", "status"], "positionals": [], "flags": {}},
                {"path": ["rollout", "history"], "positionals": [], "flags": {}},
                {"path": ["rollout", "pause"], "positionals": [], "flags": {}},
                {"path": ["rollout", "resume"], "positionals": [], "flags": {}},
                {"path": ["rollout", "undo"], "positionals": [], "flags": {}}
            ]
        }"#,
    )
    .unwrap()
}

fn completer() -> Completer {
    Completer::new(Arc::new(Registry::build(grammar())), Arc::new(StaticCache))
}

fn ctx() -> CompletionContext {
    CompletionContext { current_namespace: "default".to_string() }
}

fn values(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions.iter().map(|s| s.value.as_str()).collect()
}

#[test]
fn partial_subcommand_path() {
    let c = completer();
    let line = "rollout r";
    let out = c.complete(line, line.len(), &ctx());

    assert_eq!(out.first().map(|s| s.value.as_str()), Some("restart"));
    let vals = values(&out);
    assert!(vals.contains(&"resume"));
    assert!(vals.contains(&"history"));
    assert!(out.iter().all(|s| s.kind == SuggestionKind::Command));
}

#[test]
fn complete_path_without_space_extends_to_subcommands() {
    let c = completer();
    let out = c.complete("rollout", 7, &ctx());
    let vals = values(&out);
    for sub in ["restart", "status", "history", "pause", "resume", "undo"] {
        assert!(vals.contains(&sub), "missing {sub}");
    }
    assert!(out.iter().all(|s| s.score == 50));
}

#[test]
fn namespace_picker_after_flag() {
    let c = completer();
    let line = "kubectl get pods -n ";
    let out = c.complete(line, line.len(), &ctx());

    assert_eq!(out.len(), 4);
    assert!(out.iter().all(|s| s.kind == SuggestionKind::Namespace));
    let default = out.iter().find(|s| s.value == "default").unwrap();
    assert_eq!(default.score, 60);
    assert!(out.iter().filter(|s| s.value != "default").all(|s| s.score == 50));
    assert_eq!(out.first().map(|s| s.value.as_str()), Some("default"));
}

#[test]
fn partial_flag_value_returns_unfiltered_namespaces() {
    let c = completer();
    let line = "get pods -n ku";
    let out = c.complete(line, line.len(), &ctx());

    // The engine ignores the partial value; the caller filters by prefix.
    assert_eq!(out.len(), 4);
    let filtered: Vec<&str> =
        out.iter().filter(|s| s.value.starts_with("ku")).map(|s| s.value.as_str()).collect();
    assert_eq!(filtered, vec!["kube-public", "kube-system"]);
}

#[test]
fn resource_names_after_complete_path() {
    let c = completer();
    let line = "rollout restart deployment ";
    let out = c.complete(line, line.len(), &ctx());

    let names: Vec<&Suggestion> = out.iter().filter(|s| s.kind == SuggestionKind::ResourceName).collect();
    assert_eq!(names.iter().map(|s| s.value.as_str()).collect::<Vec<_>>(), vec!["api", "worker"]);

    let flags: Vec<&Suggestion> = out.iter().filter(|s| s.kind == SuggestionKind::Flag).collect();
    assert!(!flags.is_empty());
    let min_name = names.iter().map(|s| s.score).min().unwrap();
    let max_flag = flags.iter().map(|s| s.score).max().unwrap();
    assert!(min_name > max_flag, "names ({min_name}) must outrank flags ({max_flag})");
}

#[test]
fn resource_names_honor_namespace_flag_on_line() {
    let c = completer();
    let line = "rollout restart deployment -n production ";
    let out = c.complete(line, line.len(), &ctx());
    let names: Vec<&str> =
        out.iter().filter(|s| s.kind == SuggestionKind::ResourceName).map(|s| s.value.as_str()).collect();
    assert_eq!(names, vec!["payments"]);
}

#[test]
fn empty_line_lists_top_level_commands() {
    let c = completer();
    let out = c.complete("", 0, &ctx());
    assert_eq!(values(&out), vec!["get", "logs", "rollout"]);
    assert!(out.iter().all(|s| s.score == 0));
}

#[test]
fn leading_kubectl_is_stripped() {
    let c = completer();
    let with = c.complete("kubectl get pods -n ", 20, &ctx());
    let without = c.complete("get pods -n ", 12, &ctx());
    assert_eq!(with, without);
}

#[test]
fn unknown_first_token_filters_top_level() {
    let c = completer();
    let line = "ge";
    let out = c.complete(line, line.len(), &ctx());
    assert_eq!(out.first().map(|s| s.value.as_str()), Some("get"));
}

#[test]
fn first_positional_suggests_resource_types() {
    let c = completer();
    let line = "get ";
    let out = c.complete(line, line.len(), &ctx());
    let types: Vec<&str> =
        out.iter().filter(|s| s.kind == SuggestionKind::ResourceType).map(|s| s.value.as_str()).collect();
    assert!(types.contains(&"pods"));
    assert!(types.contains(&"deployments"));
    assert!(out.iter().filter(|s| s.kind == SuggestionKind::ResourceType).all(|s| s.score == 55));
}

#[test]
fn allowed_list_narrows_resource_types() {
    let c = completer();
    let line = "rollout restart ";
    let out = c.complete(line, line.len(), &ctx());
    let types: Vec<&str> =
        out.iter().filter(|s| s.kind == SuggestionKind::ResourceType).map(|s| s.value.as_str()).collect();
    assert_eq!(types, vec!["daemonset", "deployment", "statefulset"]);
}

#[test]
fn second_positional_infers_kind_from_first() {
    let c = completer();
    let line = "get deployments ";
    let out = c.complete(line, line.len(), &ctx());
    let names: Vec<&str> =
        out.iter().filter(|s| s.kind == SuggestionKind::ResourceName).map(|s| s.value.as_str()).collect();
    assert_eq!(names, vec!["api", "worker"]);
}

#[test]
fn slash_target_wins_kind_inference() {
    let c = completer();
    let line = "logs deployment/api -c ";
    let out = c.complete(line, line.len(), &ctx());
    let containers: Vec<&str> =
        out.iter().filter(|s| s.kind == SuggestionKind::Container).map(|s| s.value.as_str()).collect();
    assert_eq!(containers, vec!["app"]);
}

#[test]
fn container_flag_uses_pod_from_args() {
    let c = completer();
    let line = "logs web-1 -c ";
    let out = c.complete(line, line.len(), &ctx());
    let containers: Vec<&str> =
        out.iter().filter(|s| s.kind == SuggestionKind::Container).map(|s| s.value.as_str()).collect();
    assert_eq!(containers, vec!["app", "init-db", "sidecar"]);
}

#[test]
fn bare_name_positional_offers_types() {
    let c = completer();
    let line = "logs ";
    let out = c.complete(line, line.len(), &ctx());
    let types: Vec<&str> =
        out.iter().filter(|s| s.kind == SuggestionKind::ResourceType).map(|s| s.value.as_str()).collect();
    assert_eq!(types, vec!["po", "pod", "pods"]);
}

#[test]
fn output_flag_suggests_allowed_values() {
    let c = completer();
    let line = "get pods -o ";
    let out = c.complete(line, line.len(), &ctx());
    assert_eq!(values(&out), vec!["json", "name", "wide", "yaml"]);
    assert!(out.iter().all(|s| s.kind == SuggestionKind::FlagValue && s.score == 40));
}

#[test]
fn selector_flag_value_is_freeform() {
    let c = completer();
    let line = "get pods -l ";
    let out = c.complete(line, line.len(), &ctx());
    assert!(out.is_empty());
}

#[test]
fn used_flags_are_not_suggested_again() {
    let c = completer();
    let line = "get pods -n default ";
    let out = c.complete(line, line.len(), &ctx());
    assert!(!values(&out).contains(&"--namespace"));
    assert!(values(&out).contains(&"--output"));
}

#[test]
fn boolean_flag_does_not_swallow_following_token() {
    let c = completer();
    let line = "get -w pods ";
    let out = c.complete(line, line.len(), &ctx());
    let names: Vec<&str> =
        out.iter().filter(|s| s.kind == SuggestionKind::ResourceName).map(|s| s.value.as_str()).collect();
    assert_eq!(names, vec!["web-1", "web-2"]);
}

#[test]
fn output_is_sorted_by_score_then_value() {
    let c = completer();
    let line = "get pods ";
    let out = c.complete(line, line.len(), &ctx());
    for pair in out.windows(2) {
        assert!(
            pair[0].score > pair[1].score || (pair[0].score == pair[1].score && pair[0].value <= pair[1].value),
            "unsorted: {:?} before {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn completion_is_pure() {
    let c = completer();
    let line = "rollout restart deployment ";
    let first = c.complete(line, line.len(), &ctx());
    let second = c.complete(line, line.len(), &ctx());
    assert_eq!(first, second);
}

#[test]
fn complete_top_caps_output() {
    let c = completer();
    let line = "get ";
    let all = c.complete(line, line.len(), &ctx());
    let capped = c.complete_top(line, line.len(), &ctx(), 5);
    assert_eq!(capped.len(), 5);
    assert_eq!(capped, all[..5].to_vec());
}

#[test]
fn cursor_mid_line_truncates() {
    let c = completer();
    // Cursor right after "-n " with trailing text beyond it.
    let line = "get pods -n  --watch";
    let out = c.complete(line, 12, &ctx());
    assert!(out.iter().all(|s| s.kind == SuggestionKind::Namespace));
}

#[test]
fn cursor_beyond_line_is_clamped() {
    let c = completer();
    let out = c.complete("get ", 999, &ctx());
    assert!(out.iter().any(|s| s.kind == SuggestionKind::ResourceType));
}
