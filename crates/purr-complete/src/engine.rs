use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::ClusterCache;
use crate::kinds;
use crate::registry::{CommandRuntime, Registry};
use crate::spec::{FlagDescriptor, TokenDescriptor, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Command,
    Flag,
    FlagValue,
    ResourceType,
    ResourceName,
    Namespace,
    Container,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub value: String,
    pub kind: SuggestionKind,
    pub description: String,
    pub score: i64,
}

#[derive(Debug, Clone, Default)]
pub struct CompletionContext {
    pub current_namespace: String,
}

/// Context-sensitive suggester over the command registry and the cluster
/// cache. Stateless: the same line, cursor and context always produce the
/// same output for an unchanged registry and cache snapshot.
pub struct Completer {
    registry: Arc<Registry>,
    cache: Arc<dyn ClusterCache>,
}

impl Completer {
    pub fn new(registry: Arc<Registry>, cache: Arc<dyn ClusterCache>) -> Self {
        Self { registry, cache }
    }

    /// Main entry: the full line and the cursor position (byte offset).
    /// Prefix filtering of the current word is left to the caller.
    pub fn complete(&self, line: &str, cursor: usize, ctx: &CompletionContext) -> Vec<Suggestion> {
        let mut cursor = cursor.min(line.len());
        while cursor > 0 && !line.is_char_boundary(cursor) {
            cursor -= 1;
        }
        let segment = &line[..cursor];
        let trailing_space = segment.chars().next_back().is_some_and(|c| c == ' ' || c == '\t');

        let mut tokens: Vec<&str> = segment.split_whitespace().collect();
        if tokens.first() == Some(&"kubectl") {
            tokens.remove(0);
        }

        if tokens.is_empty() {
            return self.suggest_top_level("");
        }

        let Some((command, consumed)) = self.registry.match_command(&tokens) else {
            // Mid-path: "rollout", "rollout re", ...
            let subcommands = self.suggest_subcommands(&tokens);
            if !subcommands.is_empty() {
                return subcommands;
            }
            return self.suggest_top_level(tokens[0]);
        };

        // A fully matched path may still extend into a longer one.
        if !trailing_space && consumed == tokens.len() {
            let subcommands = self.suggest_subcommands(&tokens);
            if !subcommands.is_empty() {
                return subcommands;
            }
        }

        let args = &tokens[consumed..];

        // Mid-token flag value: "get pods -n d". The partial value is
        // dropped so the flag can be identified; filtering on it is the
        // caller's job.
        if !trailing_space && args.len() >= 2 {
            let penultimate = args[args.len() - 2];
            let last = args[args.len() - 1];
            if is_flag_token(penultimate) && !is_flag_token(last) {
                return self.suggest_after_flag(command, ctx, &args[..args.len() - 1], true);
            }
        }

        // Just-opened flag value: "get pods -n ".
        if trailing_space && args.last().is_some_and(|a| is_flag_token(a)) {
            return self.suggest_after_flag(command, ctx, args, trailing_space);
        }

        self.suggest_positionals_and_flags(command, ctx, args, trailing_space)
    }

    /// Like [`Completer::complete`] but capped at `max` suggestions.
    pub fn complete_top(&self, line: &str, cursor: usize, ctx: &CompletionContext, max: usize) -> Vec<Suggestion> {
        let mut out = self.complete(line, cursor, ctx);
        out.truncate(max);
        out
    }

    fn suggest_top_level(&self, prefix: &str) -> Vec<Suggestion> {
        let mut out: Vec<Suggestion> = self
            .registry
            .top_level_commands()
            .into_iter()
            .filter_map(|name| {
                score_prefix(&name, prefix).map(|score| Suggestion {
                    value: name,
                    kind: SuggestionKind::Command,
                    description: String::new(),
                    score,
                })
            })
            .collect();
        sort_suggestions(&mut out);
        out
    }

    /// Suggests the next path token of any command extending `tokens`:
    /// exact match on every prior position, exact or partial match on the
    /// last. An exact last token offers the following path token; a
    /// partial one offers its completions.
    fn suggest_subcommands(&self, tokens: &[&str]) -> Vec<Suggestion> {
        let last_idx = tokens.len() - 1;
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for command in self.registry.iter() {
            let path = &command.spec.path;
            if path.len() < tokens.len() {
                continue;
            }
            if !path[..last_idx].iter().zip(&tokens[..last_idx]).all(|(p, t)| p.as_str() == *t) {
                continue;
            }

            let path_token = &path[last_idx];
            let last = tokens[last_idx];
            if path_token == last {
                if let Some(next) = path.get(tokens.len()) {
                    if seen.insert(next.clone()) {
                        out.push(Suggestion {
                            value: next.clone(),
                            kind: SuggestionKind::Command,
                            description: String::new(),
                            score: 50,
                        });
                    }
                }
            } else if let Some(score) = score_prefix(path_token, last) {
                if seen.insert(path_token.clone()) {
                    out.push(Suggestion {
                        value: path_token.clone(),
                        kind: SuggestionKind::Command,
                        description: String::new(),
                        score,
                    });
                }
            }
        }

        sort_suggestions(&mut out);
        out
    }

    fn suggest_after_flag(
        &self,
        command: &CommandRuntime,
        ctx: &CompletionContext,
        args: &[&str],
        trailing_space: bool,
    ) -> Vec<Suggestion> {
        let Some(flag_token) = args.last() else {
            return Vec::new();
        };
        let Some(flag) = command.flag(flag_token) else {
            return self.suggest_positionals_and_flags(command, ctx, args, trailing_space);
        };
        let Some(after) = flag.after.as_ref() else {
            // Flag takes no value; back to the general case.
            return self.suggest_positionals_and_flags(command, ctx, args, trailing_space);
        };

        match after.kind {
            TokenKind::Namespace => self.suggest_namespaces(ctx),
            TokenKind::Output => suggest_enum_values(&after.allowed, "Output format"),
            TokenKind::Selector => Vec::new(),
            TokenKind::ContainerName => {
                let (kind, name) = infer_resource_target(command, args);
                self.suggest_containers(&effective_namespace(args, ctx), &kind, &name)
            }
            TokenKind::ResourceType => self.suggest_resource_types(command, after),
            TokenKind::ResourceName | TokenKind::ResourceNameOrSelector => {
                let kind = infer_resource_kind(command, args);
                self.suggest_resource_names(&kind, &effective_namespace(args, ctx))
            }
            TokenKind::Duration | TokenKind::Other | TokenKind::Literal => {
                if after.allowed.is_empty() {
                    Vec::new()
                } else {
                    suggest_enum_values(&after.allowed, &after.role)
                }
            }
        }
    }

    fn suggest_positionals_and_flags(
        &self,
        command: &CommandRuntime,
        ctx: &CompletionContext,
        args: &[&str],
        trailing_space: bool,
    ) -> Vec<Suggestion> {
        let spec = &command.spec;
        let used = used_flags(command, args);
        let satisfied = satisfied_positionals(command, args, trailing_space);

        let mut out = Vec::new();

        if satisfied < spec.positionals.len() {
            out.extend(self.suggest_for_positional(command, ctx, &spec.positionals[satisfied], args));
        } else if satisfied > 0 {
            // Every slot is filled. When the command opened with a resource
            // slot, offer names of that resource next: this is what makes
            // "rollout restart deployment <TAB>" list deployment names.
            if let Some(first) = spec.positionals.first() {
                if matches!(first.kind, TokenKind::ResourceType | TokenKind::ResourceName) {
                    if let Some(resource) = non_flag_args(command, args).first() {
                        let namespace = effective_namespace(args, ctx);
                        out.extend(self.suggest_resource_names(resource, &namespace));
                    }
                }
            }
        }

        for (primary, flag) in &spec.flags {
            if used.contains(primary.as_str()) {
                continue;
            }
            out.push(Suggestion {
                value: flag.primary.clone(),
                kind: SuggestionKind::Flag,
                description: flag.description.clone(),
                score: score_flag(flag),
            });
        }

        sort_suggestions(&mut out);
        out
    }

    fn suggest_for_positional(
        &self,
        command: &CommandRuntime,
        ctx: &CompletionContext,
        descriptor: &TokenDescriptor,
        args: &[&str],
    ) -> Vec<Suggestion> {
        match descriptor.kind {
            TokenKind::ResourceType => self.suggest_resource_types(command, descriptor),
            TokenKind::ResourceName | TokenKind::ResourceNameOrSelector => {
                let kind = infer_resource_kind(command, args);
                if kind.is_empty() && args.is_empty() {
                    // Bare "logs", "describe", ...: offer types rather than
                    // nothing.
                    return self.suggest_resource_types(command, descriptor);
                }
                self.suggest_resource_names(&kind, &effective_namespace(args, ctx))
            }
            TokenKind::Namespace => self.suggest_namespaces(ctx),
            TokenKind::ContainerName => {
                let (kind, name) = infer_resource_target(command, args);
                self.suggest_containers(&effective_namespace(args, ctx), &kind, &name)
            }
            TokenKind::Output => suggest_enum_values(&descriptor.allowed, "Output format"),
            _ => Vec::new(),
        }
    }

    fn suggest_namespaces(&self, ctx: &CompletionContext) -> Vec<Suggestion> {
        let mut out: Vec<Suggestion> = self
            .cache
            .namespaces()
            .into_iter()
            .map(|namespace| {
                let mut score = 50;
                if !ctx.current_namespace.is_empty() && namespace == ctx.current_namespace {
                    score += 10;
                }
                Suggestion {
                    value: namespace,
                    kind: SuggestionKind::Namespace,
                    description: "Namespace".to_string(),
                    score,
                }
            })
            .collect();
        sort_suggestions(&mut out);
        out
    }

    fn suggest_resource_types(&self, command: &CommandRuntime, descriptor: &TokenDescriptor) -> Vec<Suggestion> {
        let narrowed = self.cache.resource_types_for_command(&command.spec.path);
        let from_cache = if narrowed.is_empty() { self.cache.resource_types() } else { narrowed };

        let types = if descriptor.allowed.is_empty() {
            from_cache
        } else {
            let intersection: Vec<String> =
                from_cache.into_iter().filter(|t| descriptor.allowed.contains(t)).collect();
            if intersection.is_empty() {
                descriptor.allowed.clone()
            } else {
                intersection
            }
        };

        let mut out: Vec<Suggestion> = types
            .into_iter()
            .map(|value| Suggestion {
                value,
                kind: SuggestionKind::ResourceType,
                description: "Resource type".to_string(),
                score: 55,
            })
            .collect();
        sort_suggestions(&mut out);
        out
    }

    fn suggest_resource_names(&self, kind: &str, namespace: &str) -> Vec<Suggestion> {
        if kind.is_empty() {
            return Vec::new();
        }
        let description = if kinds::is_cluster_scoped(kind) {
            kind.to_string()
        } else {
            format!("{kind} in {namespace}")
        };
        let mut out: Vec<Suggestion> = self
            .cache
            .resource_names(kind, namespace)
            .into_iter()
            .map(|value| Suggestion {
                value,
                kind: SuggestionKind::ResourceName,
                description: description.clone(),
                score: 50,
            })
            .collect();
        sort_suggestions(&mut out);
        out
    }

    fn suggest_containers(&self, namespace: &str, kind: &str, name: &str) -> Vec<Suggestion> {
        let mut out: Vec<Suggestion> = self
            .cache
            .containers(namespace, kind, name)
            .into_iter()
            .map(|value| Suggestion {
                value,
                kind: SuggestionKind::Container,
                description: "Container".to_string(),
                score: 45,
            })
            .collect();
        sort_suggestions(&mut out);
        out
    }
}

fn is_flag_token(token: &str) -> bool {
    token.starts_with('-')
}

/// Strict prefixes dominate, substring matches trail, no match filters
/// out. The empty prefix matches everything at zero.
fn score_prefix(value: &str, prefix: &str) -> Option<i64> {
    if prefix.is_empty() {
        Some(0)
    } else if value.starts_with(prefix) {
        Some(prefix.len() as i64 + 10)
    } else if value.contains(prefix) {
        Some(prefix.len() as i64)
    } else {
        None
    }
}

/// Namespace and selector flags come early, required flags first, and
/// shorter primaries get a slight boost.
fn score_flag(flag: &FlagDescriptor) -> i64 {
    let mut score = 10;
    if flag.required {
        score += 50;
    }
    score += match flag.role.as_str() {
        "namespace-scope" => 40,
        "label-selector" | "field-selector" => 30,
        "output-format" => 20,
        "container-selector" => 18,
        _ => 0,
    };
    score + (5 - flag.primary.len() as i64)
}

fn suggest_enum_values(values: &[String], description: &str) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = values
        .iter()
        .map(|value| Suggestion {
            value: value.clone(),
            kind: SuggestionKind::FlagValue,
            description: description.to_string(),
            score: 40,
        })
        .collect();
    sort_suggestions(&mut out);
    out
}

fn sort_suggestions(items: &mut [Suggestion]) {
    items.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.value.cmp(&b.value)));
}

/// The non-flag arguments, with each known value-taking flag's value
/// skipped.
fn non_flag_args<'a>(command: &CommandRuntime, args: &[&'a str]) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i];
        if is_flag_token(arg) {
            let takes_value = command.flag(arg).is_some_and(|f| f.after.is_some());
            if takes_value && i + 1 < args.len() && !is_flag_token(args[i + 1]) {
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }
        out.push(arg);
        i += 1;
    }
    out
}

/// TYPE/NAME splits win; otherwise the first positional names the kind
/// when the command opens with a resource-type slot.
fn infer_resource_kind(command: &CommandRuntime, args: &[&str]) -> String {
    let positional = non_flag_args(command, args);
    for arg in positional.iter().rev() {
        if let Some((kind, _)) = arg.split_once('/') {
            return kind.to_string();
        }
    }
    if command.spec.positionals.first().map(|td| td.kind) == Some(TokenKind::ResourceType) {
        if let Some(first) = positional.first() {
            return (*first).to_string();
        }
    }
    String::new()
}

/// Kind and name of the resource the args point at, for container lookup.
fn infer_resource_target(command: &CommandRuntime, args: &[&str]) -> (String, String) {
    let positional = non_flag_args(command, args);
    for arg in positional.iter().rev() {
        if let Some((kind, name)) = arg.split_once('/') {
            return (kind.to_string(), name.to_string());
        }
    }
    match command.spec.positionals.first().map(|td| td.kind) {
        Some(TokenKind::ResourceType) => (
            positional.first().copied().unwrap_or_default().to_string(),
            positional.get(1).copied().unwrap_or_default().to_string(),
        ),
        _ => (String::new(), positional.first().copied().unwrap_or_default().to_string()),
    }
}

/// Namespace in effect: an explicit `-n`/`--namespace` on the line, else
/// the context namespace.
fn effective_namespace(args: &[&str], ctx: &CompletionContext) -> String {
    let mut i = 0;
    while i < args.len() {
        if (args[i] == "-n" || args[i] == "--namespace") && i + 1 < args.len() && !is_flag_token(args[i + 1]) {
            return args[i + 1].to_string();
        }
        i += 1;
    }
    ctx.current_namespace.clone()
}

/// Flags already present by primary, each value-taking flag's value
/// skipped.
fn used_flags<'a>(command: &'a CommandRuntime, args: &[&str]) -> HashSet<&'a str> {
    let mut used = HashSet::new();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i];
        if !is_flag_token(arg) {
            i += 1;
            continue;
        }
        let Some(primary) = command.primary_for(arg) else {
            i += 1;
            continue;
        };
        used.insert(primary);
        let takes_value = command.spec.flags.get(primary).is_some_and(|f| f.after.is_some());
        if takes_value && i + 1 < args.len() && !is_flag_token(args[i + 1]) {
            i += 2;
        } else {
            i += 1;
        }
    }
    used
}

/// Number of filled positional slots. A trailing non-flag token without a
/// trailing space is still being typed and does not count.
fn satisfied_positionals(command: &CommandRuntime, args: &[&str], trailing_space: bool) -> usize {
    let total = command.spec.positionals.len();
    let mut count = 0;
    let mut i = 0;
    while i < args.len() && count < total {
        let arg = args[i];
        if is_flag_token(arg) {
            let takes_value = command.flag(arg).is_some_and(|f| f.after.is_some());
            if takes_value && i + 1 < args.len() && !is_flag_token(args[i + 1]) {
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }
        if i == args.len() - 1 && !trailing_space {
            break;
        }
        count += 1;
        i += 1;
    }
    count
}

#[cfg(test)]
mod tests;
