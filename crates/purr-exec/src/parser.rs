use purr_complete::kinds;

use crate::command::{CompletionKind, CompletionNeeded, ParsedCommand};

/// Flags that never take a value.
const BOOL_FLAGS: &[&str] = &[
    "all-namespaces",
    "watch",
    "force",
    "dry-run",
    "follow",
    "help",
    "no-headers",
    "show-labels",
    "wide",
    "A",
];

/// Two-character short forms and their long expansions.
const SHORT_FLAGS: &[(&str, &str)] = &[
    ("n", "namespace"),
    ("f", "filename"),
    ("o", "output"),
    ("l", "selector"),
    ("c", "container"),
    ("A", "all-namespaces"),
    ("w", "watch"),
    ("h", "help"),
];

/// Verbs that need at least a resource.
const VERBS_NEEDING_RESOURCE: &[&str] = &["get", "describe", "delete", "edit", "logs", "exec"];

/// Verbs that need a resource name too.
const VERBS_NEEDING_RESOURCE_NAME: &[&str] = &["describe", "delete", "edit", "logs", "exec"];

/// Single-pass parse of a command line. Tokenisation is whitespace-only;
/// quoting is not interpreted and quotes pass through to the child as-is.
pub fn parse(command: &str) -> ParsedCommand {
    let trimmed = command.trim();

    if trimmed.starts_with('!') {
        // Not an error shown to the user, a routing signal for the
        // executor.
        return ParsedCommand::invalid(command, "shell command");
    }

    let stripped = trimmed.strip_prefix("kubectl ").unwrap_or(trimmed).trim();
    if stripped.is_empty() {
        return ParsedCommand::invalid(command, "empty command");
    }

    let tokens: Vec<&str> = stripped.split_whitespace().collect();
    let mut parsed = ParsedCommand::new(command);
    parsed.verb = tokens[0].to_string();

    let mut position = 1;
    while position < tokens.len() {
        let token = tokens[position];

        if let Some(name) = token.strip_prefix("--") {
            position = consume_flag(&mut parsed, name, &tokens, position);
        } else if token.len() == 2 && token.starts_with('-') {
            // Expand first, then the boolean set decides.
            let name = expand_short_flag(&token[1..]);
            position = consume_flag(&mut parsed, name, &tokens, position);
        } else {
            if parsed.resource.is_empty() {
                parsed.resource = kinds::canonical(token).to_string();
            } else if parsed.resource_name.is_empty() {
                parsed.resource_name = token.to_string();
            }
            position += 1;
        }
    }

    check_completions(&mut parsed);
    parsed
}

/// Records a long-form flag at `position` and returns the next position.
fn consume_flag(parsed: &mut ParsedCommand, name: &str, tokens: &[&str], position: usize) -> usize {
    if BOOL_FLAGS.contains(&name) {
        parsed.bool_flags.insert(name.to_string());
        return position + 1;
    }

    match tokens.get(position + 1) {
        Some(value) if !value.starts_with('-') => {
            parsed.flags.insert(name.to_string(), value.to_string());
            match name {
                "namespace" => parsed.namespace = value.to_string(),
                "filename" => parsed.files.push(value.to_string()),
                _ => {}
            }
            position + 2
        }
        _ => {
            parsed.needs_input.push(CompletionNeeded {
                kind: completion_kind_for(name),
                flag: Some(name.to_string()),
                required: is_required_flag(&parsed.verb, name),
            });
            position + 1
        }
    }
}

fn expand_short_flag(short: &str) -> &str {
    SHORT_FLAGS.iter().find(|(s, _)| *s == short).map(|(_, long)| *long).unwrap_or(short)
}

fn completion_kind_for(flag: &str) -> CompletionKind {
    match flag {
        "filename" => CompletionKind::File,
        "output" => CompletionKind::OutputFormat,
        "container" => CompletionKind::Container,
        "context" => CompletionKind::Context,
        _ => CompletionKind::Namespace,
    }
}

fn is_required_flag(verb: &str, flag: &str) -> bool {
    verb == "apply" && flag == "filename"
}

fn check_completions(parsed: &mut ParsedCommand) {
    if VERBS_NEEDING_RESOURCE.contains(&parsed.verb.as_str()) && parsed.resource.is_empty() {
        parsed.needs_input.push(CompletionNeeded {
            kind: CompletionKind::ResourceName,
            flag: None,
            required: true,
        });
        parsed.is_complete = false;
        return;
    }

    if VERBS_NEEDING_RESOURCE_NAME.contains(&parsed.verb.as_str())
        && parsed.resource_name.is_empty()
        && !parsed.resource.is_empty()
    {
        parsed.needs_input.push(CompletionNeeded {
            kind: CompletionKind::ResourceName,
            flag: None,
            required: true,
        });
        parsed.is_complete = false;
        return;
    }

    parsed.is_complete = !parsed.needs_input.iter().any(|need| need.required);
}
