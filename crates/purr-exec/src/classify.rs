/// Verbs that always mutate or remove cluster state.
const DESTRUCTIVE_VERBS: &[&str] = &["delete", "drain", "cordon"];

/// `rollout` sub-verbs that mutate; `status` and `history` only read.
const DESTRUCTIVE_ROLLOUT: &[&str] = &["restart", "undo", "pause"];

/// Whether a line must pass through confirmation before it runs. Shell
/// escapes bypass classification entirely.
pub fn is_destructive(command: &str) -> bool {
    let trimmed = command.trim();
    if trimmed.starts_with('!') {
        return false;
    }

    let stripped = trimmed.strip_prefix("kubectl ").unwrap_or(trimmed);
    let tokens: Vec<&str> = stripped.split_whitespace().collect();
    let Some(verb) = tokens.first() else {
        return false;
    };

    if DESTRUCTIVE_VERBS.contains(verb) {
        return true;
    }
    if *verb == "rollout" && tokens.get(1).is_some_and(|sub| DESTRUCTIVE_ROLLOUT.contains(sub)) {
        return true;
    }

    tokens.iter().any(|t| *t == "--force")
}

/// First non-`kubectl` token, empty for shell escapes.
pub fn command_verb(command: &str) -> &str {
    let trimmed = command.trim();
    if trimmed.starts_with('!') {
        return "";
    }
    let stripped = trimmed.strip_prefix("kubectl ").unwrap_or(trimmed);
    stripped.split_whitespace().next().unwrap_or("")
}
