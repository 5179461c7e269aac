use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// What a positional slot or a flag value accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Literal,
    ResourceType,
    ResourceName,
    ResourceNameOrSelector,
    Namespace,
    Selector,
    ContainerName,
    Output,
    Duration,
    Other,
}

/// Used for positionals and for `after` in flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub kind: TokenKind,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagDescriptor {
    pub primary: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub required: bool,
    /// Value descriptor; `None` for flags that take no value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<TokenDescriptor>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSpec {
    /// e.g. `["get"]`, `["rollout", "restart"]`
    pub path: Vec<String>,
    #[serde(default)]
    pub positionals: Vec<TokenDescriptor>,
    /// Keyed by primary flag form.
    #[serde(default)]
    pub flags: IndexMap<String, FlagDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootSpec {
    pub version: String,
    pub commands: Vec<CommandSpec>,
}

impl RootSpec {
    /// Reads `kubectl_commands.json`.
    pub fn load(path: &Path) -> Result<Self, SpecError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| SpecError::Read { path: path.to_path_buf(), source })?;
        serde_json::from_str(&contents).map_err(|source| SpecError::Parse { path: path.to_path_buf(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_kind_deserializes_kebab_case() {
        let td: TokenDescriptor =
            serde_json::from_str(r#"{"kind": "resource-name-or-selector", "role": "target"}"#).unwrap();
        assert_eq!(td.kind, TokenKind::ResourceNameOrSelector);
        assert_eq!(td.role, "target");
        assert!(!td.required);
        assert!(td.allowed.is_empty());
    }

    #[test]
    fn flag_descriptor_defaults_optional_fields() {
        let flag: FlagDescriptor = serde_json::from_str(r#"{"primary": "--watch"}"#).unwrap();
        assert_eq!(flag.primary, "--watch");
        assert!(flag.aliases.is_empty());
        assert!(flag.after.is_none());
        assert!(!flag.required);
    }

    #[test]
    fn load_missing_file_names_path() {
        let err = RootSpec::load(Path::new("/nonexistent/kubectl_commands.json")).unwrap_err();
        assert!(matches!(err, SpecError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/kubectl_commands.json"));
    }

    #[test]
    fn load_rejects_nonconforming_document() {
        let dir = std::env::temp_dir().join("purr-spec-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        std::fs::write(&path, r#"{"version": 3}"#).unwrap();
        let err = RootSpec::load(&path).unwrap_err();
        assert!(matches!(err, SpecError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }
}
