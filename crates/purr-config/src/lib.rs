use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    #[serde(alias = "default-namespace")]
    pub default_namespace: String,
    #[serde(alias = "history-size")]
    pub history_size: usize,
    #[serde(alias = "confirm-destructive")]
    pub confirm_destructive: bool,
    /// Location of the grammar document, relative to the working
    /// directory unless absolute.
    #[serde(alias = "commands-path")]
    pub commands_path: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_namespace: "default".into(),
            history_size: 1000,
            confirm_destructive: true,
            commands_path: "kubectl_commands.json".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    #[serde(alias = "show-help")]
    pub show_help: bool,
    #[serde(alias = "compact-mode")]
    pub compact_mode: bool,
    #[serde(alias = "suggestion-limit")]
    pub suggestion_limit: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { show_help: true, compact_mode: false, suggestion_limit: 20 }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

pub const DEFAULT_CONFIG: &str = include_str!("defaults.toml");

impl AppConfig {
    /// Defaults merged with `~/.purr/config.toml` when present. A broken
    /// user config is reported and otherwise ignored.
    pub fn load() -> Self {
        let mut config = Self::default();

        let path = Self::default_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                    Ok(user) => config = user,
                    Err(e) => eprintln!("Warning: invalid config at {}: {e}", path.display()),
                },
                Err(e) => eprintln!("Warning: could not read {}: {e}", path.display()),
            }
        }

        config
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// `~/.purr` — shared with the history file.
    pub fn data_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".purr")
    }

    pub fn default_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    pub fn history_path() -> PathBuf {
        Self::data_dir().join("history.json")
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn init_default() -> anyhow::Result<PathBuf> {
        let path = Self::default_path();
        if path.exists() {
            anyhow::bail!("Config already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, DEFAULT_CONFIG)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.general.default_namespace, "default");
        assert_eq!(config.general.history_size, 1000);
        assert!(config.general.confirm_destructive);
        assert_eq!(config.ui.suggestion_limit, 20);
    }

    #[test]
    fn embedded_defaults_match_struct_defaults() {
        let embedded: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(embedded.general.default_namespace, AppConfig::default().general.default_namespace);
        assert_eq!(embedded.general.history_size, AppConfig::default().general.history_size);
        assert_eq!(embedded.ui.suggestion_limit, AppConfig::default().ui.suggestion_limit);
    }

    #[test]
    fn kebab_case_aliases_accepted() {
        let config: AppConfig = toml::from_str(
            "[general]\ndefault-namespace = \"staging\"\nconfirm-destructive = false\n",
        )
        .unwrap();
        assert_eq!(config.general.default_namespace, "staging");
        assert!(!config.general.confirm_destructive);
        // Unset sections fall back to defaults.
        assert_eq!(config.ui.suggestion_limit, 20);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nsuggestion-limit = 5\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.ui.suggestion_limit, 5);
        assert_eq!(config.general.history_size, 1000);
    }

    #[test]
    fn save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.general.default_namespace = "kube-system".into();
        config.save(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.general.default_namespace, "kube-system");
    }

    #[test]
    fn history_path_lives_under_data_dir() {
        assert!(AppConfig::history_path().ends_with(".purr/history.json"));
    }
}
