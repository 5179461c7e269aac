use std::collections::HashMap;

use crate::spec::{CommandSpec, FlagDescriptor, RootSpec};

/// Compiled form of a [`CommandSpec`]: the space-joined key plus a
/// flag-form lookup built once so alias resolution is O(1).
pub struct CommandRuntime {
    pub spec: CommandSpec,
    pub key: String,
    alias_to_primary: HashMap<String, String>,
}

impl CommandRuntime {
    fn new(spec: CommandSpec) -> Self {
        let key = spec.path.join(" ");
        let mut alias_to_primary = HashMap::new();
        for (primary, flag) in &spec.flags {
            alias_to_primary.insert(flag.primary.clone(), primary.clone());
            for alias in &flag.aliases {
                alias_to_primary.insert(alias.clone(), primary.clone());
            }
            // The map key is allowed to differ from the primary form.
            if primary != &flag.primary {
                alias_to_primary.insert(primary.clone(), primary.clone());
            }
        }
        Self { spec, key, alias_to_primary }
    }

    /// Resolves any flag form (primary or alias) to the primary key.
    pub fn primary_for(&self, token: &str) -> Option<&str> {
        self.alias_to_primary.get(token).map(String::as_str)
    }

    /// Descriptor for any flag form, if the command knows it.
    pub fn flag(&self, token: &str) -> Option<&FlagDescriptor> {
        self.primary_for(token).and_then(|primary| self.spec.flags.get(primary))
    }
}

pub struct Registry {
    commands: HashMap<String, CommandRuntime>,
}

impl Registry {
    pub fn build(root: RootSpec) -> Self {
        let commands = root
            .commands
            .into_iter()
            .map(|spec| {
                let runtime = CommandRuntime::new(spec);
                (runtime.key.clone(), runtime)
            })
            .collect();
        Self { commands }
    }

    /// Longest prefix of `tokens` naming a known command, with the number
    /// of tokens it consumed.
    pub fn match_command(&self, tokens: &[&str]) -> Option<(&CommandRuntime, usize)> {
        for take in (1..=tokens.len()).rev() {
            let key = tokens[..take].join(" ");
            if let Some(command) = self.commands.get(&key) {
                return Some((command, take));
            }
        }
        None
    }

    /// Deduplicated, sorted first tokens of every command path.
    pub fn top_level_commands(&self) -> Vec<String> {
        let mut out: Vec<String> =
            self.commands.values().filter_map(|command| command.spec.path.first().cloned()).collect();
        out.sort();
        out.dedup();
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandRuntime> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
