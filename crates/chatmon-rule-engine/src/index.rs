//! Pattern → group and command → patterns lookups
//!
//! A [`RuleIndex`] is collected from a [`GroupRegistry`] in one pass and never
//! modified afterwards. Reloading builds a new index.

use crate::group::{GroupConfig, GroupRegistry};
use std::collections::HashMap;
use tracing::warn;

/// Derived lookups over every loaded group
///
/// Patterns keep group declaration order, then declaration order within the
/// group. That order decides which rule wins when several match the same text.
#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
    patterns: Vec<String>,
    pattern_to_group: HashMap<String, String>,
    command_to_patterns: HashMap<String, Vec<String>>,
}

impl RuleIndex {
    /// An index with no patterns
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every group the registry enumerates
    ///
    /// A group whose configuration cannot be fetched is logged and left out;
    /// it never aborts the rest of the build.
    pub fn collect(registry: &dyn GroupRegistry) -> Self {
        let mut index = Self::new();

        for name in registry.group_names() {
            match registry.group(&name) {
                Ok(config) => index.add_group(&name, &config),
                Err(e) => {
                    warn!(
                        group = %e.group,
                        file = ?e.file,
                        "Word group skipped. {}",
                        e.message
                    );
                }
            }
        }

        index
    }

    fn add_group(&mut self, name: &str, config: &GroupConfig) {
        let commands: Vec<&String> = config
            .include_commands
            .iter()
            .filter(|command| !command.trim().is_empty())
            .collect();

        for pattern in &config.words {
            match self.pattern_to_group.insert(pattern.clone(), name.to_string()) {
                None => self.patterns.push(pattern.clone()),
                Some(previous) if previous != name => {
                    warn!(
                        pattern = %pattern,
                        previous = %previous,
                        group = %name,
                        "Pattern declared by more than one group, last loaded group wins"
                    );
                    self.withdraw_from_commands(pattern);
                }
                Some(_) => {}
            }

            for command in &commands {
                let patterns = self
                    .command_to_patterns
                    .entry((*command).clone())
                    .or_default();
                if !patterns.contains(pattern) {
                    patterns.push(pattern.clone());
                }
            }
        }
    }

    /// Drop a pattern from every command list, along with lists left empty
    fn withdraw_from_commands(&mut self, pattern: &str) {
        for patterns in self.command_to_patterns.values_mut() {
            patterns.retain(|p| p != pattern);
        }
        self.command_to_patterns
            .retain(|_, patterns| !patterns.is_empty());
    }

    /// Name of the group owning `pattern`
    pub fn group_for(&self, pattern: &str) -> Option<&str> {
        self.pattern_to_group.get(pattern).map(String::as_str)
    }

    /// Every pattern, in evaluation order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Patterns to check for a command; empty when nothing monitors it
    pub fn patterns_for_command(&self, command: &str) -> &[String] {
        self.command_to_patterns
            .get(command)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of commands that have at least one monitored pattern
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.command_to_patterns.keys().map(String::as_str)
    }

    pub fn has_command(&self, command: &str) -> bool {
        self.command_to_patterns.contains_key(command)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
