//! Host integration: chat lines and command lines in, decisions out
//!
//! The host owns the word manager and the configuration it was loaded from.
//! It is built once at startup and passed to whatever needs it.

use crate::render::{replace_placeholders, strip_colour_codes, RenderContext};
use anyhow::{Context, Result};
use chatmon_config::ConfigManager;
use chatmon_rule_engine::{BadRulePolicy, WordAction, WordManager};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// What kind of line was processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineKind {
    Chat,
    Command { name: String },
}

/// Who receives the rendered response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "to", content = "text", rename_all = "snake_case")]
pub enum Delivery {
    /// Sent to every player
    Broadcast(String),
    /// Sent only to the sender
    Player(String),
}

/// The decision for one line
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub line: String,
    #[serde(flatten)]
    pub kind: LineKind,
    /// Whether the original line goes through
    pub allowed: bool,
    pub action: Option<WordAction>,
    pub response: Option<Delivery>,
    /// Rendered follow-up commands, in order
    pub commands: Vec<String>,
    /// Why evaluation failed, when it did; the line is allowed regardless
    pub error: Option<String>,
}

impl Outcome {
    fn allowed(line: &str, kind: LineKind) -> Self {
        Self {
            line: line.to_string(),
            kind,
            allowed: true,
            action: None,
            response: None,
            commands: Vec::new(),
            error: None,
        }
    }
}

/// Options for building a [`Host`]
#[derive(Debug, Clone)]
pub struct HostOptions {
    pub player: String,
    /// Skip evaluation entirely, as if the sender held the ignore permission
    pub bypass: bool,
    pub policy: BadRulePolicy,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            player: "console".to_string(),
            bypass: false,
            policy: BadRulePolicy::Abort,
        }
    }
}

/// The host side of the rule engine
pub struct Host {
    manager: WordManager,
    config: ConfigManager,
    options: HostOptions,
}

impl Host {
    /// Load word groups from `rules` and start serving them
    pub fn load(rules: &Path, prefix: &str, options: HostOptions) -> Result<Self> {
        info!("Initializing word lists...");
        let config = ConfigManager::load(rules, prefix)
            .with_context(|| format!("Failed to load word groups from {}", rules.display()))?;

        let manager =
            WordManager::from_registry(Arc::new(config.clone())).with_policy(options.policy);
        info!(
            groups = config.group_count(),
            commands = manager.relevant_commands().len(),
            "Chatmon is enabled"
        );

        Ok(Self {
            manager,
            config,
            options,
        })
    }

    pub fn manager(&self) -> &WordManager {
        &self.manager
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    /// Re-read the rules directory and swap in the new word lists
    pub fn reload(&mut self) -> Result<()> {
        let config = self
            .config
            .reload()
            .context("Failed to reload word groups")?;
        self.manager.reload_from(Arc::new(config.clone()));
        self.config = config;
        Ok(())
    }

    /// Decide what happens to a chat line
    pub fn process_chat(&self, text: &str) -> Outcome {
        if self.options.bypass {
            return Outcome::allowed(text, LineKind::Chat);
        }

        match self.manager.evaluate_text(text) {
            Ok(Some(action)) => self.process_response(text, LineKind::Chat, action),
            Ok(None) => Outcome::allowed(text, LineKind::Chat),
            Err(e) => {
                warn!("Could not process words. Action skipped: {}", e);
                Outcome {
                    error: Some(e.to_string()),
                    ..Outcome::allowed(text, LineKind::Chat)
                }
            }
        }
    }

    /// Decide what happens to a command line such as `/tell bob hello`
    pub fn process_command(&self, line: &str) -> Outcome {
        let name = command_name(line).to_string();
        let kind = LineKind::Command { name: name.clone() };

        if self.options.bypass || !self.manager.is_relevant_command(&name) {
            return Outcome::allowed(line, kind);
        }

        match self.manager.evaluate_command(&name, line) {
            Ok(Some(action)) => self.process_response(line, kind, action),
            Ok(None) => Outcome::allowed(line, kind),
            Err(e) => {
                warn!(command = %name, "Could not process words. Action skipped: {}", e);
                Outcome {
                    error: Some(e.to_string()),
                    ..Outcome::allowed(line, kind)
                }
            }
        }
    }

    /// Render the group's response and follow-up commands for a match
    fn process_response(&self, line: &str, kind: LineKind, action: WordAction) -> Outcome {
        let ctx = RenderContext {
            player: &self.options.player,
            original: line,
            action: &action,
        };

        let rendered = strip_colour_codes(&replace_placeholders(action.message(), &ctx));
        let response = if rendered.trim().is_empty() {
            None
        } else if action.broadcast() {
            Some(Delivery::Broadcast(rendered.clone()))
        } else {
            Some(Delivery::Player(rendered.clone()))
        };

        info!(
            player = %self.options.player,
            group = action.group(),
            rule = action.matched_rule(),
            word = action.original_word(),
            original = line,
            response = %rendered,
            "Matched word"
        );

        let commands: Vec<String> = action
            .commands()
            .iter()
            .filter(|cmd| !cmd.trim().is_empty())
            .map(|cmd| replace_placeholders(cmd, &ctx))
            .inspect(|cmd| info!("Invoking command: {}", cmd))
            .collect();

        Outcome {
            line: line.to_string(),
            kind,
            allowed: !action.prevent_send(),
            response,
            commands,
            error: None,
            action: Some(action),
        }
    }
}

/// Command name from a command line: first token without the leading `/`
pub fn command_name(line: &str) -> &str {
    let first = line.split_whitespace().next().unwrap_or_default();
    first.strip_prefix('/').unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_name() {
        assert_eq!(command_name("/tell bob hi"), "tell");
        assert_eq!(command_name("  /me waves"), "me");
        assert_eq!(command_name("msg"), "msg");
        assert_eq!(command_name(""), "");
    }
}
