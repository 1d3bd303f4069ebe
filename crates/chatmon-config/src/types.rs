use chatmon_rule_engine::GroupConfig;
use serde::{Deserialize, Serialize};

/// One word group as written in its TOML file
///
/// ```toml
/// words = ["badw[0o]rd", "\\bw0rd\\b"]
/// message = "&cPlease mind your language, %player%"
/// prevent_send = true
/// broadcast = false
/// run_commands = ["warn %player% said %word%"]
/// include_commands = ["tell", "msg"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GroupFile {
    /// Regex patterns, matched against lowercased text
    pub words: Vec<String>,

    /// Response template
    pub message: String,

    /// Cancel the original message or command on match
    pub prevent_send: bool,

    /// Send the response to everyone
    pub broadcast: bool,

    /// Commands to run on match
    pub run_commands: Vec<String>,

    /// Commands whose text is also checked
    pub include_commands: Vec<String>,
}

impl GroupFile {
    /// Convert to the engine's view, dropping blank words and commands
    pub fn into_group_config(self) -> GroupConfig {
        let words = self
            .words
            .into_iter()
            .filter(|word| !word.trim().is_empty());
        let include_commands = self
            .include_commands
            .into_iter()
            .map(|command| command.trim().to_string())
            .filter(|command| !command.is_empty());

        GroupConfig::new(words)
            .with_message(self.message)
            .with_prevent_send(self.prevent_send)
            .with_broadcast(self.broadcast)
            .with_run_commands(self.run_commands)
            .with_include_commands(include_commands)
    }
}
