//! The response produced for a matched pattern

use serde::Serialize;

/// What to do about a line of text that matched a rule
///
/// Built fresh for every match and never changed afterwards. Message and
/// commands are copied verbatim from the group; placeholder substitution is up
/// to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordAction {
    matched_rule: String,
    original_word: String,
    group: String,
    message: String,
    prevent_send: bool,
    broadcast: bool,
    commands: Vec<String>,
}

impl WordAction {
    pub(crate) fn new(
        matched_rule: String,
        original_word: String,
        group: String,
        message: String,
        prevent_send: bool,
        broadcast: bool,
        commands: Vec<String>,
    ) -> Self {
        Self {
            matched_rule,
            original_word,
            group,
            message,
            prevent_send,
            broadcast,
            commands,
        }
    }

    /// The pattern that fired
    pub fn matched_rule(&self) -> &str {
        &self.matched_rule
    }

    /// The text the pattern caught, in the sender's casing
    pub fn original_word(&self) -> &str {
        &self.original_word
    }

    /// Name of the group owning the pattern
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Response template
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn prevent_send(&self) -> bool {
        self.prevent_send
    }

    pub fn broadcast(&self) -> bool {
        self.broadcast
    }

    /// Follow-up command templates, in configured order
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}
