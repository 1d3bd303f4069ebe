//! Group configuration as seen by the rule engine
//!
//! Groups are owned by the configuration loader. The engine only reads them
//! through [`GroupRegistry`], one registry value per load cycle.

use crate::GroupConfigError;
use std::sync::Arc;

/// A named bundle of patterns plus the response shared by all of them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupConfig {
    /// Patterns owned by this group, in declaration order
    pub words: Vec<String>,

    /// Response template sent when one of the words matches
    pub message: String,

    /// Suppress the original chat message or command
    pub prevent_send: bool,

    /// Send the response to everyone instead of only the sender
    pub broadcast: bool,

    /// Follow-up command templates, run in order
    pub run_commands: Vec<String>,

    /// Command names whose text is also checked against this group's words
    pub include_commands: Vec<String>,
}

impl GroupConfig {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_prevent_send(mut self, prevent_send: bool) -> Self {
        self.prevent_send = prevent_send;
        self
    }

    pub fn with_broadcast(mut self, broadcast: bool) -> Self {
        self.broadcast = broadcast;
        self
    }

    pub fn with_run_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_commands = commands.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_include_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_commands = commands.into_iter().map(Into::into).collect();
        self
    }
}

/// Read-only lookup of group configuration by name
///
/// Implementations must be immutable for their lifetime: a reload hands the
/// engine a new registry instead of mutating the old one.
pub trait GroupRegistry: Send + Sync {
    /// Group names in declaration order
    fn group_names(&self) -> Vec<String>;

    /// Configuration for one group
    ///
    /// # Errors
    ///
    /// Returns a [`GroupConfigError`] naming the group (and file, if any) when
    /// the group is unknown or its configuration is invalid.
    fn group(&self, name: &str) -> std::result::Result<Arc<GroupConfig>, GroupConfigError>;
}

/// In-memory registry for groups built in code
#[derive(Debug, Clone, Default)]
pub struct GroupTable {
    groups: Vec<(String, Arc<GroupConfig>)>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group, replacing any existing group with the same name in place
    pub fn insert(&mut self, name: impl Into<String>, config: GroupConfig) {
        let name = name.into();
        let config = Arc::new(config);
        match self.groups.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = config,
            None => self.groups.push((name, config)),
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl GroupRegistry for GroupTable {
    fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|(name, _)| name.clone()).collect()
    }

    fn group(&self, name: &str) -> std::result::Result<Arc<GroupConfig>, GroupConfigError> {
        self.groups
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, config)| Arc::clone(config))
            .ok_or_else(|| GroupConfigError::new(name, "group is not defined"))
    }
}
