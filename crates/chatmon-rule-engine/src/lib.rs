//! Chatmon Rule Engine - regex word groups for chat and command monitoring
//!
//! This crate decides, for a line of chat text or a command invocation,
//! whether any configured pattern matches and what the owning group wants done
//! about it.
//!
//! # Architecture
//!
//! - **Rule Index**: pattern → group and command → patterns, rebuilt per load
//! - **Compiled Matching**: patterns compiled once per snapshot and cached
//! - **Word Manager**: lock-free reads against an immutable snapshot, reloads
//!   publish a new snapshot with a single swap
//!
//! # Example
//!
//! ```
//! use chatmon_rule_engine::{GroupConfig, GroupTable, WordManager};
//! use std::sync::Arc;
//!
//! let mut groups = GroupTable::new();
//! groups.insert(
//!     "profanity",
//!     GroupConfig::new(["badw[0o]rd"]).with_message("Please mind your language"),
//! );
//!
//! let manager = WordManager::from_registry(Arc::new(groups));
//! let action = manager.evaluate_text("there is somebadw0rd in here.").unwrap();
//! assert_eq!(action.unwrap().original_word(), "badw0rd");
//! ```

pub mod action;
pub mod constants;
pub mod group;
pub mod index;
pub mod manager;
pub mod matcher;
pub mod resolver;

// Re-export core types
pub use action::WordAction;
pub use constants::*;
pub use group::{GroupConfig, GroupRegistry, GroupTable};
pub use index::RuleIndex;
pub use manager::{Snapshot, WordManager};
pub use matcher::{find_match, match_text, BadRulePolicy, CompiledPattern, FoldedText, PatternMatch};
pub use resolver::resolve;

use std::path::PathBuf;

/// Result type for matching operations
pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors surfaced by matching operations
///
/// Only malformed rules propagate to callers; configuration problems are
/// logged and degrade to "no action".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("Could not process rule ({pattern}): {reason}")]
    BadRule { pattern: String, reason: String },
}

impl MatchError {
    /// The pattern text that failed to compile
    pub fn pattern(&self) -> &str {
        match self {
            MatchError::BadRule { pattern, .. } => pattern,
        }
    }
}

/// A configuration problem with a single group, reported by a [`GroupRegistry`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error in configuration for group '{group}'{}: {message}", file_suffix(.file))]
pub struct GroupConfigError {
    /// Name of the group that failed
    pub group: String,
    /// File the group was loaded from, when there is one
    pub file: Option<PathBuf>,
    /// Description of what went wrong
    pub message: String,
}

impl GroupConfigError {
    pub fn new(group: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            file: None,
            message: message.into(),
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }
}

fn file_suffix(file: &Option<PathBuf>) -> String {
    match file {
        Some(path) => format!(" (file '{}')", path.display()),
        None => String::new(),
    }
}
