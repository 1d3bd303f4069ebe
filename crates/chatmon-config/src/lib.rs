//! Word group configuration for chatmon
//!
//! Group files live in one rules directory, one TOML file per group named
//! `<prefix><group>.toml`. Loading produces a [`ConfigManager`], an immutable
//! [`chatmon_rule_engine::GroupRegistry`] for one load cycle.

pub mod manager;
pub mod security;
pub mod types;

pub use manager::{ConfigError, ConfigManager};
pub use security::{validate_group_name, validate_rules_dir, SecurityError};
pub use types::GroupFile;
