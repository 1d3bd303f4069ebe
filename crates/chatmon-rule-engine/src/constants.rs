//! Limits applied when compiling rule patterns and loading group files
//!
//! These keep a single hostile or careless rule from exhausting memory:
//! - oversized patterns
//! - oversized compiled programs and DFA caches
//! - oversized group files

/// Maximum size for a group configuration file (1MB)
///
/// Group files are short word lists. Anything larger is rejected before
/// parsing.
pub const MAX_GROUP_FILE_SIZE: u64 = 1_048_576; // 1MB

/// Maximum regex pattern length (500 characters)
pub const MAX_REGEX_LENGTH: usize = 500;

/// Compiled regex size limit (10MB)
///
/// Applied during compilation via `RegexBuilder`.
pub const REGEX_SIZE_LIMIT: usize = 10_000_000; // 10MB

/// Regex DFA size limit (2MB)
pub const REGEX_DFA_SIZE_LIMIT: usize = 2_000_000; // 2MB

/// Default file name prefix for group configuration files
pub const DEFAULT_GROUP_PREFIX: &str = "chatmon_wordgroup_";
