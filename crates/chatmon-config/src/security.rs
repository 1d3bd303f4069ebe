use chatmon_rule_engine::MAX_REGEX_LENGTH;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Security-related errors
#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("Path does not exist: {0}")]
    PathDoesNotExist(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Path is not readable: {0}")]
    NotReadable(PathBuf),

    #[error("Invalid group name: {0}. Must contain only alphanumeric characters, '-' and '_'")]
    InvalidGroupName(String),

    #[error("Pattern exceeds {max} characters: {pattern}")]
    PatternTooLong { pattern: String, max: usize },
}

/// Validate and canonicalize a rules directory
///
/// This function ensures:
/// 1. The path exists
/// 2. It's a directory
/// 3. It's readable
/// 4. Symlinks are resolved (canonicalized)
pub fn validate_rules_dir(path: &Path) -> Result<PathBuf, SecurityError> {
    let canonical = path
        .canonicalize()
        .map_err(|_| SecurityError::PathDoesNotExist(path.to_path_buf()))?;

    if !canonical.is_dir() {
        return Err(SecurityError::NotADirectory(canonical));
    }

    if fs::read_dir(&canonical).is_err() {
        return Err(SecurityError::NotReadable(canonical));
    }

    Ok(canonical)
}

/// Validate a group name taken from a file name
///
/// Group names must:
/// - Be 1-64 characters long
/// - Contain only alphanumeric characters, hyphens and underscores
pub fn validate_group_name(name: &str) -> Result<(), SecurityError> {
    if name.is_empty() || name.len() > 64 {
        return Err(SecurityError::InvalidGroupName(name.to_string()));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(SecurityError::InvalidGroupName(name.to_string()));
    }

    Ok(())
}

/// Reject patterns the matcher would refuse to compile for length alone
pub fn validate_words(words: &[String]) -> Result<(), SecurityError> {
    match words.iter().find(|word| word.len() > MAX_REGEX_LENGTH) {
        Some(word) => Err(SecurityError::PatternTooLong {
            pattern: word.clone(),
            max: MAX_REGEX_LENGTH,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_group_name() {
        assert!(validate_group_name("profanity").is_ok());
        assert!(validate_group_name("spam_links-2").is_ok());

        assert!(validate_group_name("").is_err());
        assert!(validate_group_name("has space").is_err());
        assert!(validate_group_name("../escape").is_err());
        assert!(validate_group_name(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_rules_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_rules_dir(temp_dir.path()).is_ok());

        let missing = temp_dir.path().join("missing");
        assert!(matches!(
            validate_rules_dir(&missing),
            Err(SecurityError::PathDoesNotExist(_))
        ));

        let file = temp_dir.path().join("file.toml");
        fs::write(&file, "").unwrap();
        assert!(matches!(
            validate_rules_dir(&file),
            Err(SecurityError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_validate_words() {
        assert!(validate_words(&["short".to_string()]).is_ok());
        let long = "a".repeat(MAX_REGEX_LENGTH + 1);
        assert!(matches!(
            validate_words(&[long]),
            Err(SecurityError::PatternTooLong { .. })
        ));
    }
}
