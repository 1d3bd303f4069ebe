use crate::security::{validate_group_name, validate_rules_dir, validate_words, SecurityError};
use crate::types::GroupFile;
use chatmon_rule_engine::{GroupConfig, GroupConfigError, GroupRegistry, MAX_GROUP_FILE_SIZE};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Errors that can occur while loading word groups
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("IO error reading {}: {source}", .file.display())]
    Read {
        file: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("TOML parse error in {}: {source}", .file.display())]
    Toml {
        file: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Security error: {0}")]
    Security(#[from] SecurityError),

    #[error("Rules directory not found at {0}")]
    DirectoryNotFound(PathBuf),

    #[error("{} exceeds maximum size of {max} bytes ({size} bytes)", .file.display())]
    FileTooLarge { file: PathBuf, size: u64, max: u64 },

    #[error("Invalid group in {}: {message}", .file.display())]
    InvalidGroup { file: PathBuf, message: String },

    #[error("Group file already exists: {0}")]
    GroupExists(PathBuf),
}

impl ConfigError {
    /// The file this error is about, when it concerns one
    pub fn file(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { file, .. }
            | ConfigError::Toml { file, .. }
            | ConfigError::FileTooLarge { file, .. }
            | ConfigError::InvalidGroup { file, .. }
            | ConfigError::GroupExists(file) => Some(file),
            _ => None,
        }
    }

    /// Attribute this error to one group, for the rule engine
    pub fn into_group_error(self, group: &str) -> GroupConfigError {
        let file = self.file().map(Path::to_path_buf);
        let error = GroupConfigError::new(group, self.to_string());
        match file {
            Some(file) => error.with_file(file),
            None => error,
        }
    }
}

/// A group file found in the rules directory
#[derive(Debug, Clone)]
struct LoadedGroup {
    name: String,
    file: PathBuf,
    config: Result<Arc<GroupConfig>, GroupConfigError>,
}

/// Word groups loaded from one rules directory
///
/// Immutable once loaded. Call [`ConfigManager::reload`] for a fresh value and
/// hand it to the word manager.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    dir: PathBuf,
    prefix: String,
    groups: Vec<LoadedGroup>,
}

impl ConfigManager {
    /// Load every `<prefix><group>.toml` file in `dir`
    ///
    /// Files that fail to read, parse or validate are still enumerated; asking
    /// for their configuration returns the error.
    pub fn load(dir: &Path, prefix: &str) -> Result<Self, ConfigError> {
        let dir = validate_rules_dir(dir).map_err(|e| match e {
            SecurityError::PathDoesNotExist(path) => ConfigError::DirectoryNotFound(path),
            other => ConfigError::Security(other),
        })?;

        let mut groups = Vec::new();
        let walker = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), "Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(name) = group_name(path, prefix) else {
                continue;
            };

            if let Err(e) = validate_group_name(name) {
                warn!(file = %path.display(), "Skipping group file: {}", e);
                continue;
            }

            let config = load_group_file(path)
                .map(|file| Arc::new(file.into_group_config()))
                .map_err(|e| e.into_group_error(name));

            match &config {
                Ok(_) => debug!(group = name, file = %path.display(), "Loaded word group"),
                Err(e) => warn!(group = name, file = %path.display(), "Word group failed to load. {}", e.message),
            }

            groups.push(LoadedGroup {
                name: name.to_string(),
                file: path.to_path_buf(),
                config,
            });
        }

        Ok(Self {
            dir,
            prefix: prefix.to_string(),
            groups,
        })
    }

    /// Load the same directory again
    pub fn reload(&self) -> Result<Self, ConfigError> {
        Self::load(&self.dir, &self.prefix)
    }

    /// Write a new group file with default settings and the given words
    ///
    /// Writes to a temporary file first and renames it into place.
    pub fn init_group(
        dir: &Path,
        prefix: &str,
        name: &str,
        group: &GroupFile,
    ) -> Result<PathBuf, ConfigError> {
        validate_group_name(name)?;
        fs::create_dir_all(dir)?;

        let path = dir.join(format!("{}{}.toml", prefix, name));
        if path.exists() {
            return Err(ConfigError::GroupExists(path));
        }

        let toml_str = toml::to_string_pretty(group)?;
        let temp_path = path.with_extension("toml.tmp");
        fs::write(&temp_path, toml_str)?;
        fs::rename(&temp_path, &path)?;

        Ok(path)
    }

    /// Canonical rules directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of group files found, including broken ones
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Groups that failed to load
    pub fn errors(&self) -> impl Iterator<Item = &GroupConfigError> {
        self.groups.iter().filter_map(|group| group.config.as_ref().err())
    }

    /// File a group was loaded from
    pub fn group_file(&self, name: &str) -> Option<&Path> {
        self.groups
            .iter()
            .find(|group| group.name == name)
            .map(|group| group.file.as_path())
    }
}

impl GroupRegistry for ConfigManager {
    fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|group| group.name.clone()).collect()
    }

    fn group(&self, name: &str) -> Result<Arc<GroupConfig>, GroupConfigError> {
        self.groups
            .iter()
            .find(|group| group.name == name)
            .ok_or_else(|| GroupConfigError::new(name, "group is not defined"))?
            .config
            .clone()
    }
}

/// Group name for a file, or `None` if the file is not a group file
fn group_name<'a>(path: &'a Path, prefix: &str) -> Option<&'a str> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
        return None;
    }
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.strip_prefix(prefix))
}

/// Read, parse and validate a single group file
fn load_group_file(path: &Path) -> Result<GroupFile, ConfigError> {
    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        file: path.to_path_buf(),
        source,
    })?;

    if metadata.len() > MAX_GROUP_FILE_SIZE {
        return Err(ConfigError::FileTooLarge {
            file: path.to_path_buf(),
            size: metadata.len(),
            max: MAX_GROUP_FILE_SIZE,
        });
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        file: path.to_path_buf(),
        source,
    })?;

    let file: GroupFile = toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        file: path.to_path_buf(),
        source,
    })?;

    validate_words(&file.words).map_err(|e| ConfigError::InvalidGroup {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PREFIX: &str = "test_";

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_load_groups_in_file_name_order() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "test_b.toml", r#"words = ["bee"]"#);
        write(temp_dir.path(), "test_a.toml", r#"words = ["ay"]"#);
        write(temp_dir.path(), "other_c.toml", r#"words = ["sea"]"#);
        write(temp_dir.path(), "test_d.txt", r#"words = ["dee"]"#);

        let manager = ConfigManager::load(temp_dir.path(), PREFIX).unwrap();
        assert_eq!(manager.group_names(), vec!["a", "b"]);
        assert_eq!(manager.group("b").unwrap().words, vec!["bee"]);
        assert_eq!(manager.errors().count(), 0);
    }

    #[test]
    fn test_broken_group_reports_file() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "test_broken.toml", "words = [");

        let manager = ConfigManager::load(temp_dir.path(), PREFIX).unwrap();
        assert_eq!(manager.group_names(), vec!["broken"]);

        let err = manager.group("broken").unwrap_err();
        assert_eq!(err.group, "broken");
        assert!(err.file.unwrap().ends_with("test_broken.toml"));
    }

    #[test]
    fn test_oversized_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let padding = "#".repeat(MAX_GROUP_FILE_SIZE as usize + 1);
        write(temp_dir.path(), "test_big.toml", &padding);

        let manager = ConfigManager::load(temp_dir.path(), PREFIX).unwrap();
        let err = manager.group("big").unwrap_err();
        assert!(err.message.contains("exceeds maximum size"));
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = ConfigManager::load(&temp_dir.path().join("nope"), PREFIX);
        assert!(matches!(result, Err(ConfigError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_init_group_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::load(temp_dir.path(), PREFIX).unwrap();
        assert_eq!(manager.group_count(), 0);

        let group = GroupFile {
            words: vec!["spam".into()],
            message: "No spam please".into(),
            ..Default::default()
        };
        let path = ConfigManager::init_group(temp_dir.path(), PREFIX, "spam", &group).unwrap();
        assert!(path.ends_with("test_spam.toml"));

        let reloaded = manager.reload().unwrap();
        assert_eq!(reloaded.group("spam").unwrap().message, "No spam please");
        assert_eq!(manager.group_count(), 0);

        let again = ConfigManager::init_group(temp_dir.path(), PREFIX, "spam", &group);
        assert!(matches!(again, Err(ConfigError::GroupExists(_))));
    }
}
