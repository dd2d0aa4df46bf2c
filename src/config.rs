//! Console configuration.
//!
//! Everything has a default, so the console runs with no flags and no
//! environment. Overrides, lowest to highest precedence:
//! - `HBNB_STORAGE_PATH` - path of the JSON record file
//! - command-line flags applied by the binary

use std::ffi::OsString;
use std::path::PathBuf;

use crate::storage::DEFAULT_FILE;

pub const STORAGE_PATH_ENV: &str = "HBNB_STORAGE_PATH";

pub const DEFAULT_PROMPT: &str = "(hbnb) ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// JSON file the registry is loaded from and saved to.
    pub storage_path: PathBuf,
    pub prompt: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_FILE),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl ShellConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_storage_path(std::env::var_os(STORAGE_PATH_ENV))
    }

    fn with_env_storage_path(self, value: Option<OsString>) -> Self {
        match value {
            Some(path) if !path.is_empty() => self.with_storage_path(path),
            _ => self,
        }
    }

    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_flagless_console() {
        let config = ShellConfig::default();
        assert_eq!(config.storage_path, PathBuf::from("file.json"));
        assert_eq!(config.prompt, "(hbnb) ");
    }

    #[test]
    fn env_path_overrides_default_unless_empty() {
        let config = ShellConfig::default().with_env_storage_path(Some("/tmp/records.json".into()));
        assert_eq!(config.storage_path, PathBuf::from("/tmp/records.json"));

        let config = ShellConfig::default().with_env_storage_path(Some(OsString::new()));
        assert_eq!(config.storage_path, PathBuf::from(DEFAULT_FILE));

        let config = ShellConfig::default().with_env_storage_path(None);
        assert_eq!(config.storage_path, PathBuf::from(DEFAULT_FILE));
    }
}
