//! Optional configuration file for reviewgate.
//!
//! A config tunes the ambient behavior of a run (excluded paths, linter
//! timeouts); every field has a default so runs work with no config at all.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Config file names searched for in the target root.
const CONFIG_NAMES: &[&str] = &["reviewgate.yaml", ".reviewgate.yaml"];

/// Default timeout for the first-party linter (seconds).
pub const DEFAULT_ESLINT_TIMEOUT_SECS: u64 = 60;
/// Default timeout for the shared static-analysis service (seconds).
pub const DEFAULT_SEMGREP_TIMEOUT_SECS: u64 = 300;

/// Run configuration, usually loaded from `.reviewgate.yaml`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Extra directory names to skip during collection.
    #[serde(default)]
    pub excluded_dirs: Vec<String>,
    /// Glob patterns for paths to exclude from scanning.
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Override for the ESLint timeout in seconds.
    #[serde(default)]
    pub eslint_timeout_secs: Option<u64>,
    /// Override for the Semgrep timeout in seconds.
    #[serde(default)]
    pub semgrep_timeout_secs: Option<u64>,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Discover and load a config in the target root, or fall back to
    /// defaults when none exists.
    pub fn discover(root: &Path) -> anyhow::Result<Self> {
        for name in CONFIG_NAMES {
            let path = root.join(name);
            if path.exists() {
                return Self::parse_file(&path);
            }
        }
        Ok(Config::default())
    }

    pub fn eslint_timeout_secs(&self) -> u64 {
        self.eslint_timeout_secs.unwrap_or(DEFAULT_ESLINT_TIMEOUT_SECS)
    }

    pub fn semgrep_timeout_secs(&self) -> u64 {
        self.semgrep_timeout_secs
            .unwrap_or(DEFAULT_SEMGREP_TIMEOUT_SECS)
    }

    /// Check if a path matches any excluded glob pattern.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();
        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                if glob.compile_matcher().is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::discover(temp.path()).unwrap();
        assert!(config.excluded_dirs.is_empty());
        assert_eq!(config.eslint_timeout_secs(), DEFAULT_ESLINT_TIMEOUT_SECS);
        assert_eq!(config.semgrep_timeout_secs(), DEFAULT_SEMGREP_TIMEOUT_SECS);
    }

    #[test]
    fn test_discover_reads_yaml() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".reviewgate.yaml"),
            "excluded_dirs:\n  - generated\neslint_timeout_secs: 10\n",
        )
        .unwrap();

        let config = Config::discover(temp.path()).unwrap();
        assert_eq!(config.excluded_dirs, vec!["generated".to_string()]);
        assert_eq!(config.eslint_timeout_secs(), 10);
    }

    #[test]
    fn test_excluded_path_glob() {
        let config = Config {
            excluded_paths: vec!["**/migrations/**".to_string()],
            ..Default::default()
        };
        assert!(config.is_path_excluded(Path::new("app/migrations/0001_init.py")));
        assert!(!config.is_path_excluded(Path::new("app/models.py")));
    }
}
