//! File collection and language detection.
//!
//! Walks a target directory, skipping hidden entries and build/vendor
//! directories, and buckets files by language. A parallel source-only
//! collector additionally drops files matching the language's test
//! naming conventions.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::lang::{Language, ALL_LANGUAGES};

/// Directory names that are never scanned.
const SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    "target",
    "dist",
    "build",
    "__pycache__",
    "coverage",
];

fn is_skipped_dir(name: &str, config: &Config) -> bool {
    SKIPPED_DIRS.contains(&name) || config.excluded_dirs.iter().any(|d| d == name)
}

/// Collect every file of the given language under `root`, tests included.
pub fn collect_files(root: &Path, lang: Language, config: &Config) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if e.file_type().is_dir() && name.starts_with('.') && e.depth() > 0 {
                return false;
            }
            if e.file_type().is_dir() && is_skipped_dir(&name, config) {
                return false;
            }
            true
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            lang.matches_file(&name)
        })
        .map(|e| e.path().to_path_buf())
        .filter(|p| !config.is_path_excluded(p))
        .collect()
}

/// Collect only non-test files of the given language under `root`.
pub fn collect_source_files(root: &Path, lang: Language, config: &Config) -> Vec<PathBuf> {
    collect_files(root, lang, config)
        .into_iter()
        .filter(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            !lang.is_test_file(&name)
        })
        .collect()
}

/// Detect which languages are present under `root`, in fixed order.
pub fn detect_languages(root: &Path, config: &Config) -> Vec<Language> {
    ALL_LANGUAGES
        .iter()
        .copied()
        .filter(|lang| !collect_files(root, *lang, config).is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_collect_skips_vendor_and_hidden() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/api.ts", "export const a = 1;");
        write(temp.path(), "node_modules/pkg/index.ts", "x");
        write(temp.path(), ".cache/gen.ts", "x");

        let files = collect_files(temp.path(), Language::TypeScript, &Config::default());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/api.ts"));
    }

    #[test]
    fn test_source_only_excludes_tests() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "api.ts", "export const a = 1;");
        write(temp.path(), "api.test.ts", "it('works', () => {});");

        let config = Config::default();
        let all = collect_files(temp.path(), Language::TypeScript, &config);
        let source = collect_source_files(temp.path(), Language::TypeScript, &config);
        assert_eq!(all.len(), 2);
        assert_eq!(source.len(), 1);
        assert!(source[0].ends_with("api.ts"));
    }

    #[test]
    fn test_detect_languages_deterministic() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "main.go", "package main");
        write(temp.path(), "app.py", "pass");
        write(temp.path(), "web.ts", "export {};");

        let config = Config::default();
        let langs = detect_languages(temp.path(), &config);
        assert_eq!(
            langs,
            vec![Language::TypeScript, Language::Python, Language::Go]
        );
        // Same answer on a second pass.
        assert_eq!(langs, detect_languages(temp.path(), &config));
    }
}
