//! Linter dispatcher.
//!
//! Routes each detected language to an external checker process with a
//! bounded timeout. The first-party family (TypeScript/JavaScript) goes
//! to ESLint and only runs when a recognized config exists in the target
//! root; everything else is routed through per-language ruleset ids to
//! one shared Semgrep invocation. A missing optional tool or config is a
//! soft pass; any other failure is a hard fail for that language, with
//! the combined output retained for reporting. Dispatch is sequential.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::config::Config;
use crate::lang::Language;

/// ESLint config file names recognized in the target root.
const ESLINT_CONFIG_NAMES: &[&str] = &[
    ".eslintrc.json",
    ".eslintrc.js",
    ".eslintrc.yaml",
    ".eslintrc.yml",
    "eslint.config.js",
    "eslint.config.mjs",
];

/// Outcome of one external checker invocation.
#[derive(Debug, Clone)]
pub struct LintResult {
    pub language: Language,
    pub passed: bool,
    /// True when the checker was not applicable (missing config/tool).
    pub skipped: bool,
    pub output: String,
}

impl LintResult {
    fn soft_pass(language: Language, reason: &str) -> Self {
        Self {
            language,
            passed: true,
            skipped: true,
            output: reason.to_string(),
        }
    }
}

/// Dispatch linters for every detected language, in order.
pub fn dispatch(root: &Path, languages: &[Language], config: &Config) -> anyhow::Result<Vec<LintResult>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let mut results = Vec::new();

    for &lang in languages {
        let result = match lang.semgrep_ruleset() {
            None => {
                // Both first-party languages share one ESLint pass.
                if results
                    .iter()
                    .any(|r: &LintResult| r.language.is_first_party() && !r.skipped)
                {
                    continue;
                }
                runtime.block_on(run_eslint(root, lang, config))
            }
            Some(ruleset) => runtime.block_on(run_semgrep(root, lang, ruleset, config)),
        };
        results.push(result);
    }

    Ok(results)
}

fn eslint_config_exists(root: &Path) -> bool {
    ESLINT_CONFIG_NAMES.iter().any(|n| root.join(n).exists())
}

async fn run_eslint(root: &Path, lang: Language, config: &Config) -> LintResult {
    if !eslint_config_exists(root) {
        return LintResult::soft_pass(lang, "no ESLint config in target root");
    }

    let mut cmd = Command::new("eslint");
    cmd.arg(".").current_dir(root);
    match run_checker(cmd, lang, Duration::from_secs(config.eslint_timeout_secs())).await {
        Ok(result) => result,
        // Config present but no binary: the target opted in, so missing
        // tooling is a real failure here.
        Err(ToolMissing) => LintResult {
            language: lang,
            passed: false,
            skipped: false,
            output: "eslint config found but eslint is not installed".to_string(),
        },
    }
}

async fn run_semgrep(root: &Path, lang: Language, ruleset: &str, config: &Config) -> LintResult {
    let mut cmd = Command::new("semgrep");
    cmd.args(["scan", "--quiet", "--error", "--config", ruleset])
        .arg(root);
    match run_checker(cmd, lang, Duration::from_secs(config.semgrep_timeout_secs())).await {
        Ok(result) => result,
        Err(ToolMissing) => LintResult::soft_pass(lang, "semgrep not installed"),
    }
}

/// The checker binary does not exist on this machine.
#[derive(Debug)]
struct ToolMissing;

async fn run_checker(
    mut cmd: Command,
    language: Language,
    timeout: Duration,
) -> Result<LintResult, ToolMissing> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    // A timed-out checker must not outlive the run.
    cmd.kill_on_drop(true);

    let spawned = match cmd.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(ToolMissing),
        Err(e) => {
            return Ok(LintResult {
                language,
                passed: false,
                skipped: false,
                output: format!("failed to spawn checker: {}", e),
            });
        }
    };

    let result = match tokio::time::timeout(timeout, spawned.wait_with_output()).await {
        Ok(Ok(output)) => {
            let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            LintResult {
                language,
                passed: output.status.success(),
                skipped: false,
                output: combined,
            }
        }
        Ok(Err(e)) => LintResult {
            language,
            passed: false,
            skipped: false,
            output: format!("checker failed: {}", e),
        },
        Err(_) => LintResult {
            language,
            passed: false,
            skipped: false,
            output: format!("checker timed out after {}s", timeout.as_secs()),
        },
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn block_on_checker(
        cmd: Command,
        timeout: Duration,
    ) -> Result<LintResult, ToolMissing> {
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(run_checker(cmd, Language::TypeScript, timeout))
    }

    #[test]
    fn test_missing_binary_is_tool_missing() {
        let result = block_on_checker(
            Command::new("reviewgate-no-such-checker"),
            Duration::from_secs(5),
        );
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_hard_fail() {
        let temp = TempDir::new().unwrap();
        let script = write_script(
            temp.path(),
            "failing-checker",
            "#!/bin/sh\necho 'found 2 problems'\nexit 1\n",
        );

        let result = block_on_checker(Command::new(&script), Duration::from_secs(5)).unwrap();
        assert!(!result.passed);
        assert!(!result.skipped);
        assert!(result.output.contains("found 2 problems"));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_is_hard_fail() {
        let temp = TempDir::new().unwrap();
        let script = write_script(temp.path(), "slow-checker", "#!/bin/sh\nsleep 10\n");

        let result =
            block_on_checker(Command::new(&script), Duration::from_millis(200)).unwrap();
        assert!(!result.passed);
        assert!(!result.skipped);
        assert!(result.output.contains("timed out"));
    }

    #[test]
    fn test_missing_eslint_config_is_soft_pass() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();
        let results =
            dispatch(temp.path(), &[Language::TypeScript], &config).unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].passed);
        assert!(results[0].skipped);
    }

    #[test]
    fn test_first_party_languages_share_one_pass() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();
        let results = dispatch(
            temp.path(),
            &[Language::TypeScript, Language::JavaScript],
            &config,
        )
        .unwrap();

        // No config: one soft pass per language, both skipped.
        assert!(results.iter().all(|r| r.passed && r.skipped));
    }
}
