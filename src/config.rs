//! Sandbox configuration discovery: an optional JSON file naming the root
//! allow-list and home path, falling back to a single root derived from
//! `TRUMAN_DOME`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::home_dir;
use serde::Deserialize;

use crate::path_validator::SandboxConfig;

const CONFIG_FILE_NAME: &str = ".truman-dome.json";
const DOME_ENV_VAR: &str = "TRUMAN_DOME";

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DomeFileConfig {
    roots: Option<Vec<String>>,
    home: Option<String>,
}

/// Discovers the sandbox configuration for a session rooted at `cwd`. A
/// config file at `<cwd>/.truman-dome.json` takes precedence; its absence
/// falls back to `TRUMAN_DOME`-derived single-root discovery.
pub fn discover(cwd: &Path) -> Result<SandboxConfig> {
    let config_path = cwd.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        load_from_file(&config_path)
    } else {
        single_root_from_env(cwd)
    }
}

fn load_from_file(path: &Path) -> Result<SandboxConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let parsed: DomeFileConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let roots = parsed
        .roots
        .filter(|roots| !roots.is_empty())
        .with_context(|| format!("{} must set a non-empty \"roots\" array", path.display()))?;
    let home = parsed
        .home
        .with_context(|| format!("{} must set a \"home\" path", path.display()))?;

    let roots = roots.into_iter().map(PathBuf::from).collect();
    SandboxConfig::new(roots, PathBuf::from(home))
        .with_context(|| format!("invalid sandbox configuration in {}", path.display()))
}

fn single_root_from_env(cwd: &Path) -> Result<SandboxConfig> {
    let home = home_dir().unwrap_or_else(|| cwd.to_path_buf());
    let raw = std::env::var(DOME_ENV_VAR).unwrap_or_default();
    let root = expand_dome_root(&raw, &home, cwd);
    SandboxConfig::single_root(root).context("failed to build sandbox from TRUMAN_DOME")
}

/// Expands `~`, `.` and a leading `./` the way the expander does for
/// arguments; a leading `$` is never expanded here either — it stays a
/// literal character, so a config value trying to smuggle a shell-style
/// variable reference just fails to resolve to a real directory.
fn expand_dome_root(raw: &str, home: &Path, cwd: &Path) -> PathBuf {
    if raw.trim().is_empty() {
        return cwd.to_path_buf();
    }
    if raw == "~" {
        return home.to_path_buf();
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        return home.join(rest);
    }
    if raw == "." {
        return cwd.to_path_buf();
    }
    if let Some(rest) = raw.strip_prefix("./") {
        return cwd.join(rest);
    }
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // TRUMAN_DOME is process-global; serialize the tests that touch it.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn config_file_takes_precedence_over_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            format!(r#"{{"roots": ["{}"], "home": "{}"}}"#, root.display(), root.display()),
        )
        .unwrap();

        let sandbox = discover(temp.path()).unwrap();
        assert_eq!(sandbox.roots(), &[fs::canonicalize(&root).unwrap()]);
    }

    #[test]
    fn empty_env_falls_back_to_cwd() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        unsafe {
            std::env::remove_var(DOME_ENV_VAR);
        }
        let sandbox = single_root_from_env(temp.path()).unwrap();
        assert_eq!(sandbox.home(), fs::canonicalize(temp.path()).unwrap());
    }

    #[test]
    fn tilde_env_value_expands_against_home() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        let expanded = expand_dome_root("~", temp.path(), Path::new("/ignored"));
        assert_eq!(expanded, temp.path());
    }
}
