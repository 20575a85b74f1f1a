//! `.shellshield.json` loading, search path, and environment overrides.

use crate::patterns::{
    DEFAULT_BLOCKED_COMMANDS, DEFAULT_MAX_SUBSHELL_DEPTH, DEFAULT_THRESHOLD,
    DEFAULT_TRUSTED_DOMAINS,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Caller-side enforcement mode — the analyzer itself is mode-agnostic;
/// only the CLI consults this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Enforce,
    Permissive,
    Interactive,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Enforce
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "enforce" => Ok(Mode::Enforce),
            "permissive" => Ok(Mode::Permissive),
            "interactive" => Ok(Mode::Interactive),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// One user-supplied regex rule.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomRule {
    pub pattern: String,
    pub suggestion: String,
}

/// The analyzer's configuration. Loaded once per invocation and
/// shared immutably across the whole call tree, including recursive
/// subshell analyses.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub blocked: HashSet<String>,
    pub allowed: HashSet<String>,
    #[serde(rename = "trustedDomains")]
    pub trusted_domains: Vec<String>,
    pub threshold: u32,
    #[serde(rename = "maxSubshellDepth")]
    pub max_subshell_depth: u32,
    pub mode: Mode,
    #[serde(rename = "customRules")]
    pub custom_rules: Vec<CustomRule>,
    #[serde(rename = "contextPath")]
    pub context_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            blocked: DEFAULT_BLOCKED_COMMANDS.iter().map(|s| s.to_string()).collect(),
            allowed: HashSet::new(),
            trusted_domains: DEFAULT_TRUSTED_DOMAINS.iter().map(|s| s.to_string()).collect(),
            threshold: DEFAULT_THRESHOLD,
            max_subshell_depth: DEFAULT_MAX_SUBSHELL_DEPTH,
            mode: Mode::default(),
            custom_rules: Vec::new(),
            context_path: None,
        }
    }
}

/// Directories searched, in order, for `.shellshield.json`: `$INIT_CWD`,
/// `$PWD`, the process's actual CWD, the invoking script's directory, and
/// the directory above that; finally `$HOME`.
fn search_dirs(invoker_script: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(init_cwd) = std::env::var("INIT_CWD") {
        dirs.push(PathBuf::from(init_cwd));
    }
    if let Ok(pwd) = std::env::var("PWD") {
        dirs.push(PathBuf::from(pwd));
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(script) = invoker_script {
        if let Some(dir) = script.parent() {
            dirs.push(dir.to_path_buf());
            if let Some(above) = dir.parent() {
                dirs.push(above.to_path_buf());
            }
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        dirs.push(PathBuf::from(home));
    }

    dirs
}

impl Config {
    /// Searches the directory order above for `.shellshield.json`, parses
    /// the first one found, then layers environment overrides on top.
    /// Missing config file ⇒ `Config::default()` with env overrides still
    /// applied. A file that exists but fails to parse is ignored the same
    /// way, with a diagnostic on stderr gated on `DEBUG`.
    pub fn load(invoker_script: Option<&Path>) -> Config {
        let mut config = Config::default();

        for dir in search_dirs(invoker_script) {
            let candidate = dir.join(".shellshield.json");
            if !candidate.is_file() {
                continue;
            }
            match std::fs::read_to_string(&candidate) {
                Ok(text) => match serde_json::from_str::<Config>(&text) {
                    Ok(parsed) => {
                        config = parsed;
                        break;
                    }
                    Err(err) => {
                        if std::env::var("DEBUG").is_ok() {
                            eprintln!("shellshield: failed to parse {candidate:?}: {err}");
                        }
                    }
                },
                Err(err) => {
                    if std::env::var("DEBUG").is_ok() {
                        eprintln!("shellshield: failed to read {candidate:?}: {err}");
                    }
                }
            }
        }

        config.apply_env_overrides();
        config
    }

    /// Applies the documented environment overrides, file values losing to
    /// the environment. Exposed publicly so a `Config` built programmatically
    /// (not loaded from disk) can still pick up the same overrides `load`
    /// applies.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(csv) = std::env::var("OPENCODE_BLOCK_COMMANDS") {
            self.blocked.extend(split_csv(&csv));
        }
        if let Ok(csv) = std::env::var("OPENCODE_ALLOW_COMMANDS") {
            self.allowed.extend(split_csv(&csv));
        }
        if let Ok(v) = std::env::var("SHELLSHIELD_THRESHOLD") {
            if let Ok(n) = v.parse() {
                self.threshold = n;
            }
        }
        if let Ok(v) = std::env::var("SHELLSHIELD_MAX_SUBSHELL_DEPTH") {
            if let Ok(n) = v.parse() {
                self.max_subshell_depth = n;
            }
        }
        if let Ok(v) = std::env::var("SHELLSHIELD_MODE") {
            if let Ok(mode) = v.parse() {
                self.mode = mode;
            }
        }
        if let Ok(path) = std::env::var("SHELLSHIELD_CONTEXT_PATH") {
            self.context_path = Some(PathBuf::from(path));
        }
    }
}

fn split_csv(csv: &str) -> impl Iterator<Item = String> + '_ {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
